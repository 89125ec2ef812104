use assert_fs::prelude::*;
use std::fs;
use std::path::Path;

use stage_move::{CleanupState, MemorySink, MoveOutcome, Session, StagingRequest};

fn request(source: &Path, dest: &Path) -> StagingRequest {
    StagingRequest {
        source: source.to_path_buf(),
        folder_name: "New Folder".into(),
        destination: Some(dest.to_path_buf()),
        fallback_volume: dest.parent().unwrap().to_path_buf(),
    }
}

#[test]
fn directory_contents_land_in_destination() {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src");
    src.child("a.txt").write_str("alpha").unwrap();
    src.child("b.txt").write_str("beta").unwrap();
    let dest = temp.child("dest");

    let mut session = Session::new();
    let mut sink = MemorySink::new();
    let report = session.run_staging(&request(src.path(), dest.path()), &mut sink).unwrap();

    assert_eq!(report.destination, dest.path());
    assert_eq!(report.batch.moved(), 2);
    assert!(report.extracted_to.is_none());
    assert_eq!(
        sink.rendered(),
        vec!["[OK] Moved a.txt", "[OK] Moved b.txt", "[Done] Operation completed"]
    );

    assert_eq!(fs::read_to_string(dest.path().join("a.txt")).unwrap(), "alpha");
    assert_eq!(fs::read_to_string(dest.path().join("b.txt")).unwrap(), "beta");
    // The source folder itself stays, emptied.
    assert!(src.path().is_dir());
    assert_eq!(fs::read_dir(src.path()).unwrap().count(), 0);

    assert_eq!(session.cleanup_state(), &CleanupState::Armed(dest.path().to_path_buf()));
}

#[test]
fn nested_folders_move_as_single_items() {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src");
    src.child("album/disc1/track.flac").write_str("x").unwrap();
    src.child("cover.jpg").write_str("y").unwrap();
    let dest = temp.child("dest");

    let mut sink = MemorySink::new();
    let report = Session::new()
        .run_staging(&request(src.path(), dest.path()), &mut sink)
        .unwrap();

    assert_eq!(report.batch.records.len(), 2);
    assert!(
        report
            .batch
            .records
            .iter()
            .all(|r| matches!(r.outcome, MoveOutcome::Moved { .. }))
    );
    dest.child("album/disc1/track.flac").assert("x");
    dest.child("cover.jpg").assert("y");
}

#[test]
fn existing_destination_is_reused() {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src");
    src.child("new.txt").write_str("n").unwrap();
    let dest = temp.child("dest");
    dest.child("old.txt").write_str("o").unwrap();

    let mut sink = MemorySink::new();
    Session::new()
        .run_staging(&request(src.path(), dest.path()), &mut sink)
        .unwrap();

    dest.child("old.txt").assert("o");
    dest.child("new.txt").assert("n");
}

#[test]
fn fallback_volume_gets_named_folder() {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src");
    src.child("a.txt").write_str("a").unwrap();
    let volume = temp.child("vol");
    volume.create_dir_all().unwrap();

    let req = StagingRequest {
        source: src.path().to_path_buf(),
        folder_name: "Incoming".into(),
        destination: None,
        fallback_volume: volume.path().to_path_buf(),
    };
    let mut session = Session::new();
    let mut sink = MemorySink::new();
    let report = session.run_staging(&req, &mut sink).unwrap();

    assert_eq!(report.destination, volume.path().join("Incoming"));
    volume.child("Incoming/a.txt").assert("a");
    assert_eq!(session.pending_deletion(), Some(volume.path().join("Incoming").as_path()));
}

#[test]
fn transcript_is_cleared_between_runs() {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src");
    src.child("first.txt").write_str("1").unwrap();
    let dest = temp.child("dest");

    let mut session = Session::new();
    let mut sink = MemorySink::new();
    session.run_staging(&request(src.path(), dest.path()), &mut sink).unwrap();

    src.child("second.txt").write_str("2").unwrap();
    session.run_staging(&request(src.path(), dest.path()), &mut sink).unwrap();

    assert_eq!(
        sink.rendered(),
        vec!["[OK] Moved second.txt", "[Done] Operation completed"]
    );
}
