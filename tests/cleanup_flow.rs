use assert_fs::prelude::*;
use std::path::Path;

use stage_move::{CleanupOutcome, CleanupState, LogTag, MemorySink, Session, StageError, StagingRequest};

fn staged_session(temp: &assert_fs::TempDir) -> (Session, std::path::PathBuf) {
    let src = temp.child("src");
    src.child("a.txt").write_str("a").unwrap();
    let dest = temp.path().join("dest");
    let req = StagingRequest {
        source: src.path().to_path_buf(),
        folder_name: "New Folder".into(),
        destination: Some(dest.clone()),
        fallback_volume: temp.path().to_path_buf(),
    };
    let mut session = Session::new();
    let mut sink = MemorySink::new();
    session.run_staging(&req, &mut sink).unwrap();
    (session, dest)
}

#[test]
fn idle_session_has_nothing_to_delete() {
    let mut session = Session::new();
    let mut sink = MemorySink::new();
    assert_eq!(
        session.confirm_cleanup(true, &mut sink).unwrap(),
        CleanupOutcome::NothingToDelete
    );
    assert_eq!(sink.rendered(), vec!["[Info] Nothing to delete"]);
}

#[test]
fn declining_changes_nothing_however_often() {
    let temp = assert_fs::TempDir::new().unwrap();
    let (mut session, dest) = staged_session(&temp);
    let mut sink = MemorySink::new();

    for _ in 0..3 {
        assert_eq!(session.confirm_cleanup(false, &mut sink).unwrap(), CleanupOutcome::Declined);
    }
    assert!(dest.join("a.txt").exists());
    assert_eq!(session.cleanup_state(), &CleanupState::Armed(dest));
}

#[test]
fn confirmed_delete_happens_exactly_once() {
    let temp = assert_fs::TempDir::new().unwrap();
    let (mut session, dest) = staged_session(&temp);
    let mut sink = MemorySink::new();

    assert_eq!(
        session.confirm_cleanup(true, &mut sink).unwrap(),
        CleanupOutcome::Deleted(dest.clone())
    );
    assert!(!dest.exists());
    assert_eq!(session.cleanup_state(), &CleanupState::Idle);

    // Recreate the folder: a second confirmation must not touch it.
    std::fs::create_dir_all(&dest).unwrap();
    assert_eq!(
        session.confirm_cleanup(true, &mut sink).unwrap(),
        CleanupOutcome::NothingToDelete
    );
    assert!(dest.exists());
    assert_eq!(
        sink.rendered(),
        vec!["[OK] Deleted moved folder", "[Info] Nothing to delete"]
    );
}

#[test]
fn target_removed_externally_reports_nothing_to_delete() {
    let temp = assert_fs::TempDir::new().unwrap();
    let (mut session, dest) = staged_session(&temp);
    std::fs::remove_dir_all(&dest).unwrap();

    let mut sink = MemorySink::new();
    assert_eq!(
        session.confirm_cleanup(true, &mut sink).unwrap(),
        CleanupOutcome::NothingToDelete
    );
    assert_eq!(session.pending_deletion(), Some(dest.as_path()));
}

#[test]
fn new_run_replaces_the_pending_target() {
    let temp = assert_fs::TempDir::new().unwrap();
    let (mut session, first) = staged_session(&temp);

    let src2 = temp.child("src2");
    src2.child("b.txt").write_str("b").unwrap();
    let second = temp.path().join("second");
    let req = StagingRequest {
        source: src2.path().to_path_buf(),
        folder_name: "New Folder".into(),
        destination: Some(second.clone()),
        fallback_volume: temp.path().to_path_buf(),
    };
    let mut sink = MemorySink::new();
    session.run_staging(&req, &mut sink).unwrap();

    session.confirm_cleanup(true, &mut sink).unwrap();
    assert!(first.exists());
    assert!(!second.exists());
}

#[cfg(unix)]
#[test]
fn failed_deletion_stays_armed_for_retry() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    // Root ignores directory permissions.
    if unsafe { libc::geteuid() } == 0 {
        eprintln!("Skipping: running as root");
        return;
    }

    let temp = assert_fs::TempDir::new().unwrap();
    let (mut session, dest) = staged_session(&temp);
    fs::create_dir_all(dest.join("locked")).unwrap();
    fs::write(dest.join("locked").join("f"), "f").unwrap();
    fs::set_permissions(dest.join("locked"), fs::Permissions::from_mode(0o500)).unwrap();

    let mut sink = MemorySink::new();
    let err = session.confirm_cleanup(true, &mut sink).unwrap_err();
    assert!(matches!(err, StageError::Deletion { .. }));
    assert_eq!(sink.count(LogTag::Error), 1);
    assert_eq!(session.pending_deletion(), Some(Path::new(&dest)));

    fs::set_permissions(dest.join("locked"), fs::Permissions::from_mode(0o700)).unwrap();
    assert_eq!(
        session.confirm_cleanup(true, &mut sink).unwrap(),
        CleanupOutcome::Deleted(dest.clone())
    );
    assert!(!dest.exists());
}
