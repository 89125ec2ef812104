//! Archive normalization.
//! A `.zip` source is extracted into a fresh temporary directory; anything else
//! is passed through unchanged. The original archive is only ever read.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::errors::StageError;
use crate::sink::LogSink;

use super::helpers::io_error_message;

/// Name prefix of extraction directories.
pub const EXTRACT_PREFIX: &str = "unzipped_";

/// The directory whose immediate children get moved.
#[derive(Debug)]
pub enum StagingArea {
    /// The source directory itself.
    Direct(PathBuf),
    /// A temporary extraction directory owned by the current run.
    /// Dropping it removes the directory.
    Extracted(TempDir),
}

impl StagingArea {
    pub fn path(&self) -> &Path {
        match self {
            StagingArea::Direct(p) => p,
            StagingArea::Extracted(dir) => dir.path(),
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self, StagingArea::Extracted(_))
    }
}

/// Case-insensitive `.zip` extension check.
pub fn is_zip_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Return the directory to move from, extracting `source` first when it is a zip.
///
/// `temp_root` overrides where extraction directories are created (system temp dir by default).
/// Existence of `source` is the caller's responsibility.
pub fn normalize_source(
    source: &Path,
    temp_root: Option<&Path>,
    sink: &mut dyn LogSink,
) -> Result<StagingArea, StageError> {
    if !is_zip_path(source) {
        debug!(path = %source.display(), "Source is not an archive; using it directly");
        return Ok(StagingArea::Direct(source.to_path_buf()));
    }

    let mut builder = tempfile::Builder::new();
    builder.prefix(EXTRACT_PREFIX);
    let created = match temp_root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    };
    let tempdir = created.map_err(|e| StageError::Archive {
        path: source.to_path_buf(),
        reason: io_error_message("create temporary directory", temp_root.unwrap_or(Path::new("<temp>")), &e),
    })?;

    sink.ok(format!("Unzipping to {}", tempdir.path().display()));
    info!(archive = %source.display(), dest = %tempdir.path().display(), "Extracting archive");

    // On error `tempdir` drops here and takes the partial extraction with it.
    extract_zip(source, tempdir.path(), sink)?;
    Ok(StagingArea::Extracted(tempdir))
}

/// Extract every entry of `archive` below `target`, preserving relative paths.
fn extract_zip(archive: &Path, target: &Path, sink: &mut dyn LogSink) -> Result<(), StageError> {
    let fail = |reason: String| StageError::Archive {
        path: archive.to_path_buf(),
        reason,
    };

    let file = File::open(archive).map_err(|e| fail(io_error_message("open archive", archive, &e)))?;
    let mut zip = ZipArchive::new(file).map_err(|e| fail(format!("not a valid zip archive: {e}")))?;

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| fail(format!("cannot read entry #{index}: {e}")))?;

        let Some(rel) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "Skipping archive entry with unsafe path");
            sink.warn(format!("Skipped unsafe archive entry {}", entry.name()));
            continue;
        };
        let dest = target.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&dest).map_err(|e| fail(io_error_message("create directory", &dest, &e)))?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| fail(io_error_message("create directory", parent, &e)))?;
        }
        let mut out = File::create(&dest).map_err(|e| fail(io_error_message("create file", &dest, &e)))?;
        io::copy(&mut entry, &mut out).map_err(|e| fail(io_error_message("write file", &dest, &e)))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            // Keep the owner able to move and later delete what was extracted.
            let perms = fs::Permissions::from_mode((mode & 0o7777) | 0o600);
            if let Err(e) = fs::set_permissions(&dest, perms) {
                warn!(path = %dest.display(), error = %e, "Could not apply archived permissions");
            }
        }
    }

    debug!(archive = %archive.display(), entries = zip.len(), "Archive extracted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{LogTag, MemorySink};
    use std::io::Write;

    #[test]
    fn zip_extension_is_case_insensitive() {
        assert!(is_zip_path(Path::new("a/b/archive.zip")));
        assert!(is_zip_path(Path::new("ARCHIVE.ZIP")));
        assert!(is_zip_path(Path::new("Mixed.Zip")));
        assert!(!is_zip_path(Path::new("archive.zip.txt")));
        assert!(!is_zip_path(Path::new("folder")));
        assert!(!is_zip_path(Path::new(".zip")));
    }

    #[test]
    fn directory_passes_through_without_logging() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = MemorySink::new();
        let area = normalize_source(dir.path(), None, &mut sink).unwrap();
        assert!(!area.is_extracted());
        assert_eq!(area.path(), dir.path());
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn extracts_nested_entries_into_fresh_dir() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("pack.zip");
        {
            let mut zw = zip::ZipWriter::new(File::create(&archive).unwrap());
            let opts = zip::write::SimpleFileOptions::default();
            zw.add_directory("docs/", opts).unwrap();
            zw.start_file("docs/readme.md", opts).unwrap();
            zw.write_all(b"# hi").unwrap();
            zw.start_file("top.txt", opts).unwrap();
            zw.write_all(b"top").unwrap();
            zw.finish().unwrap();
        }

        let temp_root = dir.path().join("tmp");
        fs::create_dir_all(&temp_root).unwrap();
        let mut sink = MemorySink::new();
        let area = normalize_source(&archive, Some(&temp_root), &mut sink).unwrap();

        assert!(area.is_extracted());
        assert!(area.path().starts_with(&temp_root));
        assert_eq!(fs::read_to_string(area.path().join("docs/readme.md")).unwrap(), "# hi");
        assert_eq!(fs::read_to_string(area.path().join("top.txt")).unwrap(), "top");
        assert!(archive.exists(), "original archive must be left alone");
        assert_eq!(sink.count(LogTag::Ok), 1);
        assert!(sink.lines()[0].message.starts_with("Unzipping to"));

        let extracted = area.path().to_path_buf();
        drop(area);
        assert!(!extracted.exists());
    }

    #[test]
    fn corrupt_archive_is_archive_error_and_leaves_no_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();
        let temp_root = dir.path().join("tmp");
        fs::create_dir_all(&temp_root).unwrap();

        let mut sink = MemorySink::new();
        let err = normalize_source(&archive, Some(&temp_root), &mut sink).unwrap_err();

        assert!(matches!(err, StageError::Archive { .. }));
        assert_eq!(fs::read_dir(&temp_root).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn archived_mode_keeps_owner_read_write() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("modes.zip");
        {
            let mut zw = zip::ZipWriter::new(File::create(&archive).unwrap());
            let shared = zip::write::SimpleFileOptions::default().unix_permissions(0o640);
            zw.start_file("shared.txt", shared).unwrap();
            zw.write_all(b"s").unwrap();
            let locked = zip::write::SimpleFileOptions::default().unix_permissions(0o400);
            zw.start_file("locked.txt", locked).unwrap();
            zw.write_all(b"l").unwrap();
            zw.finish().unwrap();
        }

        let mut sink = MemorySink::new();
        let area = normalize_source(&archive, Some(dir.path()), &mut sink).unwrap();
        let mode = |name: &str| fs::metadata(area.path().join(name)).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode("shared.txt"), 0o640);
        assert_eq!(mode("locked.txt"), 0o600);
    }
}
