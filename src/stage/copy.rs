//! Copy-then-delete fallback for moves that cross filesystems.
//! Files are copied with their timestamps and permissions; directory trees are
//! recreated, their files copied in parallel, then the source tree is removed.
//! A partially written target is removed before the error is returned.

use filetime::{FileTime, set_file_times};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::helpers::io_error_with_help;

/// Move `src` to `dest` by copying and then removing the source.
pub(super) fn copy_then_remove(src: &Path, dest: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(src).map_err(io_error_with_help("stat source", src))?;
    let ftype = meta.file_type();
    // Only a target this call created may be rolled back.
    let dest_existed = fs::symlink_metadata(dest).is_ok();

    if ftype.is_dir() {
        if let Err(e) = copy_tree(src, dest) {
            if !dest_existed {
                let _ = fs::remove_dir_all(dest);
            }
            return Err(e);
        }
        fs::remove_dir_all(src).map_err(io_error_with_help("remove source directory", src))?;
    } else {
        if ftype.is_symlink() {
            copy_symlink(src, dest)?;
        } else if let Err(e) = copy_file(src, dest) {
            if !dest_existed {
                let _ = fs::remove_file(dest);
            }
            return Err(e);
        }
        fs::remove_file(src).map_err(io_error_with_help("remove original file", src))?;
    }
    debug!(src = %src.display(), dest = %dest.display(), "Copied across filesystems and removed source");
    Ok(())
}

fn copy_tree(src_dir: &Path, target: &Path) -> io::Result<()> {
    let mut files = Vec::new();
    let mut links = Vec::new();

    for entry in WalkDir::new(src_dir) {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(src_dir)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let dst = target.join(rel);
        let ftype = entry.file_type();
        if ftype.is_dir() {
            fs::create_dir_all(&dst).map_err(io_error_with_help("create directory", &dst))?;
        } else if ftype.is_symlink() {
            links.push((entry.into_path(), dst));
        } else {
            files.push((entry.into_path(), dst));
        }
    }

    files
        .par_iter()
        .try_for_each(|(from, to)| copy_file(from, to))?;

    for (from, to) in &links {
        copy_symlink(from, to)?;
    }
    Ok(())
}

fn copy_file(src: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(src, dest).map_err(io_error_with_help("copy file to destination", dest))?;
    preserve_times(src, dest);
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(src).map_err(io_error_with_help("read symlink", src))?;
    std::os::unix::fs::symlink(&target, dest).map_err(io_error_with_help("create symlink", dest))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    // No portable way to recreate the link; copy what it points to.
    copy_file(src, dest)
}

fn preserve_times(src: &Path, dest: &Path) {
    let Ok(meta) = fs::metadata(src) else {
        return;
    };
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    if let Err(e) = set_file_times(dest, atime, mtime) {
        warn!(dest = %dest.display(), error = %e, "Could not carry over timestamps");
    }
}
