//! I/O helper utilities.
//!
//! Turns io::Error values into one-line, actionable reasons that name the
//! operation and path. The batch mover stores these reasons in its per-item
//! records; the orchestrator uses them for fatal errors.
//!
//! Usage:
//!   let reason = io_error_message("move", &src, &err);

use std::io;
use std::path::Path;

/// Format a human-friendly message with op/path plus platform-aware hints.
pub fn io_error_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" (permission denied; check ownership and write permissions)");
                }
                libc::EXDEV => {
                    msg.push_str(" (cross-filesystem; rename not possible)");
                }
                libc::EBUSY => {
                    msg.push_str(" (resource busy; another process is using it)");
                }
                libc::ENOENT => {
                    msg.push_str(" (path not found)");
                }
                libc::EEXIST | libc::ENOTEMPTY => {
                    msg.push_str(" (destination already exists)");
                }
                libc::ENOSPC => {
                    msg.push_str(" (insufficient space on device)");
                }
                libc::EROFS => {
                    msg.push_str(" (read-only filesystem)");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str(" (filename or path too long)");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" (access denied; check permissions)"), // ERROR_ACCESS_DENIED
                17 => msg.push_str(" (not same device; cross-filesystem move)"), // ERROR_NOT_SAME_DEVICE
                32 => msg.push_str(" (sharing violation; file is in use)"), // ERROR_SHARING_VIOLATION
                2 | 3 => msg.push_str(" (path not found)"), // FILE/PATH NOT FOUND
                80 | 183 => msg.push_str(" (destination already exists)"), // FILE_EXISTS / ALREADY_EXISTS
                112 => msg.push_str(" (insufficient disk space)"), // ERROR_DISK_FULL
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" (permission denied; check ownership and write permissions)");
            }
            io::ErrorKind::NotFound => msg.push_str(" (path not found)"),
            io::ErrorKind::AlreadyExists => msg.push_str(" (destination already exists)"),
            _ => {}
        }
    }

    msg
}

/// Adapter for `.map_err(...)`: keeps the original ErrorKind, enriches the message.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), io_error_message(op, path, &e))
}

/// True when a rename failed only because source and target live on different filesystems.
pub(crate) fn is_cross_device(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::CrossesDevices {
        return true;
    }
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        // ERROR_NOT_SAME_DEVICE
        #[cfg(windows)]
        Some(code) => code == 17,
        #[cfg(not(any(unix, windows)))]
        Some(_) => false,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notfound_hint_includes_op_and_path() {
        let p = Path::new("/nonexistent/path/for/test");
        let msg = io_error_message("open", p, &io::Error::from(io::ErrorKind::NotFound));
        assert!(msg.contains("open"));
        assert!(msg.contains("/nonexistent/path/for/test"));
        assert!(msg.contains("path not found"));
    }

    #[cfg(unix)]
    #[test]
    fn enospc_hint_and_code() {
        let msg = io_error_message("write", Path::new("/tmp"), &io::Error::from_raw_os_error(libc::ENOSPC));
        assert!(msg.contains("insufficient space"), "msg was: {msg}");
        assert!(msg.contains("os code"));
    }

    #[test]
    fn adapter_preserves_kind() {
        let wrap = io_error_with_help("create", Path::new("/tmp/test.txt"));
        let wrapped = wrap(io::Error::from(io::ErrorKind::AlreadyExists));
        assert_eq!(wrapped.kind(), io::ErrorKind::AlreadyExists);
        assert!(wrapped.to_string().contains("already exists"));
    }

    #[cfg(unix)]
    #[test]
    fn exdev_is_cross_device() {
        assert!(is_cross_device(&io::Error::from_raw_os_error(libc::EXDEV)));
        assert!(!is_cross_device(&io::Error::from_raw_os_error(libc::EACCES)));
        assert!(!is_cross_device(&io::Error::other("plain")));
    }
}
