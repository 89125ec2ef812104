//! Platform-specific helpers.
//! Hides OS differences behind a uniform API: volume enumeration for picking a
//! destination root, and owner-only file creation for logs and config templates.

use std::path::{Path, PathBuf};

#[cfg(unix)]
mod unix;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{open_log_file_secure_append, write_new_file_0600};

#[cfg(not(unix))]
pub use windows::{open_log_file_secure_append, write_new_file_0600};

#[cfg(target_os = "linux")]
pub use unix::list_volumes;

#[cfg(target_os = "macos")]
pub use macos::list_volumes;

#[cfg(windows)]
pub use windows::list_volumes;

/// Mounted, non-optical storage roots. Empty when the OS query is unavailable.
#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
pub fn list_volumes() -> Vec<PathBuf> {
    Vec::new()
}

/// Root used when no volume can be listed.
#[cfg(windows)]
pub const FALLBACK_VOLUME: &str = "C:\\";
#[cfg(not(windows))]
pub const FALLBACK_VOLUME: &str = "/";

/// Volume picked when nothing is configured and it is mounted.
#[cfg(windows)]
pub const PREFERRED_VOLUME: Option<&str> = Some("D:\\");
#[cfg(not(windows))]
pub const PREFERRED_VOLUME: Option<&str> = None;

/// Pick the default destination root: `preferred` if it is among `volumes`,
/// else the first listed volume, else `FALLBACK_VOLUME`.
pub fn choose_default_volume(volumes: &[PathBuf], preferred: Option<&Path>) -> PathBuf {
    if let Some(p) = preferred
        && volumes.iter().any(|v| v == p)
    {
        return p.to_path_buf();
    }
    volumes
        .first()
        .cloned()
        .unwrap_or_else(|| PathBuf::from(FALLBACK_VOLUME))
}
