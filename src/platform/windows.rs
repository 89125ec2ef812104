//! Windows implementations of platform helpers (best-effort, no ACL management).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::iter::once;
use std::path::{Path, PathBuf};
use std::ptr::null_mut;

use windows_sys::Win32::Storage::FileSystem::{GetDriveTypeW, GetLogicalDrives, GetVolumeInformationW};

// GetDriveTypeW return values.
const DRIVE_NO_ROOT_DIR: u32 = 1;
const DRIVE_CDROM: u32 = 5;

/// Open log file for appending (no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Create `path` (which must not exist yet) and write `contents`. No mode bits on Windows.
pub fn write_new_file_0600(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut f = OpenOptions::new().write(true).create_new(true).open(path)?;
    f.write_all(contents)?;
    f.sync_all()
}

/// Drive roots (`C:\`, `D:\`, ...) that are not optical and report a filesystem.
pub fn list_volumes() -> Vec<PathBuf> {
    // SAFETY: no arguments; returns a bitmask of available drive letters.
    let mask = unsafe { GetLogicalDrives() };
    (0u32..26)
        .filter(|bit| mask & (1 << bit) != 0)
        .filter_map(|bit| {
            let root = format!("{}:\\", char::from(b'A' + bit as u8));
            usable_drive(&root).then(|| PathBuf::from(root))
        })
        .collect()
}

fn usable_drive(root: &str) -> bool {
    let wide: Vec<u16> = root.encode_utf16().chain(once(0)).collect();
    // SAFETY: `wide` is a NUL-terminated UTF-16 string that outlives the call.
    let kind = unsafe { GetDriveTypeW(wide.as_ptr()) };
    if kind == DRIVE_NO_ROOT_DIR || kind == DRIVE_CDROM {
        return false;
    }
    let mut fs_name = [0u16; 64];
    // SAFETY: unused out-params are null; the name buffer length matches its size.
    let ok = unsafe {
        GetVolumeInformationW(
            wide.as_ptr(),
            null_mut(),
            0,
            null_mut(),
            null_mut(),
            null_mut(),
            fs_name.as_mut_ptr(),
            fs_name.len() as u32,
        )
    };
    ok != 0 && fs_name[0] != 0
}
