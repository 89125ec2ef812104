//! Unix implementations of platform helpers.
//! Volume listing here is Linux-only (`/proc/self/mounts`); macOS has its own module.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

#[cfg(target_os = "linux")]
use std::collections::HashSet;
#[cfg(target_os = "linux")]
use std::path::PathBuf;

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, its permissions are left as they are.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

/// Create `path` (which must not exist yet) with mode 0600 and write `contents`.
pub fn write_new_file_0600(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .custom_flags(libc::O_NOFOLLOW)
        .open(path)?;
    f.write_all(contents)?;
    f.sync_all()
}

/// Block-device filesystems mounted right now, in mount-table order.
#[cfg(target_os = "linux")]
pub fn list_volumes() -> Vec<PathBuf> {
    let Ok(mounts) = fs::read_to_string("/proc/self/mounts") else {
        return Vec::new();
    };
    let known = fs::read_to_string("/proc/filesystems")
        .map(|s| parse_block_filesystems(&s))
        .unwrap_or_default();
    parse_mounts(&mounts, &known)
}

#[cfg(target_os = "linux")]
const OPTICAL_FS: &[&str] = &["iso9660", "udf"];

/// Filesystem types from `/proc/filesystems` that are not marked `nodev`.
#[cfg(target_os = "linux")]
pub(crate) fn parse_block_filesystems(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .filter_map(|line| {
            let (flag, name) = line.split_once('\t')?;
            let name = name.trim();
            (flag.trim() != "nodev" && !name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// Mount points whose filesystem type is in `block_fs` and not optical.
/// When `block_fs` is empty (no /proc/filesystems), any mount backed by a `/dev` device counts.
#[cfg(target_os = "linux")]
pub(crate) fn parse_mounts(contents: &str, block_fs: &HashSet<String>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for line in contents.lines() {
        let mut fields = line.split_whitespace();
        let (Some(device), Some(mount_point), Some(fstype)) = (fields.next(), fields.next(), fields.next()) else {
            continue;
        };
        if device == "none" || OPTICAL_FS.contains(&fstype) {
            continue;
        }
        let recognized = if block_fs.is_empty() {
            device.starts_with("/dev/")
        } else {
            block_fs.contains(fstype)
        };
        if !recognized {
            continue;
        }
        let mount_point = PathBuf::from(unescape_mount_field(mount_point));
        if seen.insert(mount_point.clone()) {
            out.push(mount_point);
        }
    }
    out
}

/// Undo the kernel's octal escaping in mount table fields (`\040` is a space).
#[cfg(target_os = "linux")]
fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let octal = bytes
            .get(i + 1..i + 4)
            .filter(|d| bytes[i] == b'\\' && d.iter().all(|b| (b'0'..=b'7').contains(b)))
            .map(|d| d.iter().fold(0u16, |acc, b| acc * 8 + u16::from(b - b'0')))
            .and_then(|v| u8::try_from(v).ok());
        match octal {
            Some(value) => {
                out.push(value);
                i += 4;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
