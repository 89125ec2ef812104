//! macOS volume listing via getmntinfo(3).

use std::ffi::CStr;
use std::path::PathBuf;

/// Filesystem types that are never a sensible destination root.
const SKIPPED_FS: &[&str] = &["devfs", "autofs", "cd9660", "udf", "nullfs"];

/// Mounted, non-optical volumes as reported by the kernel, in mount order.
pub fn list_volumes() -> Vec<PathBuf> {
    let mut buf: *mut libc::statfs = std::ptr::null_mut();
    // SAFETY: getmntinfo fills `buf` with a pointer to `count` entries in storage
    // owned by libc; it stays valid until the next getmntinfo call on this thread.
    let count = unsafe { libc::getmntinfo(&mut buf, libc::MNT_NOWAIT) };
    if count <= 0 || buf.is_null() {
        return Vec::new();
    }
    let entries = unsafe { std::slice::from_raw_parts(buf, count as usize) };

    let mut out: Vec<PathBuf> = Vec::new();
    for entry in entries {
        // SAFETY: both fields are NUL-terminated fixed-size C strings.
        let fstype = unsafe { CStr::from_ptr(entry.f_fstypename.as_ptr()) }.to_string_lossy();
        let mount = unsafe { CStr::from_ptr(entry.f_mntonname.as_ptr()) }.to_string_lossy();
        if fstype.is_empty() || SKIPPED_FS.contains(&fstype.as_ref()) {
            continue;
        }
        let mount = PathBuf::from(mount.as_ref());
        if !out.contains(&mount) {
            out.push(mount);
        }
    }
    out
}
