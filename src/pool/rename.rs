//! Atomic move that never overwrites its target

use std::io;
use std::path::Path;

/// Atomic rename that fails (instead of overwriting) when the target
/// already exists. Uses Linux `renameat2(RENAME_NOREPLACE)`.
///
/// Falls back to a checked rename on filesystems that reject the flag.
#[cfg(target_os = "linux")]
#[allow(unsafe_code)]
pub fn rename_noreplace(source: &Path, target: &Path) -> io::Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let source_c = CString::new(source.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let target_c = CString::new(target.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: both pointers come from live CStrings and AT_FDCWD resolves
    // relative paths against the working directory. The kernel only reads
    // the two path strings.
    let ret = unsafe {
        libc::renameat2(
            libc::AT_FDCWD,
            source_c.as_ptr(),
            libc::AT_FDCWD,
            target_c.as_ptr(),
            libc::RENAME_NOREPLACE,
        )
    };
    if ret == 0 {
        return Ok(());
    }

    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::EINVAL | libc::ENOSYS) => checked_rename(source, target),
        _ => Err(err),
    }
}

#[cfg(not(target_os = "linux"))]
pub fn rename_noreplace(source: &Path, target: &Path) -> io::Result<()> {
    checked_rename(source, target)
}

/// Check-then-rename with an inherent window between the checks and the rename
///
/// The source is checked first so that a mover who lost the source to a
/// racing mover sees `NotFound`, as with `renameat2`. Racing moves of the
/// same source are still settled by the rename itself; only the
/// no-overwrite guarantee is best effort here.
fn checked_rename(source: &Path, target: &Path) -> io::Result<()> {
    source.symlink_metadata()?;
    if target.symlink_metadata().is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", target.display()),
        ));
    }
    std::fs::rename(source, target)
}
