//! I/O helper utilities.
//!
//! Turns io::Error into a one-line, human-readable reason with actionable hints.
//! Used for per-file rename failures, which are reported as data rather than
//! propagated.

use std::io;
use std::path::Path;

/// Format "<op> '<path>': <error> - <hint> [os code: N]".
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" - permission denied; check ownership and write permissions.");
                }
                libc::EXDEV => {
                    msg.push_str(" - cross-filesystem; rename within one directory only.");
                }
                libc::EBUSY => {
                    msg.push_str(" - resource busy; ensure no other process is using the file.");
                }
                libc::ENOENT => {
                    msg.push_str(" - path not found; it may have been moved since the scan.");
                }
                libc::EEXIST | libc::ENOTEMPTY => {
                    msg.push_str(" - target already exists.");
                }
                libc::EROFS => {
                    msg.push_str(" - read-only filesystem.");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str(" - file name too long; add a rule that shortens it.");
                }
                libc::EINVAL => {
                    msg.push_str(" - name not accepted by this filesystem.");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" - access denied; check permissions."),
                32 => msg.push_str(" - sharing violation; file is in use."),
                2 | 3 => msg.push_str(" - path not found; it may have been moved since the scan."),
                80 | 183 => msg.push_str(" - target already exists."),
                123 => msg.push_str(" - name not accepted by this filesystem."),
                206 => msg.push_str(" - file name too long (MAX_PATH exceeded)."),
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" - permission denied; check ownership and write permissions.");
            }
            io::ErrorKind::NotFound => {
                msg.push_str(" - path not found; it may have been moved since the scan.");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str(" - target already exists.");
            }
            _ => {}
        }
    }

    msg
}

/// Persist directory entry changes (best-effort; no-op off Unix).
#[cfg(unix)]
pub(crate) fn fsync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub(crate) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_operation_and_path() {
        let e = io::Error::new(io::ErrorKind::NotFound, "gone");
        let msg = describe_io_error("rename", Path::new("/music/a.mp3"), &e);
        assert!(msg.starts_with("rename '/music/a.mp3': gone"));
        assert!(msg.contains("moved since the scan"));
    }

    #[cfg(unix)]
    #[test]
    fn os_errors_carry_code() {
        let e = io::Error::from_raw_os_error(libc::EACCES);
        let msg = describe_io_error("rename", Path::new("x"), &e);
        assert!(msg.contains("permission denied"));
        assert!(msg.contains(&format!("[os code: {}]", libc::EACCES)));
    }
}
