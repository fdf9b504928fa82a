//! Platform-specific helpers.
//! Log and config files are created owner-only where the OS has a notion of
//! modes; the rest of the crate calls these without caring which OS it is on.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    open_log_file_secure_append, rename_no_replace, set_dir_mode_0700, set_file_mode_0600,
    write_config_secure_new_0600,
};

#[cfg(not(unix))]
pub use windows::{
    open_log_file_secure_append, rename_no_replace, set_dir_mode_0700, set_file_mode_0600,
    write_config_secure_new_0600,
};

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique hidden sibling of `target` for write-then-rename.
/// Pattern: .track_renamer.tmp.<pid>.<nanos>.<seq>
pub(crate) fn tmp_sibling_name(target: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let name = format!(".track_renamer.tmp.{pid}.{nanos}.{seq}");
    target.parent().unwrap_or_else(|| Path::new(".")).join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn sibling_names_are_unique_across_threads() {
        let handles: Vec<_> = (0..16)
            .map(|_| thread::spawn(|| tmp_sibling_name(Path::new("/tmp/config.xml"))))
            .collect();
        let names: HashSet<PathBuf> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(names.len(), 16);
        assert!(names.iter().all(|p| p.parent() == Some(Path::new("/tmp"))));
    }
}
