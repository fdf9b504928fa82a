//! Windows implementations of platform helpers.
//! There are no POSIX modes here and no ACL management; the mode setters are no-ops.

use anyhow::{bail, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::tmp_sibling_name;

pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Create a new config file through a temp sibling and rename. Refuses to
/// replace an existing file.
pub fn write_config_secure_new_0600(path: &Path, contents: &[u8]) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "config path has no parent"))?;
    fs::create_dir_all(parent)?;

    let tmp = tmp_sibling_name(path);
    let mut f = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
    f.write_all(contents)?;
    f.sync_all()?;
    drop(f);
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Rename without replacing an existing `dst`. `std::fs::rename` replaces on
/// Windows, so refuse up front when the target is already there.
pub fn rename_no_replace(src: &Path, dst: &Path) -> io::Result<()> {
    if fs::symlink_metadata(dst).is_ok() {
        return Err(io::Error::new(io::ErrorKind::AlreadyExists, "target already exists"));
    }
    fs::rename(src, dst)
}

pub fn set_dir_mode_0700(_path: &Path) -> io::Result<()> {
    Ok(())
}

pub fn set_file_mode_0600(_path: &Path) -> io::Result<()> {
    Ok(())
}
