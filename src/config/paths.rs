//! Default path helpers and symlink checks.
//!
//! When `TRACK_RENAMER_CONFIG` is set, the log file and rules database default
//! to the directory holding that config file, so one variable relocates
//! everything the program writes.

use anyhow::{anyhow, Context, Result};
use dirs::{config_dir, data_dir, home_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::MUSIC_DIR_DEFAULT;

pub const CONFIG_ENV_VAR: &str = "TRACK_RENAMER_CONFIG";
const APP_DIR: &str = "track_renamer";

/// Config path from `TRACK_RENAMER_CONFIG`, made absolute. A directory gets
/// `config.xml` appended.
fn env_config_path() -> Result<Option<PathBuf>> {
    let Some(raw) = env::var_os(CONFIG_ENV_VAR) else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    let mut p = PathBuf::from(raw);
    if p.is_relative() {
        let cwd = env::current_dir().context("resolve current directory")?;
        p = cwd.join(p);
    }
    if p.is_dir() {
        p.push("config.xml");
    }
    Ok(Some(p))
}

/// Config location: `$TRACK_RENAMER_CONFIG`, else the OS config directory.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = env_config_path()? {
        return Ok(p);
    }
    config_dir()
        .or_else(|| home_dir().map(|h| h.join(".config")))
        .map(|base| base.join(APP_DIR).join("config.xml"))
        .ok_or_else(|| anyhow!("cannot determine a config directory (no HOME)"))
}

/// Directory for program data: next to an env-selected config, else the OS data dir.
fn data_base() -> Result<PathBuf> {
    if let Some(cfg) = env_config_path()?
        && let Some(parent) = cfg.parent()
    {
        return Ok(parent.to_path_buf());
    }
    data_dir()
        .or_else(|| home_dir().map(|h| h.join(".local").join("share")))
        .map(|base| base.join(APP_DIR))
        .ok_or_else(|| anyhow!("cannot determine a data directory (no HOME)"))
}

pub fn default_log_path() -> Result<PathBuf> {
    Ok(data_base()?.join("track_renamer.log"))
}

pub fn default_rules_db_path() -> Result<PathBuf> {
    Ok(data_base()?.join("rules.db"))
}

/// `$HOME/Documents/Downloaded Music`, or the relative form when HOME is unknown.
pub fn default_music_dir() -> PathBuf {
    match home_dir() {
        Some(h) => h.join(MUSIC_DIR_DEFAULT),
        None => PathBuf::from(MUSIC_DIR_DEFAULT),
    }
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() && fs::symlink_metadata(anc)?.file_type().is_symlink() {
            return Ok(true);
        }
        p = anc.parent();
    }
    Ok(false)
}
