//! Config validation.
//! The music folder is checked by each scan; here we only make sure the files
//! the program writes have somewhere to go.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::platform::set_dir_mode_0700;

use super::types::Config;

impl Config {
    /// Create the rules database directory if needed and reject paths that
    /// point at directories.
    pub fn validate(&self) -> Result<()> {
        ensure_file_slot(&self.rules_db, "rules_db")?;
        if let Some(log) = &self.log_file {
            ensure_file_slot(log, "log_file")?;
        }
        info!(
            music_dir = %self.music_dir.display(),
            rules_db = %self.rules_db.display(),
            log_file = %self
                .log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into()),
            "Config validated"
        );
        Ok(())
    }
}

/// `path` is a file or absent, and its parent exists (created 0700 if missing).
fn ensure_file_slot(path: &Path, name: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        bail!("{name} is empty");
    }
    if path.is_dir() {
        bail!("{name} '{}' is a directory; expected a file path", path.display());
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create {name} directory '{}'", parent.display()))?;
        let _ = set_dir_mode_0700(parent);
        debug!("Created {name} directory: {}", parent.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_db_parent() {
        let td = tempdir().unwrap();
        let mut cfg = Config::new(td.path(), td.path().join("nested").join("rules.db"));
        cfg.log_file = None;
        cfg.validate().unwrap();
        assert!(td.path().join("nested").is_dir());
    }

    #[test]
    fn rejects_directory_as_db() {
        let td = tempdir().unwrap();
        let mut cfg = Config::new(td.path(), td.path());
        cfg.log_file = None;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("rules_db"));
    }
}
