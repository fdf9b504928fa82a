//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template when the default file is missing.
//!
//! Unknown elements are rejected so a typo never silently falls back to a default.

use anyhow::{bail, Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{
    default_config_path, default_log_path, default_music_dir, default_rules_db_path,
    path_has_symlink_ancestor, CONFIG_ENV_VAR,
};
use super::types::{Config, LogLevel};
use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

/// Mirrors the `<config>` element.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    music_dir: Option<String>,
    rules_db: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    seed_defaults: Option<String>,
}

/// What `load_or_init` found at the resolved config location.
#[derive(Debug)]
pub enum LoadResult {
    /// Parsed from the given file
    Loaded(Config, PathBuf),
    /// No file existed, so a template was written there; defaults are in use
    CreatedTemplate(Config, PathBuf),
    /// No file and no template (env-selected path, or the template write failed)
    Defaults(Config),
}

impl LoadResult {
    pub fn into_config(self) -> Config {
        match self {
            LoadResult::Loaded(c, _) | LoadResult::CreatedTemplate(c, _) | LoadResult::Defaults(c) => c,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => bail!("{field}: expected true or false, got '{other}'"),
    }
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.music_dir.as_deref()) {
        cfg.music_dir = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.rules_db.as_deref()) {
        cfg.rules_db = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = non_empty(parsed.seed_defaults.as_deref()) {
        cfg.seed_defaults = parse_bool("seed_defaults", s)?;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file. Empty elements keep their defaults.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

/// Resolve and load the config file.
///
/// An explicit path must exist. A missing env-selected file means defaults.
/// A missing default file gets a template written in its place.
pub fn load_or_init(explicit: Option<&Path>) -> Result<LoadResult> {
    if let Some(p) = explicit {
        if !p.exists() {
            bail!("config file not found: {}", p.display());
        }
        let cfg = load_config_from_xml_path(p)?;
        return Ok(LoadResult::Loaded(cfg, p.to_path_buf()));
    }

    let path = default_config_path()?;
    if path.exists() {
        let cfg = load_config_from_xml_path(&path)?;
        return Ok(LoadResult::Loaded(cfg, path));
    }

    if std::env::var_os(CONFIG_ENV_VAR).is_some() {
        debug!(path = %path.display(), "{CONFIG_ENV_VAR} points at a missing file; using defaults");
        return Ok(LoadResult::Defaults(Config::default()));
    }

    match create_template_config(&path) {
        Ok(()) => Ok(LoadResult::CreatedTemplate(Config::default(), path)),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Could not write template config");
            Ok(LoadResult::Defaults(Config::default()))
        }
    }
}

/// Write a commented template config. The parent directory is created 0700
/// and the file 0600; a symlinked ancestor is refused.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = set_dir_mode_0700(parent);
    }

    let display_or = |p: Result<PathBuf>, fallback: &str| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|_| fallback.to_string())
    };
    let rules_db = display_or(default_rules_db_path(), "/path/to/rules.db");
    let log_file = display_or(default_log_path(), "/path/to/track_renamer.log");

    let content = format!(
        "<!--\n  track_renamer configuration (XML)\n\n    music_dir      -> folder scanned when no directory is given on the command line\n    rules_db       -> SQLite file holding the cleaning rules\n    log_level      -> quiet | normal | info | debug\n    log_file       -> path to log file (optional; stderr is still used)\n    seed_defaults  -> load the built-in rules when the rules database is first created\n\n  CLI flags override XML values.\n-->\n<config>\n  <music_dir>{}</music_dir>\n  <rules_db>{}</rules_db>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n  <seed_defaults>true</seed_defaults>\n</config>\n",
        default_music_dir().display(),
        rules_db,
        log_file,
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}
