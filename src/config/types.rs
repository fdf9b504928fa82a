//! Core configuration types.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::paths;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    #[default]
    Normal,
    /// Per-file detail
    Info,
    Debug,
}

impl LogLevel {
    /// Case-insensitive; accepts a few common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for the renamer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory scanned when a command is given no explicit directory
    pub music_dir: PathBuf,
    /// SQLite file holding the rule list
    pub rules_db: PathBuf,
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Load the built-in rules into a freshly created rules database
    pub seed_defaults: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_dir: paths::default_music_dir(),
            rules_db: paths::default_rules_db_path()
                .unwrap_or_else(|_| PathBuf::from("rules.db")),
            log_level: LogLevel::Normal,
            log_file: paths::default_log_path().ok(),
            seed_defaults: true,
        }
    }
}

impl Config {
    /// Explicit music folder and rules database; other fields use defaults.
    pub fn new(music_dir: impl Into<PathBuf>, rules_db: impl Into<PathBuf>) -> Self {
        Self {
            music_dir: music_dir.into(),
            rules_db: rules_db.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "music_dir     = {}", self.music_dir.display())?;
        writeln!(f, "rules_db      = {}", self.rules_db.display())?;
        writeln!(f, "log_level     = {}", self.log_level)?;
        match &self.log_file {
            Some(p) => writeln!(f, "log_file      = {}", p.display())?,
            None => writeln!(f, "log_file      = <none>")?,
        }
        write!(f, "seed_defaults = {}", self.seed_defaults)
    }
}
