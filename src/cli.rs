//! CLI definition and parsing.
//!
//! Notes:
//! - Global flags may appear before or after the subcommand.
//! - --debug is a shorthand for --log-level debug.
//! - `--log-json` switches log output to JSON; a subcommand's `--json` switches
//!   its report to JSON on stdout.

use clap::{Parser, Subcommand, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::types::{Config, LogLevel};

/// Clean up the file names of downloaded music.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Clean up file names of downloaded music tracks")]
pub struct Args {
    /// Config file to use instead of $TRACK_RENAMER_CONFIG / the OS default.
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override the rules database location.
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub rules_db: Option<PathBuf>,

    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[arg(long, help = "Print the config file location and effective settings, then exit")]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Propose new names for the files in a directory without touching them.
    Scan {
        /// Directory to scan (defaults to the configured music_dir).
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,

        /// Write the proposals to a plan file for review.
        #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
        plan_out: Option<PathBuf>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Rename files: scan and confirm, or apply a reviewed plan file.
    Apply {
        /// Directory to process (defaults to the configured music_dir).
        #[arg(value_hint = ValueHint::DirPath, conflicts_with = "plan")]
        dir: Option<PathBuf>,

        /// Apply the renames listed in a plan file.
        #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
        plan: Option<PathBuf>,

        /// Do not ask for confirmation.
        #[arg(short = 'y', long)]
        yes: bool,

        /// Check every rename but do not perform it.
        #[arg(long)]
        dry_run: bool,

        /// Print the outcomes as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show what the current rules do to the given names.
    Clean {
        #[arg(required = true, allow_hyphen_values = true, value_name = "NAME")]
        names: Vec<String>,
    },

    /// Manage the cleaning rules.
    Rules {
        #[command(subcommand)]
        action: RulesCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RulesCommand {
    /// List rules in application order.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Append a rule. Replacements may use \1, \g<1> or \g<name>.
    Add {
        #[arg(allow_hyphen_values = true)]
        pattern: String,
        #[arg(allow_hyphen_values = true, default_value = "")]
        replacement: String,
    },
    /// Delete a rule by id.
    Remove { id: i64 },
    /// Add rules from a JSON file, skipping duplicates and invalid patterns.
    Import {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// Write all rules to a JSON file.
    Export {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// Add the built-in default rules (existing patterns are kept).
    Seed,
}

impl Args {
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(db) = &self.rules_db {
            cfg.rules_db = db.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
    }
}

/// Directory argument with stray shell quotes removed, or the configured default.
pub fn target_dir(arg: Option<&Path>, cfg: &Config) -> PathBuf {
    match arg {
        Some(p) => sanitize_path(p),
        None => cfg.music_dir.clone(),
    }
}

/// Trim quotes left behind by PowerShell/CMD quoting, plus one trailing separator.
fn sanitize_path(p: &Path) -> PathBuf {
    let raw = p.to_string_lossy();
    let trimmed = raw.trim();
    let mut inner: String = trimmed.trim_matches(|c| c == '\'' || c == '"').to_string();
    if inner.len() > 1 && (inner.ends_with('\\') || inner.ends_with('/')) {
        inner.pop();
    }
    if inner == trimmed {
        return p.to_path_buf();
    }
    PathBuf::from(inner)
}

pub fn parse() -> Args {
    Args::parse()
}
