//! Core library for `track_renamer`.
//!
//! Cleans the file names of downloaded music with an ordered list of regex
//! rules. A scan proposes new names, the caller approves some of them, and
//! the applier renames the approved files one by one, reporting each result.
//!
//! Modules:
//! - rules: rule records, validation, SQLite/in-memory stores, JSON import/export
//! - engine: name cleaning, directory scan, rename application, plan files
//! - config: XML config, default paths, validation
//! - platform: owner-only file creation helpers
//! - output / cli: user-facing printing and argument parsing for the binary

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod output;
pub mod platform;
pub mod rules;
pub mod shutdown;

pub use config::types::{Config, LogLevel};
pub use config::{
    default_config_path, default_log_path, default_rules_db_path, load_config_from_xml_path,
    path_has_symlink_ancestor,
};
pub use engine::{
    apply_renames, clean_name, scan_directory, split_name, ApplyOptions, ApplyReport, Observer,
    OutcomeStatus, RenameFailure, RenameOutcome, RenamePlan, RenameProposal, ScanReport,
    SkipReason, SkippedEntry,
};
pub use errors::{RenamerError, Result};
pub use rules::{MemoryRuleStore, NewRule, Rule, RuleSet, RuleStore, SqliteRuleStore};
pub use shutdown::CancelToken;
