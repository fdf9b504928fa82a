//! Typed error definitions for track_renamer.
//! Structural failures only: per-file rename problems are reported as data
//! (see `engine::RenameFailure`), never through this type.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = RenamerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RenamerError {
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Pattern already exists: '{0}'")]
    DuplicatePattern(String),

    #[error("No rule with id {0}")]
    RuleNotFound(i64),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Cannot read directory {path}: {reason}")]
    DirectoryNotReadable { path: PathBuf, reason: String },

    #[error("Rule store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Rule file is not valid JSON: {0}")]
    Transfer(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RenamerError {
    /// Stable numeric code, used as a structured log field and as the process exit code.
    pub fn code(&self) -> i32 {
        match self {
            RenamerError::InvalidPattern { .. } => 10,
            RenamerError::DuplicatePattern(_) => 11,
            RenamerError::RuleNotFound(_) => 12,
            RenamerError::DirectoryNotFound(_) => 20,
            RenamerError::DirectoryNotReadable { .. } => 21,
            RenamerError::Store(_) => 30,
            RenamerError::Transfer(_) => 31,
            RenamerError::Io { .. } => 32,
        }
    }

    /// Short machine-friendly name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RenamerError::InvalidPattern { .. } => "invalid_pattern",
            RenamerError::DuplicatePattern(_) => "duplicate_pattern",
            RenamerError::RuleNotFound(_) => "rule_not_found",
            RenamerError::DirectoryNotFound(_) => "directory_not_found",
            RenamerError::DirectoryNotReadable { .. } => "directory_not_readable",
            RenamerError::Store(_) => "store",
            RenamerError::Transfer(_) => "transfer",
            RenamerError::Io { .. } => "io",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| RenamerError::Io { path, source }
    }
}
