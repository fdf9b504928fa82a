//! Data produced by a scan or an apply pass. Nothing here is persisted
//! except through an explicit plan file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A computed (original, proposed) pair, not yet applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameProposal {
    pub original: String,
    pub proposed: String,
}

impl RenameProposal {
    pub fn new(original: impl Into<String>, proposed: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            proposed: proposed.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Cleaning removed the whole stem; renaming would leave a bare extension.
    EmptyAfterCleaning,
    /// The rules operate on text; names that are not UTF-8 are left alone.
    NonUtf8Name,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyAfterCleaning => f.write_str("name would be empty after cleaning"),
            SkipReason::NonUtf8Name => f.write_str("name is not valid UTF-8"),
        }
    }
}

/// A file that was examined but produced no proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Lossy rendering for non-UTF-8 names.
    pub name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub directory: PathBuf,
    pub proposals: Vec<RenameProposal>,
    pub skipped: Vec<SkippedEntry>,
    /// True when the scan stopped early; `proposals` holds what was collected.
    pub cancelled: bool,
}

/// Why one rename did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameFailure {
    /// The proposed name is empty.
    EmptyName,
    /// A name that cannot live inside the directory (separator, `.`, `..`).
    InvalidName(String),
    /// A different file already has the proposed name.
    TargetExists,
    /// The original file is gone (renamed or deleted since the scan).
    SourceMissing,
    NotAFile,
    Io(String),
}

impl RenameFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            RenameFailure::EmptyName => "empty_name",
            RenameFailure::InvalidName(_) => "invalid_name",
            RenameFailure::TargetExists => "target_exists",
            RenameFailure::SourceMissing => "source_missing",
            RenameFailure::NotAFile => "not_a_file",
            RenameFailure::Io(_) => "io",
        }
    }
}

impl fmt::Display for RenameFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameFailure::EmptyName => f.write_str("proposed name is empty"),
            RenameFailure::InvalidName(reason) => write!(f, "invalid name: {reason}"),
            RenameFailure::TargetExists => f.write_str("a different file with the proposed name already exists"),
            RenameFailure::SourceMissing => f.write_str("original file no longer exists"),
            RenameFailure::NotAFile => f.write_str("original is not a regular file"),
            RenameFailure::Io(detail) => f.write_str(detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Renamed,
    Failed(RenameFailure),
}

/// Recorded result of attempting one rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub original: String,
    pub proposed: String,
    pub status: OutcomeStatus,
}

impl RenameOutcome {
    pub fn success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Renamed)
    }

    pub fn failure(&self) -> Option<&RenameFailure> {
        match &self.status {
            OutcomeStatus::Renamed => None,
            OutcomeStatus::Failed(f) => Some(f),
        }
    }

    pub fn error_detail(&self) -> Option<String> {
        self.failure().map(ToString::to_string)
    }
}

#[derive(Serialize)]
struct OutcomeRecord<'a> {
    original: &'a str,
    proposed: &'a str,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
}

impl Serialize for RenameOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeRecord {
            original: &self.original,
            proposed: &self.proposed,
            success: self.success(),
            error_kind: self.failure().map(RenameFailure::kind),
            error_detail: self.error_detail(),
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    pub outcomes: Vec<RenameOutcome>,
    /// True when the batch stopped early; later pairs were not attempted.
    pub cancelled: bool,
}

impl ApplyReport {
    pub fn renamed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.renamed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_flat_with_detail_only_on_failure() {
        let ok = RenameOutcome {
            original: "a_b.mp3".into(),
            proposed: "a b.mp3".into(),
            status: OutcomeStatus::Renamed,
        };
        let v = serde_json::to_value(&ok).unwrap();
        assert_eq!(v["success"], true);
        assert!(v.get("error_detail").is_none());

        let failed = RenameOutcome {
            status: OutcomeStatus::Failed(RenameFailure::TargetExists),
            ..ok
        };
        let v = serde_json::to_value(&failed).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error_kind"], "target_exists");
        assert!(v["error_detail"].as_str().unwrap().contains("already exists"));
    }
}
