//! Filename normalization engine: clean, scan, apply.

mod apply;
mod clean;
mod helpers;
mod observer;
mod plan;
mod report;
mod scan;
mod split;

pub use apply::{apply_renames, ApplyOptions};
pub use clean::{clean_name, decide, NameDecision};
pub use observer::Observer;
pub use plan::RenamePlan;
pub use report::{
    ApplyReport, OutcomeStatus, RenameFailure, RenameOutcome, RenameProposal, ScanReport,
    SkipReason, SkippedEntry,
};
pub use scan::scan_directory;
pub use split::split_name;
