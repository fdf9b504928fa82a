//! Directory scan: read-only pass that turns file names into rename proposals.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::{RenamerError, Result};
use crate::rules::RuleSet;
use crate::shutdown::CancelToken;

use super::clean::{decide, NameDecision};
use super::observer::Observer;
use super::report::{RenameProposal, ScanReport, SkipReason, SkippedEntry};

/// Existing, listable directory or a structural error.
pub(crate) fn ensure_directory(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(RenamerError::DirectoryNotFound(dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(RenamerError::DirectoryNotFound(dir.to_path_buf()))
        }
        Err(e) => Err(RenamerError::DirectoryNotReadable {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Propose a cleaned name for every regular file directly inside `dir`.
///
/// Entries are visited in byte order of their names so repeated scans of the
/// same snapshot produce the same list. Only stems are cleaned. Stops between
/// entries when `cancel` fires and returns what it has.
pub fn scan_directory(
    dir: &Path,
    rules: &RuleSet,
    cancel: &CancelToken,
    observer: &mut dyn Observer,
) -> Result<ScanReport> {
    ensure_directory(dir)?;

    let unreadable = |e: io::Error| RenamerError::DirectoryNotReadable {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    };
    let mut names: Vec<OsString> = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        match entry {
            Ok(entry) => names.push(entry.file_name()),
            Err(e) => warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry"),
        }
    }
    names.sort();
    debug!(dir = %dir.display(), entries = names.len(), rules = rules.len(), "Scanning directory");

    let mut report = ScanReport {
        directory: dir.to_path_buf(),
        proposals: Vec::new(),
        skipped: Vec::new(),
        cancelled: false,
    };

    for os_name in names {
        if cancel.is_cancelled() {
            info!(dir = %dir.display(), collected = report.proposals.len(), "Scan cancelled");
            observer.on_message("Scan cancelled; returning partial results");
            report.cancelled = true;
            break;
        }

        // Follows symlinks, so a link to a regular file counts as a file.
        if !dir.join(&os_name).is_file() {
            continue;
        }

        let Some(name) = os_name.to_str() else {
            let entry = SkippedEntry {
                name: os_name.to_string_lossy().into_owned(),
                reason: SkipReason::NonUtf8Name,
            };
            warn!(name = %entry.name, "Skipping non UTF-8 file name");
            observer.on_skipped(&entry);
            report.skipped.push(entry);
            continue;
        };

        match decide(name, rules) {
            NameDecision::Unchanged => {}
            NameDecision::Rename(proposed) => {
                let proposal = RenameProposal::new(name, proposed);
                debug!(original = %proposal.original, proposed = %proposal.proposed, "Proposed rename");
                observer.on_proposal(&proposal);
                report.proposals.push(proposal);
            }
            NameDecision::EmptyStem => {
                let entry = SkippedEntry {
                    name: name.to_string(),
                    reason: SkipReason::EmptyAfterCleaning,
                };
                warn!(name = %entry.name, "Cleaning would leave an empty name; skipping");
                observer.on_skipped(&entry);
                report.skipped.push(entry);
            }
        }
    }

    info!(
        dir = %dir.display(),
        proposals = report.proposals.len(),
        skipped = report.skipped.len(),
        "Scan complete"
    );
    Ok(report)
}
