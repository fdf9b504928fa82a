//! Apply approved renames inside one directory.
//! Every pair gets an outcome; a failed pair never stops the batch.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::platform::rename_no_replace;
use crate::shutdown::CancelToken;

use super::helpers::{describe_io_error, fsync_dir};
use super::observer::Observer;
use super::report::{ApplyReport, OutcomeStatus, RenameFailure, RenameOutcome, RenameProposal};
use super::scan::ensure_directory;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Run every check but leave the filesystem untouched.
    pub dry_run: bool,
}

/// Rename each approved pair in order, collecting one outcome per attempted pair.
///
/// Collisions with a different existing file are reported, never overwritten or
/// renamed around. Earlier successes are kept when a later pair fails. Checks
/// `cancel` before each pair and returns the outcomes so far when it fires.
pub fn apply_renames(
    dir: &Path,
    approved: &[RenameProposal],
    options: &ApplyOptions,
    cancel: &CancelToken,
    observer: &mut dyn Observer,
) -> Result<ApplyReport> {
    ensure_directory(dir)?;

    let mut report = ApplyReport::default();
    for pair in approved {
        if cancel.is_cancelled() {
            info!(
                dir = %dir.display(),
                done = report.outcomes.len(),
                remaining = approved.len() - report.outcomes.len(),
                "Rename batch cancelled"
            );
            observer.on_message("Renaming cancelled; remaining files were left untouched");
            report.cancelled = true;
            break;
        }

        let status = match rename_one(dir, pair, options.dry_run) {
            Ok(()) => {
                if options.dry_run {
                    info!(src = %pair.original, dest = %pair.proposed, "dry-run: would rename");
                    observer.on_message(&format!("Would rename {} -> {}", pair.original, pair.proposed));
                } else {
                    info!(src = %pair.original, dest = %pair.proposed, "Renamed");
                }
                OutcomeStatus::Renamed
            }
            Err(failure) => {
                warn!(
                    src = %pair.original,
                    dest = %pair.proposed,
                    kind = failure.kind(),
                    reason = %failure,
                    "Rename failed"
                );
                OutcomeStatus::Failed(failure)
            }
        };

        let outcome = RenameOutcome {
            original: pair.original.clone(),
            proposed: pair.proposed.clone(),
            status,
        };
        observer.on_outcome(&outcome);
        report.outcomes.push(outcome);
    }

    if !options.dry_run && report.renamed() > 0 {
        // Ignore fsync errors to avoid turning completed renames into a failure.
        if let Err(e) = fsync_dir(dir) {
            debug!(dir = %dir.display(), error = %e, "fsync of directory failed");
        }
    }

    info!(
        dir = %dir.display(),
        renamed = report.renamed(),
        failed = report.failed(),
        cancelled = report.cancelled,
        dry_run = options.dry_run,
        "Rename batch finished"
    );
    Ok(report)
}

fn rename_one(dir: &Path, pair: &RenameProposal, dry_run: bool) -> Result<(), RenameFailure> {
    check_entry_name(&pair.original)?;
    if pair.proposed.is_empty() {
        return Err(RenameFailure::EmptyName);
    }
    check_entry_name(&pair.proposed)?;
    if pair.original == pair.proposed {
        return Err(RenameFailure::InvalidName("proposed name equals the original".into()));
    }

    let src = dir.join(&pair.original);
    let dst = dir.join(&pair.proposed);

    match fs::metadata(&src) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(RenameFailure::NotAFile),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(RenameFailure::SourceMissing),
        Err(e) => return Err(RenameFailure::Io(describe_io_error("inspect", &src, &e))),
    }

    let same_entry = match fs::symlink_metadata(&dst) {
        Ok(_) if is_same_entry(dir, &src, &dst, &pair.proposed) => {
            debug!(src = %src.display(), dest = %dst.display(), "Target is the source itself (case-only rename)");
            true
        }
        Ok(_) => return Err(RenameFailure::TargetExists),
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(RenameFailure::Io(describe_io_error("inspect", &dst, &e))),
    };

    if dry_run {
        return Ok(());
    }

    // A case-only rename on a case-insensitive filesystem targets its own entry,
    // which a no-replace rename would refuse.
    let renamed = if same_entry {
        fs::rename(&src, &dst)
    } else {
        rename_no_replace(&src, &dst)
    };
    renamed.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => RenameFailure::SourceMissing,
        io::ErrorKind::AlreadyExists => RenameFailure::TargetExists,
        _ => RenameFailure::Io(describe_io_error("rename", &src, &e)),
    })
}

/// A bare entry name: non-empty, no separators, not `.` or `..`.
fn check_entry_name(name: &str) -> Result<(), RenameFailure> {
    if name.is_empty() {
        return Err(RenameFailure::EmptyName);
    }
    if name == "." || name == ".." {
        return Err(RenameFailure::InvalidName(format!("'{name}' is not a file name")));
    }
    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) || name.contains('\0') {
        return Err(RenameFailure::InvalidName(format!(
            "'{name}' contains a path separator"
        )));
    }
    Ok(())
}

/// True when `dst` resolves to the directory entry of `src` itself, which only
/// happens for a case-only rename on a case-insensitive filesystem. A symlink
/// or hard link under the proposed name is a different entry.
fn is_same_entry(dir: &Path, src: &Path, dst: &Path, proposed: &str) -> bool {
    same_inode(src, dst) && !has_exact_entry(dir, proposed)
}

/// Whether the listing holds an entry spelled exactly `name`.
/// Unreadable listings count as a match so the caller refuses the rename.
fn has_exact_entry(dir: &Path, name: &str) -> bool {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .any(|e| e.file_name() == std::ffi::OsStr::new(name)),
        Err(_) => true,
    }
}

#[cfg(unix)]
fn same_inode(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_inode(a: &Path, b: &Path) -> bool {
    if fs::symlink_metadata(b).map(|m| m.file_type().is_symlink()).unwrap_or(true) {
        return false;
    }
    let canon = |p: &Path| -> Option<std::path::PathBuf> { dunce::canonicalize(p).ok() };
    matches!((canon(a), canon(b)), (Some(x), Some(y)) if x == y)
}
