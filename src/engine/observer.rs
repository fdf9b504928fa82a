//! Progress callbacks. Called synchronously, once per completed item; the
//! caller decides how to render or forward them.

use super::report::{RenameOutcome, RenameProposal, SkippedEntry};

pub trait Observer {
    fn on_message(&mut self, _message: &str) {}
    fn on_proposal(&mut self, _proposal: &RenameProposal) {}
    fn on_skipped(&mut self, _entry: &SkippedEntry) {}
    fn on_outcome(&mut self, _outcome: &RenameOutcome) {}
}

/// No-op observer.
impl Observer for () {}
