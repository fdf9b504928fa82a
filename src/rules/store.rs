//! Rule store boundary.
//! The engine only sees `RuleStore`; backends decide how rows are kept.

use tracing::{debug, warn};

use crate::errors::{RenamerError, Result};

use super::compile::{validate_rule, RuleSet};
use super::types::{ImportSummary, NewRule, Rule};

pub trait RuleStore {
    /// All rules in application order (ascending id).
    fn list(&self) -> Result<Vec<Rule>>;

    /// Validate and insert. Fails with `InvalidPattern` or `DuplicatePattern`.
    fn add(&mut self, pattern: &str, replacement: &str) -> Result<Rule>;

    /// Delete by id. Fails with `RuleNotFound` if nothing was deleted.
    fn remove(&mut self, id: i64) -> Result<()>;

    /// Bulk insert; duplicate and invalid patterns are counted and skipped.
    fn import(&mut self, rules: &[NewRule]) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        for rule in rules {
            tally_import(&mut summary, self.add(&rule.pattern, &rule.replacement))?;
        }
        Ok(summary)
    }

    /// Fresh compiled snapshot for one cleaning pass.
    fn load_rule_set(&self) -> Result<RuleSet> {
        RuleSet::compile(&self.list()?)
    }
}

/// Count one import attempt. Only errors other than duplicate or invalid abort.
pub(crate) fn tally_import(summary: &mut ImportSummary, added: Result<Rule>) -> Result<()> {
    match added {
        Ok(added) => {
            debug!(id = added.id, pattern = %added.pattern, "Imported rule");
            summary.imported += 1;
        }
        Err(RenamerError::DuplicatePattern(pattern)) => {
            debug!(%pattern, "Skipping duplicate rule");
            summary.duplicates += 1;
        }
        Err(RenamerError::InvalidPattern { pattern, reason }) => {
            warn!(%pattern, %reason, "Skipping invalid rule");
            summary.invalid += 1;
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Vec-backed store for tests and embedding.
#[derive(Debug)]
pub struct MemoryRuleStore {
    rules: Vec<Rule>,
    next_id: i64,
}

impl Default for MemoryRuleStore {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            next_id: 1,
        }
    }
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuleStore for MemoryRuleStore {
    fn list(&self) -> Result<Vec<Rule>> {
        Ok(self.rules.clone())
    }

    fn add(&mut self, pattern: &str, replacement: &str) -> Result<Rule> {
        validate_rule(pattern, replacement)?;
        if self.rules.iter().any(|r| r.pattern == pattern) {
            return Err(RenamerError::DuplicatePattern(pattern.to_string()));
        }
        let rule = Rule {
            id: self.next_id,
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        };
        self.next_id += 1;
        self.rules.push(rule.clone());
        Ok(rule)
    }

    fn remove(&mut self, id: i64) -> Result<()> {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != id);
        if self.rules.len() == before {
            return Err(RenamerError::RuleNotFound(id));
        }
        Ok(())
    }
}
