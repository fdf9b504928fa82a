//! Rule records as they come out of (and go into) a rule store.

use serde::{Deserialize, Serialize};

/// A stored rule. `id` order is application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: i64,
    pub pattern: String,
    pub replacement: String,
}

/// A rule that has not been assigned an id yet (import/seed input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRule {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

impl NewRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

impl From<&Rule> for NewRule {
    fn from(rule: &Rule) -> Self {
        Self::new(rule.pattern.clone(), rule.replacement.clone())
    }
}

/// Result of a bulk import. Duplicates and invalid patterns are skipped, not fatal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

impl ImportSummary {
    pub fn skipped(&self) -> usize {
        self.duplicates + self.invalid
    }
}
