//! Built-in rule list for typical downloaded-track names.

use crate::errors::Result;

use super::store::RuleStore;
use super::types::{ImportSummary, NewRule};

/// Order matters: the duplicate-artist rules must see the raw separators,
/// so they run before underscores become spaces.
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    // "Artist - Artist - Track"
    (r"(.+?)\s*-\s*\1\s*-\s*", r"\1 - "),
    // "Artist_-_Artist_-_Track"
    (r"(.+?)_+-+_+\1_+-+_+", r"\1 - "),
    // mixed separators
    (r"(.+?)\s*[-_]+\s*\1\s*[-_]+\s*", r"\1 - "),
    (r"_+", " "),
    (r"\s*\[\s*official.*?video\s*\]", ""),
    (r"\s*\(\s*official.*?video\s*\)", ""),
    (r"\s*\[\s*official.*?audio\s*\]", ""),
    (r"\s*\(\s*official.*?audio\s*\)", ""),
    (r"\s*\[\s*lyrics?\s*\]", ""),
    (r"\s*\(\s*lyrics?\s*\)", ""),
    (r"\s*\[\s*live\s*\]", ""),
    (r"\s*\(\s*live\s*\)", ""),
    (r"^\s*[-_]+\s*", ""),
    (r"\s*[-_]+\s*$", ""),
];

pub fn default_rules() -> Vec<NewRule> {
    DEFAULT_RULES
        .iter()
        .map(|(pattern, replacement)| NewRule::new(*pattern, *replacement))
        .collect()
}

/// Insert the defaults, skipping any pattern already present.
pub fn seed_defaults<S: RuleStore + ?Sized>(store: &mut S) -> Result<ImportSummary> {
    store.import(&default_rules())
}
