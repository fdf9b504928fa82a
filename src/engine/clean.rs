//! Name cleaning: a single left-to-right fold of the rule set over one string.

use tracing::warn;

use crate::rules::RuleSet;

use super::split::split_name;

/// Characters trimmed from both ends once every rule has run.
const EDGE_CHARS: [char; 3] = [' ', '-', '_'];

/// Apply every rule in order, then trim edge separators.
///
/// Each rule sees the previous rule's output; nothing is re-run. A rule that
/// hits a regex runtime limit is skipped for this name only.
pub fn clean_name(name: &str, rules: &RuleSet) -> String {
    let folded = rules.iter().fold(name.to_owned(), |current, rule| {
        match rule.substitute(&current) {
            Ok(next) => next,
            Err(e) => {
                warn!(
                    rule_id = rule.rule().id,
                    pattern = %rule.rule().pattern,
                    name = %current,
                    error = %e,
                    "Rule skipped for this name"
                );
                current
            }
        }
    });
    folded.trim_matches(&EDGE_CHARS[..]).to_owned()
}

/// What the cleaner decides for one file name (stem only; the extension is kept).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameDecision {
    Unchanged,
    Rename(String),
    /// Every character of the stem was cleaned away.
    EmptyStem,
}

pub fn decide(file_name: &str, rules: &RuleSet) -> NameDecision {
    let (stem, ext) = split_name(file_name);
    let cleaned = clean_name(stem, rules);
    if cleaned == stem {
        NameDecision::Unchanged
    } else if cleaned.is_empty() {
        NameDecision::EmptyStem
    } else {
        NameDecision::Rename(format!("{cleaned}{ext}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_only_edge_separators() {
        let rules = RuleSet::default();
        assert_eq!(clean_name(" -_Song - Title_- ", &rules), "Song - Title");
    }

    #[test]
    fn single_pass_does_not_revisit_earlier_rules() {
        // Rule 2 produces "ab", which rule 1 would match, but rule 1 has already run.
        let rules = RuleSet::from_pairs(&[("ab", "X"), ("c", "ab")]).unwrap();
        assert_eq!(clean_name("c", &rules), "ab");
    }

    #[test]
    fn decide_leaves_extension_alone() {
        let rules = RuleSet::from_pairs(&[("mp3", "wav"), ("_+", " ")]).unwrap();
        assert_eq!(decide("a_mp3.mp3", &rules), NameDecision::Rename("a wav.mp3".into()));
    }

    #[test]
    fn decide_flags_empty_stem() {
        let rules = RuleSet::from_pairs(&[(r"\(live\)", "")]).unwrap();
        assert_eq!(decide("(Live).mp3", &rules), NameDecision::EmptyStem);
        assert_eq!(decide("song.mp3", &rules), NameDecision::Unchanged);
    }
}
