//! Rule validation and compilation.
//!
//! Patterns are compiled case-insensitively with `fancy_regex`, which supports
//! back-references inside the pattern (`(.+?) - \1`). Replacements follow the
//! backslash template convention: `\1`, `\g<1>`, `\g<name>`, `\\`, and the
//! control escapes `\n`, `\t`, `\r`, `\f`, `\v`, `\a`, `\b`. A `$` in a
//! replacement is literal. Back-references inside a pattern match case-insensitively
//! too, so `(.+?) - \1` catches `Abba - ABBA`.
//!
//! Substitution is global. An empty match is allowed right after a non-empty one
//! (`x*` over `abxd` gives `-a-b--d-`), but never twice at the same position.
//!
//! Both halves are checked up front so that nothing accepted here can fail
//! while cleaning a name.

use fancy_regex::{Captures, Regex, RegexBuilder};

use crate::errors::{RenamerError, Result};

use super::types::Rule;

/// Backtracking steps allowed per match attempt before a rule gives up on a name.
const BACKTRACK_LIMIT: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Group(usize),
    Named(String),
}

/// Parsed replacement template.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    fn parse(src: &str) -> std::result::Result<Self, String> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = src.chars().peekable();

        let flush = |literal: &mut String, pieces: &mut Vec<Piece>| {
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(literal)));
            }
        };

        while let Some(c) = chars.next() {
            if c != '\\' {
                literal.push(c);
                continue;
            }
            match chars.next() {
                None => return Err("replacement ends with a lone backslash".into()),
                Some('\\') => literal.push('\\'),
                Some('n') => literal.push('\n'),
                Some('t') => literal.push('\t'),
                Some('r') => literal.push('\r'),
                Some('f') => literal.push('\x0c'),
                Some('v') => literal.push('\x0b'),
                Some('a') => literal.push('\x07'),
                Some('b') => literal.push('\x08'),
                Some('g') => {
                    if chars.next() != Some('<') {
                        return Err("expected '<' after \\g in replacement".into());
                    }
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('>') => break,
                            Some(ch) => name.push(ch),
                            None => return Err("unterminated \\g<...> group reference".into()),
                        }
                    }
                    if name.is_empty() {
                        return Err("empty group reference \\g<>".into());
                    }
                    flush(&mut literal, &mut pieces);
                    match name.parse::<usize>() {
                        Ok(n) => pieces.push(Piece::Group(n)),
                        Err(_) => pieces.push(Piece::Named(name)),
                    }
                }
                Some(d @ '1'..='9') => {
                    let mut n = usize::from(d as u8 - b'0');
                    if let Some(&next) = chars.peek()
                        && next.is_ascii_digit()
                    {
                        chars.next();
                        n = n * 10 + usize::from(next as u8 - b'0');
                    }
                    flush(&mut literal, &mut pieces);
                    pieces.push(Piece::Group(n));
                }
                Some('0') => return Err("octal escapes are not supported in replacements".into()),
                Some(ch) if ch.is_ascii_alphabetic() => {
                    return Err(format!("bad escape \\{ch} in replacement"));
                }
                // Unknown non-letter escapes are kept verbatim.
                Some(ch) => {
                    literal.push('\\');
                    literal.push(ch);
                }
            }
        }
        flush(&mut literal, &mut pieces);
        Ok(Self { pieces })
    }

    /// Every referenced group must exist in `regex`.
    fn check_groups(&self, regex: &Regex) -> std::result::Result<(), String> {
        let groups = regex.captures_len().saturating_sub(1);
        for piece in &self.pieces {
            match piece {
                Piece::Group(n) if *n > groups => {
                    return Err(format!(
                        "replacement references group {n} but the pattern has {groups}"
                    ));
                }
                Piece::Named(name) if !regex.capture_names().flatten().any(|g| g == name.as_str()) => {
                    return Err(format!("replacement references unknown group '{name}'"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Groups that did not take part in the match expand to nothing.
    fn expand(&self, caps: &Captures<'_>, out: &mut String) {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(s) => out.push_str(s),
                Piece::Group(n) => {
                    if let Some(m) = caps.get(*n) {
                        out.push_str(m.as_str());
                    }
                }
                Piece::Named(name) => {
                    if let Some(m) = caps.name(name) {
                        out.push_str(m.as_str());
                    }
                }
            }
        }
    }
}

/// One validated rule, ready to run.
#[derive(Debug)]
pub struct CompiledRule {
    rule: Rule,
    regex: Regex,
    template: Template,
}

impl CompiledRule {
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Replace every non-overlapping match in `text`.
    /// Errors only on regex runtime limits (e.g. excessive backtracking).
    pub(crate) fn substitute(&self, text: &str) -> std::result::Result<String, fancy_regex::Error> {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut pos = 0;
        let mut last_empty_at = None;
        while pos <= text.len() {
            let Some(caps) = self.regex.captures_from_pos(text, pos)? else { break };
            let Some(whole) = caps.get(0) else { break };
            let (start, end) = (whole.start(), whole.end());
            if start == end && last_empty_at == Some(start) {
                match text[start..].chars().next() {
                    Some(c) => pos = start + c.len_utf8(),
                    None => break,
                }
                continue;
            }
            out.push_str(&text[copied..start]);
            self.template.expand(&caps, &mut out);
            copied = end;
            last_empty_at = (start == end).then_some(end);
            pos = end;
        }
        out.push_str(&text[copied..]);
        Ok(out)
    }
}

/// The ordered, compiled rule pipeline. Insertion order is application order.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile a store listing. Fails on the first rule that does not validate.
    pub fn compile(rules: &[Rule]) -> Result<Self> {
        Self::compile_with(rules, BACKTRACK_LIMIT)
    }

    /// Compile literal (pattern, replacement) pairs, numbering them from 1.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self> {
        Self::compile(&numbered(pairs))
    }

    /// Like `from_pairs`, with a custom backtracking budget per match attempt.
    pub fn from_pairs_with_backtrack_limit(pairs: &[(&str, &str)], limit: usize) -> Result<Self> {
        Self::compile_with(&numbered(pairs), limit)
    }

    fn compile_with(rules: &[Rule], backtrack_limit: usize) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let (regex, template) = build(&rule.pattern, &rule.replacement, backtrack_limit)?;
                Ok(CompiledRule {
                    rule: rule.clone(),
                    regex,
                    template,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }
}

/// Rules numbered from 1 in the order given.
fn numbered(pairs: &[(&str, &str)]) -> Vec<Rule> {
    pairs
        .iter()
        .zip(1..)
        .map(|((pattern, replacement), id)| Rule {
            id,
            pattern: (*pattern).to_string(),
            replacement: (*replacement).to_string(),
        })
        .collect()
}

/// Check a candidate rule without storing it.
pub fn validate_rule(pattern: &str, replacement: &str) -> Result<()> {
    build(pattern, replacement, BACKTRACK_LIMIT).map(|_| ())
}

fn build(pattern: &str, replacement: &str, backtrack_limit: usize) -> Result<(Regex, Template)> {
    let invalid = |reason: String| RenamerError::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    };
    if pattern.is_empty() {
        return Err(invalid("pattern must not be empty".into()));
    }
    let regex = RegexBuilder::new(&format!("(?i){pattern}"))
        .backtrack_limit(backtrack_limit)
        .build()
        .map_err(|e| invalid(e.to_string()))?;
    let template = Template::parse(replacement).map_err(invalid)?;
    template.check_groups(&regex).map_err(invalid)?;
    Ok((regex, template))
}
