//! JSON import/export of rule lists.
//!
//! Export format is a pretty-printed array of `{id, pattern, replacement}`.
//! Import accepts the same array; `id` is ignored, a missing or null
//! `replacement` means empty, and entries without a pattern are counted invalid.

use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

use crate::errors::{RenamerError, Result};

use super::store::RuleStore;
use super::types::{ImportSummary, NewRule};

#[derive(Debug, Deserialize)]
struct ImportRecord {
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    replacement: Option<String>,
}

/// Write every rule in `store` to `writer`. Returns the number written.
pub fn export_json<S, W>(store: &S, mut writer: W) -> Result<usize>
where
    S: RuleStore + ?Sized,
    W: Write,
{
    let rules = store.list()?;
    serde_json::to_writer_pretty(&mut writer, &rules)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(RenamerError::io("<export stream>"))?;
    Ok(rules.len())
}

/// Parse a rule array from `reader` and import it into `store`.
pub fn import_json<S, R>(store: &mut S, reader: R) -> Result<ImportSummary>
where
    S: RuleStore + ?Sized,
    R: Read,
{
    let records: Vec<ImportRecord> = serde_json::from_reader(reader)?;
    let mut missing = 0;
    let rules: Vec<NewRule> = records
        .into_iter()
        .filter_map(|record| match record.pattern {
            Some(pattern) if !pattern.is_empty() => {
                Some(NewRule::new(pattern, record.replacement.unwrap_or_default()))
            }
            _ => {
                missing += 1;
                None
            }
        })
        .collect();

    let mut summary = store.import(&rules)?;
    summary.invalid += missing;
    Ok(summary)
}

pub fn export_to_file<S: RuleStore + ?Sized>(store: &S, path: &Path) -> Result<usize> {
    let file = File::create(path).map_err(RenamerError::io(path))?;
    let count = export_json(store, BufWriter::new(file))?;
    info!(path = %path.display(), count, "Exported rules");
    Ok(count)
}

pub fn import_from_file<S: RuleStore + ?Sized>(store: &mut S, path: &Path) -> Result<ImportSummary> {
    let file = File::open(path).map_err(RenamerError::io(path))?;
    let summary = import_json(store, BufReader::new(file))?;
    info!(
        path = %path.display(),
        imported = summary.imported,
        duplicates = summary.duplicates,
        invalid = summary.invalid,
        "Imported rules"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::store::MemoryRuleStore;

    #[test]
    fn export_then_import_reproduces_rules() {
        let mut source = MemoryRuleStore::new();
        source.add(r"(.+?)\s*-\s*\1\s*-\s*", r"\1 - ").unwrap();
        source.add("_+", " ").unwrap();

        let mut buf = Vec::new();
        assert_eq!(export_json(&source, &mut buf).unwrap(), 2);

        let mut target = MemoryRuleStore::new();
        let summary = import_json(&mut target, buf.as_slice()).unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(target.list().unwrap(), source.list().unwrap());
    }

    #[test]
    fn export_is_human_readable_json_array() {
        let mut store = MemoryRuleStore::new();
        store.add("_+", " ").unwrap();
        let mut buf = Vec::new();
        export_json(&store, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["pattern"], "_+");
        assert_eq!(value[0]["replacement"], " ");
        assert!(String::from_utf8(buf).unwrap().contains('\n'));
    }

    #[test]
    fn import_tolerates_missing_fields() {
        let json = r#"[
            {"pattern": "_+"},
            {"pattern": "x", "replacement": null},
            {"replacement": "orphan"},
            {"id": 7, "pattern": "", "replacement": ""}
        ]"#;
        let mut store = MemoryRuleStore::new();
        let summary = import_json(&mut store, json.as_bytes()).unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, duplicates: 0, invalid: 2 });
        assert_eq!(store.list().unwrap()[0].replacement, "");
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut store = MemoryRuleStore::new();
        let err = import_json(&mut store, "{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, RenamerError::Transfer(_)));
    }
}
