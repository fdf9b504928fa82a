//! SQLite-backed rule store.
//! One table; the UNIQUE constraint on `pattern` is what enforces duplicate rejection.

use rusqlite::{params, Connection, ErrorCode};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::{RenamerError, Result};

use super::compile::validate_rule;
use super::store::{tally_import, RuleStore};
use super::types::{ImportSummary, NewRule, Rule};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS rules (
    id INTEGER PRIMARY KEY,
    pattern TEXT NOT NULL UNIQUE,
    replacement TEXT NOT NULL
);";

#[derive(Debug)]
pub struct SqliteRuleStore {
    conn: Connection,
}

impl SqliteRuleStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(RenamerError::io(parent))?;
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "Opened rule database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl RuleStore for SqliteRuleStore {
    fn list(&self) -> Result<Vec<Rule>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, pattern, replacement FROM rules ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Rule {
                id: row.get(0)?,
                pattern: row.get(1)?,
                replacement: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn add(&mut self, pattern: &str, replacement: &str) -> Result<Rule> {
        insert_rule(&self.conn, pattern, replacement)
    }

    /// The whole batch is one transaction; an unexpected error rolls it back.
    fn import(&mut self, rules: &[NewRule]) -> Result<ImportSummary> {
        let tx = self.conn.transaction()?;
        let mut summary = ImportSummary::default();
        for rule in rules {
            tally_import(&mut summary, insert_rule(&tx, &rule.pattern, &rule.replacement))?;
        }
        tx.commit()?;
        info!(imported = summary.imported, skipped = summary.skipped(), "Imported rules");
        Ok(summary)
    }

    fn remove(&mut self, id: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM rules WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(RenamerError::RuleNotFound(id));
        }
        info!(id, "Removed rule");
        Ok(())
    }
}

fn insert_rule(conn: &Connection, pattern: &str, replacement: &str) -> Result<Rule> {
    validate_rule(pattern, replacement)?;
    match conn.execute(
        "INSERT INTO rules (pattern, replacement) VALUES (?1, ?2)",
        params![pattern, replacement],
    ) {
        Ok(_) => {
            let rule = Rule {
                id: conn.last_insert_rowid(),
                pattern: pattern.to_string(),
                replacement: replacement.to_string(),
            };
            info!(id = rule.id, pattern = %rule.pattern, "Added rule");
            Ok(rule)
        }
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(RenamerError::DuplicatePattern(pattern.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
