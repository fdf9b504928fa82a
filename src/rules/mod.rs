//! Rules: records, validation/compilation, storage backends and transfer.

mod compile;
pub mod defaults;
mod sqlite;
mod store;
pub mod transfer;
mod types;

pub use compile::{validate_rule, CompiledRule, RuleSet};
pub use defaults::{default_rules, seed_defaults, DEFAULT_RULES};
pub use sqlite::SqliteRuleStore;
pub use store::{MemoryRuleStore, RuleStore};
pub use transfer::{export_json, export_to_file, import_from_file, import_json};
pub use types::{ImportSummary, NewRule, Rule};
