//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the Ctrl-C handler,
//! opens the rule store and runs the requested command.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use track_renamer::cli::{target_dir, Args, Command, RulesCommand};
use track_renamer::config::{default_config_path, load_or_init, LoadResult, CONFIG_ENV_VAR};
use track_renamer::engine::{decide, NameDecision};
use track_renamer::output as out;
use track_renamer::rules::{export_to_file, import_from_file, seed_defaults};
use track_renamer::{
    apply_renames, scan_directory, ApplyOptions, CancelToken, Config, Observer, RenameOutcome,
    RenamePlan, RenameProposal, RenamerError, RuleStore, SkippedEntry, SqliteRuleStore,
};

use crate::logging::init_tracing;

/// Some approved renames failed.
const EXIT_PARTIAL: u8 = 3;
/// Stopped by Ctrl-C before finishing.
const EXIT_CANCELLED: u8 = 130;

/// Prints progress as the engine reports it. Silent when the report goes to
/// stdout as JSON.
struct ConsoleObserver {
    json: bool,
}

impl Observer for ConsoleObserver {
    fn on_message(&mut self, message: &str) {
        if !self.json {
            out::print_info(message);
        }
    }

    fn on_proposal(&mut self, proposal: &RenameProposal) {
        if !self.json {
            out::print_rename(&proposal.original, &proposal.proposed);
        }
    }

    fn on_skipped(&mut self, entry: &SkippedEntry) {
        out::print_warn(&format!("skipped '{}': {}", entry.name, entry.reason));
    }

    fn on_outcome(&mut self, outcome: &RenameOutcome) {
        if self.json {
            return;
        }
        match outcome.error_detail() {
            None => out::print_user(&format!(
                "Renamed '{}' -> '{}'",
                outcome.original, outcome.proposed
            )),
            Some(detail) => out::print_error(&format!(
                "'{}' -> '{}': {detail}",
                outcome.original, outcome.proposed
            )),
        }
    }
}

fn print_config_location(args: &Args) -> Result<()> {
    let (path, source) = match &args.config {
        Some(p) => (p.clone(), "--config"),
        None if std::env::var_os(CONFIG_ENV_VAR).is_some() => (default_config_path()?, CONFIG_ENV_VAR),
        None => (default_config_path()?, "default location"),
    };
    out::print_info(&format!("Config file ({source}):\n  {}", path.display()));
    if path.exists() {
        let mut cfg = track_renamer::load_config_from_xml_path(&path)?;
        args.apply_overrides(&mut cfg);
        out::print_user(&cfg.to_string());
    } else {
        out::print_info("No config file exists there yet; defaults apply.");
        let mut cfg = Config::default();
        args.apply_overrides(&mut cfg);
        out::print_user(&cfg.to_string());
    }
    Ok(())
}

/// Open the rule store, seeding the built-in rules into a brand-new database.
fn open_store(cfg: &Config) -> Result<SqliteRuleStore> {
    let fresh = !cfg.rules_db.exists();
    let mut store = SqliteRuleStore::open(&cfg.rules_db)
        .with_context(|| format!("open rules database '{}'", cfg.rules_db.display()))?;
    if fresh && cfg.seed_defaults {
        let summary = seed_defaults(&mut store)?;
        info!(db = %cfg.rules_db.display(), imported = summary.imported, "Seeded default rules");
    }
    Ok(store)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize report")?;
    out::print_user(&text);
    Ok(())
}

fn run_scan(
    store: &SqliteRuleStore,
    dir: &Path,
    plan_out: Option<&Path>,
    json: bool,
    cancel: &CancelToken,
) -> Result<ExitCode> {
    let rules = store.load_rule_set()?;
    let mut observer = ConsoleObserver { json };
    let report = scan_directory(dir, &rules, cancel, &mut observer)?;

    if let Some(path) = plan_out {
        RenamePlan::from(&report).write(path)?;
        if !json {
            out::print_success(&format!(
                "Wrote {} proposed renames to {}",
                report.proposals.len(),
                path.display()
            ));
        }
    }

    if json {
        print_json(&report)?;
    } else if report.proposals.is_empty() {
        out::print_info(&format!("Nothing to rename in {}", dir.display()));
    } else {
        out::print_info(&format!("{} files would be renamed", report.proposals.len()));
    }

    Ok(if report.cancelled {
        ExitCode::from(EXIT_CANCELLED)
    } else {
        ExitCode::SUCCESS
    })
}

struct ApplyRequest<'a> {
    dir: Option<&'a Path>,
    plan: Option<&'a Path>,
    yes: bool,
    dry_run: bool,
    json: bool,
}

fn run_apply(
    store: &SqliteRuleStore,
    cfg: &Config,
    req: ApplyRequest<'_>,
    cancel: &CancelToken,
) -> Result<ExitCode> {
    let mut observer = ConsoleObserver { json: req.json };

    // A plan file is the approval; otherwise scan now and ask.
    let (dir, approved) = match req.plan {
        Some(plan_path) => {
            let plan = RenamePlan::read(plan_path)?;
            debug!(plan = %plan_path.display(), renames = plan.renames.len(), "Loaded plan");
            (plan.directory, plan.renames)
        }
        None => {
            let dir = target_dir(req.dir, cfg);
            let rules = store.load_rule_set()?;
            let report = scan_directory(&dir, &rules, cancel, &mut observer)?;
            if report.cancelled {
                return Ok(ExitCode::from(EXIT_CANCELLED));
            }
            if report.proposals.is_empty() {
                if req.json {
                    print_json(&track_renamer::ApplyReport::default())?;
                } else {
                    out::print_info(&format!("Nothing to rename in {}", dir.display()));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let question = format!("Rename {} files?", report.proposals.len());
            if !req.yes && !req.dry_run && !out::confirm(&question).context("read confirmation")? {
                out::print_info("No files were renamed.");
                return Ok(ExitCode::SUCCESS);
            }
            (dir, report.proposals)
        }
    };

    let options = ApplyOptions { dry_run: req.dry_run };
    let report = apply_renames(&dir, &approved, &options, cancel, &mut observer)?;

    if req.json {
        print_json(&report)?;
    } else {
        let verb = if req.dry_run { "would be renamed" } else { "renamed" };
        out::print_success(&format!(
            "{} {verb}, {} failed",
            report.renamed(),
            report.failed()
        ));
    }

    Ok(if report.cancelled {
        ExitCode::from(EXIT_CANCELLED)
    } else if report.failed() > 0 {
        ExitCode::from(EXIT_PARTIAL)
    } else {
        ExitCode::SUCCESS
    })
}

fn run_clean(store: &SqliteRuleStore, names: &[String]) -> Result<ExitCode> {
    let rules = store.load_rule_set()?;
    for name in names {
        match decide(name, &rules) {
            NameDecision::Unchanged => out::print_user(&format!("{name}  (unchanged)")),
            NameDecision::Rename(proposed) => out::print_rename(name, &proposed),
            NameDecision::EmptyStem => out::print_warn(&format!("'{name}' would be empty after cleaning")),
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_rules(store: &mut SqliteRuleStore, action: &RulesCommand) -> Result<ExitCode> {
    match action {
        RulesCommand::List { json } => {
            let rules = store.list()?;
            if *json {
                print_json(&rules)?;
            } else if rules.is_empty() {
                out::print_info("No rules defined. Run `track_renamer rules seed` to add the defaults.");
            } else {
                for r in &rules {
                    out::print_user(&format!("{:>4}  {}  =>  {:?}", r.id, r.pattern, r.replacement));
                }
            }
        }
        RulesCommand::Add { pattern, replacement } => {
            let rule = store.add(pattern, replacement)?;
            out::print_success(&format!("Added rule {}: {}", rule.id, rule.pattern));
        }
        RulesCommand::Remove { id } => {
            store.remove(*id)?;
            out::print_success(&format!("Removed rule {id}"));
        }
        RulesCommand::Import { file } => {
            let summary = import_from_file(store, file)?;
            out::print_success(&format!(
                "Imported {} rules ({} duplicates, {} invalid skipped)",
                summary.imported, summary.duplicates, summary.invalid
            ));
        }
        RulesCommand::Export { file } => {
            let count = export_to_file(&*store, file)?;
            out::print_success(&format!("Exported {count} rules to {}", file.display()));
        }
        RulesCommand::Seed => {
            let summary = seed_defaults(store)?;
            out::print_success(&format!(
                "Added {} default rules ({} already present)",
                summary.imported,
                summary.skipped()
            ));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn dispatch(
    command: &Command,
    cfg: &Config,
    store: &mut SqliteRuleStore,
    cancel: &CancelToken,
) -> Result<ExitCode> {
    match command {
        Command::Scan { dir, plan_out, json } => {
            let dir = target_dir(dir.as_deref(), cfg);
            run_scan(store, &dir, plan_out.as_deref(), *json, cancel)
        }
        Command::Apply { dir, plan, yes, dry_run, json } => run_apply(
            store,
            cfg,
            ApplyRequest {
                dir: dir.as_deref(),
                plan: plan.as_deref(),
                yes: *yes,
                dry_run: *dry_run,
                json: *json,
            },
            cancel,
        ),
        Command::Clean { names } => run_clean(store, names),
        Command::Rules { action } => run_rules(store, action),
    }
}

fn log_failure(e: &anyhow::Error) {
    match e.downcast_ref::<RenamerError>() {
        Some(re) => error!(code = re.code(), kind = re.kind(), error = %re, "Command failed"),
        None => error!(error = %format!("{e:#}"), "Command failed"),
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<ExitCode> {
    if args.print_config {
        print_config_location(&args)?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = args.command.clone() else {
        bail!("no command given; run with --help for usage");
    };

    let loaded = load_or_init(args.config.as_deref())?;
    if let LoadResult::CreatedTemplate(_, path) = &loaded {
        out::print_warn(&format!(
            "No config found; a template was written to {} and defaults are in use",
            path.display()
        ));
    }
    let mut cfg = loaded.into_config();
    args.apply_overrides(&mut cfg);

    let guard_opt = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.log_json)
        .context("initialize logging")?;

    // Held in a slot so the Ctrl-C handler can drop it and flush the file writer.
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    let cancel = CancelToken::new();
    {
        let guard_slot = Arc::clone(&guard_slot);
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.cancel();
            out::print_warn("Received interrupt; stopping after the current file...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("install Ctrl-C handler")?;
    }

    debug!(?command, config = ?cfg, "Starting track_renamer");

    let result = (|| -> Result<ExitCode> {
        cfg.validate()?;
        let mut store = open_store(&cfg)?;
        dispatch(&command, &cfg, &mut store, &cancel)
    })();

    if let Err(e) = &result {
        log_failure(e);
    }

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}
