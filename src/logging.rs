//! Tracing initialization.
//! Builds a subscriber with EnvFilter, compact or JSON formatting on stderr,
//! and optional file logging.
//!
//! Behavior:
//! - Log level comes from LogLevel; RUST_LOG is not consulted.
//! - Logs go to stderr so reports and JSON on stdout stay machine-readable.
//! - File logging uses tracing_appender::non_blocking and is refused when any
//!   ancestor of the log path is a symlink.

use anyhow::Result;
use chrono::Local;
use std::fmt as stdfmt;
use std::io;
use std::path::Path;
use track_renamer::output as out;
use track_renamer::platform::open_log_file_secure_append;
use track_renamer::{path_has_symlink_ancestor, LogLevel};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

/// DD/MM/YY HH:MM:SS in local time.
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

/// Normal shows warnings and the per-batch summaries; Info adds per-file lines.
#[inline]
fn to_level_filter(lvl: LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
    }
}

/// Only this crate's events pass; rusqlite and friends stay quiet.
#[inline]
fn env_filter_from_level(level_filter: LevelFilter) -> EnvFilter {
    let level_str = match level_filter {
        LevelFilter::ERROR => "error",
        LevelFilter::WARN => "warn",
        LevelFilter::INFO => "info",
        LevelFilter::DEBUG => "debug",
        LevelFilter::TRACE => "trace",
        _ => "warn",
    };
    EnvFilter::new(format!("error,track_renamer={level_str}"))
}

/// Open the log file for non-blocking appends, or explain on stderr why not.
fn maybe_open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(true) => {
            out::print_warn(&format!(
                "Refusing to enable file logging: ancestor of {} is a symlink",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!(
                "Error checking log path {} for symlinks: {e}; file logging disabled",
                path.display()
            ));
            return None;
        }
        Ok(false) => {}
    }

    match open_log_file_secure_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!(
                "Failed to open log file {}: {e}; logs continue on stderr only",
                path.display()
            ));
            None
        }
    }
}

/// Install the global subscriber. The returned guard must be held until
/// shutdown to flush the file writer.
pub fn init_tracing(
    lvl: LogLevel,
    log_file: Option<&Path>,
    json: bool,
) -> Result<Option<WorkerGuard>> {
    let env_filter = env_filter_from_level(to_level_filter(lvl));
    let file = log_file.and_then(maybe_open_non_blocking_writer);

    let (file_writer, guard) = match file {
        Some((w, g)) => (Some(w), Some(g)),
        None => (None, None),
    };

    if json {
        let stderr_layer = tsfmt::layer()
            .event_format(tsfmt::format().json())
            .with_timer(LocalHumanTime)
            .with_target(true)
            .with_writer(io::stderr);
        let file_layer = file_writer.map(|w| {
            tsfmt::layer()
                .event_format(tsfmt::format().json())
                .with_timer(LocalHumanTime)
                .with_target(true)
                .with_ansi(false)
                .with_writer(w)
        });
        registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .try_init()?;
    } else {
        let stderr_layer = tsfmt::layer()
            .with_timer(LocalHumanTime)
            .with_target(false)
            .with_writer(io::stderr)
            .compact();
        let file_layer = file_writer.map(|w| {
            tsfmt::layer()
                .with_timer(LocalHumanTime)
                .with_target(true)
                .with_ansi(false)
                .with_writer(w)
                .compact()
        });
        registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .try_init()?;
    }
    Ok(guard)
}
