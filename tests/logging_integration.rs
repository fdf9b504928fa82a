use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use assert_fs::prelude::*;
use tempfile::tempdir;
use track_renamer::platform::open_log_file_secure_append;
use track_renamer::rules::DEFAULT_RULES;
use track_renamer::{scan_directory, CancelToken, RuleSet};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tsfmt, registry};

/// Appends everything written into a shared Vec<u8>.
#[derive(Clone)]
struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture<F: FnOnce()>(filter: &str, json: bool, f: F) -> String {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buf = buf.clone();
        move || BufferWriter(buf.clone())
    };
    let dispatch = if json {
        tracing::Dispatch::new(
            registry()
                .with(EnvFilter::new(filter))
                .with(tsfmt::layer().json().with_writer(make_writer)),
        )
    } else {
        tracing::Dispatch::new(
            registry()
                .with(EnvFilter::new(filter))
                .with(tsfmt::layer().with_writer(make_writer).with_ansi(false).compact()),
        )
    };
    tracing::dispatcher::with_default(&dispatch, f);
    let bytes = buf.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn scan_emits_structured_summary() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("a_b.mp3").touch().unwrap();
    let rules = RuleSet::from_pairs(DEFAULT_RULES).unwrap();

    let logs = capture("track_renamer=info", true, || {
        scan_directory(dir.path(), &rules, &CancelToken::new(), &mut ()).unwrap();
    });

    let summary = logs
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .find(|v| v["fields"]["message"] == "Scan complete")
        .expect("scan summary event");
    assert_eq!(summary["fields"]["proposals"], 1);
    assert_eq!(summary["level"], "INFO");
}

#[test]
fn warn_level_hides_per_file_detail() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("a_b.mp3").touch().unwrap();
    dir.child("___.mp3").touch().unwrap();
    let rules = RuleSet::from_pairs(DEFAULT_RULES).unwrap();

    let logs = capture("track_renamer=warn", false, || {
        scan_directory(dir.path(), &rules, &CancelToken::new(), &mut ()).unwrap();
    });
    assert!(!logs.contains("Proposed rename"));
    assert!(logs.contains("empty name"), "{logs}");
}

#[test]
fn file_writer_receives_events() {
    let td = tempdir().unwrap();
    let path = td.path().join("logs").join("track_renamer.log");
    let file = open_log_file_secure_append(&path).unwrap();
    let (writer, guard) = tracing_appender::non_blocking(file);
    let dispatch = tracing::Dispatch::new(
        registry()
            .with(EnvFilter::new("info"))
            .with(tsfmt::layer().with_writer(writer).with_ansi(false)),
    );
    tracing::dispatcher::with_default(&dispatch, || {
        tracing::info!(renamed = 2, "Rename batch finished");
    });
    drop(guard);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Rename batch finished"));
    assert!(contents.contains("renamed=2"));
}
