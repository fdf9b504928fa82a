//! User-facing printing: colored prefixes when stdout is a TTY, plain text otherwise.

use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Print a plain line (no prefix) for primary output users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// `original -> proposed`, with the arrow dimmed on a TTY.
pub fn print_rename(original: &str, proposed: &str) {
    if is_tty() {
        println!("  {} {} {}", original, "->".dimmed(), proposed.bold());
    } else {
        println!("  {} -> {}", original, proposed);
    }
}

/// Ask a y/N question on stderr and read the answer from stdin.
/// Anything other than `y`/`yes` (including EOF) is a no.
pub fn confirm(question: &str) -> io::Result<bool> {
    let mut err = io::stderr();
    write!(err, "{question} [y/N] ")?;
    err.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
