//! Terminal output formatting utilities.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use gitstore_git::{PushResult, PushStatus};

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

/// Set quiet mode globally. Call once at startup.
pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

/// Print a success message (suppressed in quiet mode).
pub fn success(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "✓".green(), msg);
    }
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message (suppressed in quiet mode).
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "→".blue(), msg);
    }
}

/// Print a detail line without prefix (suppressed in quiet mode).
pub fn detail(msg: &str) {
    if !is_quiet() {
        println!("{msg}");
    }
}

/// Print essential machine-readable output (always prints).
///
/// Use for results meant for piping, like file listings.
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// Abbreviate a commit hash for display.
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// One line describing a push outcome.
#[must_use]
pub fn push_line(push: &PushResult) -> String {
    let target = format!("{} {}", push.remote, push.reference);
    match push.status {
        PushStatus::Pushed => format!("  {} pushed to {target}", "●".green()),
        PushStatus::Rejected => format!(
            "  {} {target} rejected: {}",
            "●".yellow(),
            push.message
        ),
        PushStatus::Failed => format!("  {} {target} failed: {}", "●".red(), push.message),
    }
}
