//! Terminal output formatting utilities.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use grm_core::RebasePhase;
use grm_git::FailureKind;

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
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// Print a horizontal line (suppressed in quiet mode).
pub fn hr() {
    if !is_quiet() {
        println!("{}", "─".repeat(50).dimmed());
    }
}

/// Abbreviate a SHA for display.
#[must_use]
pub fn short_sha(sha: &str) -> String {
    sha[..sha.len().min(8)].dimmed().to_string()
}

/// Colored phase label.
#[must_use]
pub fn phase(phase: RebasePhase) -> String {
    let text = phase.as_str();
    match phase {
        RebasePhase::Complete => text.green().to_string(),
        RebasePhase::Aborted => text.red().to_string(),
        RebasePhase::ParentRebase | RebasePhase::ChildRebase => text.yellow().to_string(),
        _ => text.cyan().to_string(),
    }
}

/// Recovery steps for a rebase that stopped, one line each.
#[must_use]
pub fn recovery_steps(failure: FailureKind) -> Vec<&'static str> {
    let fix = match failure {
        FailureKind::Conflict => {
            "Resolve the conflicts, stage the files with `git add <file>`, then run:"
        }
        FailureKind::Lock => {
            "Another git process holds .git/index.lock. Wait for it to exit (or remove a stale lock), then run:"
        }
        FailureKind::Dirty => "Commit or stash your uncommitted changes, then run:",
        FailureKind::Unknown => "Inspect the git output above and fix the problem, then run:",
    };
    vec![
        fix,
        "  git rebase-multiple --continue",
        "To put every branch back where it was:",
        "  git rebase-multiple --abort",
    ]
}

/// Print the recovery block for a stopped rebase (always to stderr).
pub fn paused(phase: RebasePhase, branch: &str, failure: FailureKind) {
    eprintln!();
    error(&format!(
        "Rebase of '{}' stopped during {} ({failure})",
        branch.bold(),
        phase.as_str()
    ));
    eprintln!();
    for line in recovery_steps(failure) {
        eprintln!("{line}");
    }
}
