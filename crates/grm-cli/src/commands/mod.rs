//! CLI definition and mode dispatch.
//!
//! Modes are mutually exclusive flags rather than subcommands so the tool
//! reads like a git builtin: `git rebase-multiple --continue`.

pub mod abort;
pub mod cleanup;
pub mod completions;
pub mod restore;
pub mod resume;
pub mod start;
pub mod status;
pub mod utils;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use clap_complete::Shell;
use grm_core::{AbortAction, CleanupOption};

/// Rebase a branch onto a new base, then every branch forked from it onto
/// the result.
#[derive(Parser, Debug)]
#[command(name = "git-rebase-multiple", bin_name = "git-rebase-multiple")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .args(["abort", "continue_", "status", "cleanup", "restore", "completions"])
        .multiple(false)
))]
#[command(after_help = r#"EXAMPLES:
    # Pick parent, target and children interactively
    git rebase-multiple

    # Preview without changing anything
    git rebase-multiple --dry-run --parent feature --target main

    # Fully scripted
    git rebase-multiple --yes --parent feature --target main --children ui,api

    # After resolving a conflict
    git rebase-multiple --continue

    # Put every branch back where it was
    git rebase-multiple --abort
"#)]
pub struct Cli {
    /// Roll back the operation in progress and restore every branch
    #[arg(short, long)]
    pub abort: bool,

    /// Resume after resolving a conflict
    #[arg(short = 'c', long = "continue")]
    pub continue_: bool,

    /// Show the operation in progress, backups and fork-point tags
    #[arg(short, long)]
    pub status: bool,

    /// Delete backup refs and/or fork-point tags
    #[arg(long)]
    pub cleanup: bool,

    /// Restore a branch (or every backed-up branch) from its backup
    #[arg(short, long, value_name = "BRANCH")]
    pub restore: Option<Option<String>>,

    /// Print shell completions
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Show the plan without changing anything
    #[arg(long, conflicts_with = "mode")]
    pub dry_run: bool,

    /// Branch to rebase first
    #[arg(long, value_name = "BRANCH", conflicts_with = "mode")]
    pub parent: Option<String>,

    /// New base for the parent
    #[arg(long, value_name = "BRANCH", conflicts_with = "mode")]
    pub target: Option<String>,

    /// Branches forked from the parent, comma separated, rebased in order
    ///
    /// Each child must fork directly from the parent. Branches forked from a
    /// child are not followed.
    #[arg(
        long,
        value_name = "BRANCHES",
        value_delimiter = ',',
        conflicts_with = "mode"
    )]
    pub children: Option<Vec<String>>,

    /// Never prompt: take answers from flags and config
    #[arg(short, long)]
    pub yes: bool,

    /// Output status as JSON
    #[arg(long, requires = "status")]
    pub json: bool,

    /// Cleanup choice instead of asking (keep, delete-all, delete-tags-only)
    #[arg(long, value_name = "CHOICE")]
    pub cleanup_mode: Option<CleanupOption>,

    /// What to do with uncommitted changes on abort (stash, discard, cancel)
    #[arg(long, value_name = "ACTION")]
    pub abort_mode: Option<AbortAction>,

    /// Do not wait between child rebases
    #[arg(long)]
    pub no_pause: bool,

    /// Skip the remote divergence check
    #[arg(long)]
    pub skip_remote_check: bool,

    /// Echo every git command
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress informational output
    #[arg(short, long)]
    pub quiet: bool,
}

/// The one thing a run does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Start,
    Continue,
    Abort,
    Status,
    Cleanup,
    Restore(Option<String>),
    Completions(Shell),
}

impl Cli {
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.continue_ {
            Mode::Continue
        } else if self.abort {
            Mode::Abort
        } else if self.status {
            Mode::Status
        } else if self.cleanup {
            Mode::Cleanup
        } else if let Some(branch) = &self.restore {
            Mode::Restore(branch.clone())
        } else if let Some(shell) = self.completions {
            Mode::Completions(shell)
        } else {
            Mode::Start
        }
    }
}

/// Dispatch to the selected mode.
pub fn run(cli: &Cli) -> Result<()> {
    match cli.mode() {
        Mode::Start => start::run(cli),
        Mode::Continue => resume::run(cli),
        Mode::Abort => abort::run(cli),
        Mode::Status => status::run(cli),
        Mode::Cleanup => cleanup::run(cli),
        Mode::Restore(branch) => restore::run(cli, branch.as_deref()),
        Mode::Completions(shell) => completions::run(shell),
    }
}
