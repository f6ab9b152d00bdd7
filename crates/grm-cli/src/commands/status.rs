//! `--status`: the operation in progress, backups and fork-point tags.

use anyhow::Result;
use colored::Colorize;
use grm_core::RebaseState;
use serde::Serialize;

use super::Cli;
use super::utils::Session;
use crate::output;
use crate::services::{ActiveOperation, RebaseOrchestrator, StatusReport};

/// Show status.
pub fn run(cli: &Cli) -> Result<()> {
    let session = Session::open(cli)?;
    let prompts = session.prompts(cli);
    let orchestrator = RebaseOrchestrator::new(
        &session.repo,
        &session.state,
        prompts.as_ref(),
        session.options(cli),
    );

    let report = orchestrator.status()?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&JsonOutput::from(&report))?);
    } else {
        print_report(&report);
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<&'a RebaseState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stopped_at: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<&'static str>,
    rebase_in_progress: bool,
    backups: Vec<BackupJson<'a>>,
    fork_points: Vec<ForkPointJson<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupJson<'a> {
    branch: &'a str,
    sha: &'a str,
    ref_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ForkPointJson<'a> {
    child: &'a str,
    sha: &'a str,
    commits_ahead: usize,
    tag: &'a str,
}

impl<'a> From<&'a StatusReport> for JsonOutput<'a> {
    fn from(report: &'a StatusReport) -> Self {
        let active = report.active.as_ref();
        Self {
            active: active.is_some(),
            operation: active.map(|a| &a.state),
            stopped_at: active.and_then(|a| a.state.current_unit()),
            failure: active.and_then(|a| a.failure).map(|f| f.as_str()),
            rebase_in_progress: active.is_some_and(|a| a.rebase_in_progress),
            backups: report
                .backups
                .iter()
                .map(|b| BackupJson {
                    branch: &b.branch,
                    sha: &b.sha,
                    ref_name: &b.ref_name,
                })
                .collect(),
            fork_points: report
                .fork_points
                .iter()
                .map(|f| ForkPointJson {
                    child: &f.child_branch,
                    sha: &f.fork_point_sha,
                    commits_ahead: f.commits_ahead,
                    tag: &f.tag_name,
                })
                .collect(),
        }
    }
}

fn print_report(report: &StatusReport) {
    match &report.active {
        Some(active) => print_active(active),
        None => output::info("No rebase-multiple operation in progress"),
    }

    println!();
    println!("  {}", "Backups".bold());
    output::hr();
    if report.backups.is_empty() {
        output::detail("  none");
    }
    for backup in &report.backups {
        output::detail(&format!(
            "  {:<30} {}",
            backup.branch,
            output::short_sha(&backup.sha)
        ));
    }

    println!();
    println!("  {}", "Fork points".bold());
    output::hr();
    if report.fork_points.is_empty() {
        output::detail("  none");
    }
    for fork in &report.fork_points {
        output::detail(&format!(
            "  {:<30} {} ({} commit(s) ahead)",
            fork.tag_name,
            output::short_sha(&fork.fork_point_sha),
            fork.commits_ahead
        ));
    }
}

fn print_active(active: &ActiveOperation) {
    let state = &active.state;
    println!();
    println!("  {}", "Operation in progress".bold());
    output::hr();
    output::detail(&format!(
        "  rebase {} onto {}",
        state.parent_branch.bold(),
        state.target_branch.bold()
    ));
    output::detail(&format!("  phase:   {}", output::phase(state.phase)));
    output::detail(&format!(
        "  started: {}",
        state.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    for branch in state.config().affected_branches() {
        let mark = if state.is_completed(branch) {
            "✓".green()
        } else if state.skipped.iter().any(|b| b == branch) {
            "-".yellow()
        } else if state.current_unit() == Some(branch) {
            "✗".red()
        } else {
            "·".dimmed()
        };
        output::detail(&format!("  {mark} {branch}"));
    }

    if let Some(branch) = state.current_unit() {
        let failure = active.failure.unwrap_or(grm_git::FailureKind::Unknown);
        println!();
        output::warn(&format!("Stopped at '{branch}' ({failure})"));
        for line in output::recovery_steps(failure) {
            output::detail(line);
        }
    }
}
