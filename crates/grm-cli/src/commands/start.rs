//! Default mode: plan, back up, tag, then rebase parent and children.

use anyhow::{Result, bail};
use colored::Colorize;

use super::Cli;
use super::utils::Session;
use crate::output;
use crate::services::{Plan, RebaseOrchestrator, RunOutcome, StartRequest, Summary};

/// Run a new operation.
pub fn run(cli: &Cli) -> Result<()> {
    let session = Session::open(cli)?;
    let prompts = session.prompts(cli);
    let orchestrator = RebaseOrchestrator::new(
        &session.repo,
        &session.state,
        prompts.as_ref(),
        session.options(cli),
    );

    let request = StartRequest {
        parent: cli.parent.clone(),
        target: cli.target.clone(),
        children: cli.children.as_ref().map(|children| {
            children
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect()
        }),
        dry_run: cli.dry_run,
    };

    report(orchestrator.start(&request)?)
}

/// Print a run outcome. A paused run is an error exit.
pub fn report(outcome: RunOutcome) -> Result<()> {
    match outcome {
        RunOutcome::Completed(summary) => {
            print_summary(&summary);
            Ok(())
        }
        RunOutcome::Paused {
            phase,
            branch,
            failure,
        } => {
            output::paused(phase, &branch, failure);
            bail!("stopped at '{branch}'");
        }
        RunOutcome::DryRun(plan) => {
            print_plan(&plan);
            Ok(())
        }
        RunOutcome::Cancelled => {
            output::info("Cancelled - nothing was changed");
            Ok(())
        }
    }
}

fn print_plan(plan: &Plan) {
    output::essential(&format!(
        "{} rebase '{}' onto '{}'",
        "Dry run:".bold(),
        plan.config.parent_branch,
        plan.config.target_branch
    ));
    for (n, step) in plan.steps.iter().enumerate() {
        output::essential(&format!("  {}. {step}", n + 1));
    }
    output::essential("No changes were made.");
}

fn print_summary(summary: &Summary) {
    output::hr();
    output::success(&format!(
        "Rebased {} onto {}",
        summary.parent.bold(),
        summary.target.bold()
    ));
    for branch in summary.rebased.iter().filter(|b| **b != summary.parent) {
        output::detail(&format!("  {branch} -> {}", summary.parent));
    }
    for branch in &summary.skipped {
        output::warn(&format!("Skipped '{branch}' (fork-point tag was missing)"));
    }
    if let Some(choice) = summary.cleanup {
        output::detail(&format!("  cleanup: {choice}"));
    }
    output::detail(&format!("  back on: {}", summary.original_branch));
}
