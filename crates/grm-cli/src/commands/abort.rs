//! `--abort`: restore every branch of the operation in progress.

use anyhow::Result;

use super::Cli;
use super::utils::Session;
use crate::output;
use crate::services::{AbortOutcome, RebaseOrchestrator};

/// Roll back the operation in progress, if any.
pub fn run(cli: &Cli) -> Result<()> {
    let session = Session::open(cli)?;
    let prompts = session.prompts(cli);
    let orchestrator = RebaseOrchestrator::new(
        &session.repo,
        &session.state,
        prompts.as_ref(),
        session.options(cli),
    );

    match orchestrator.abort()? {
        AbortOutcome::NothingToDo => {
            output::info("No rebase-multiple operation in progress - nothing to do");
        }
        AbortOutcome::Restored {
            branches,
            original_branch,
        } => {
            output::success(&format!(
                "Aborted: restored {} branch(es), back on {original_branch}",
                branches.len()
            ));
            output::detail("  Backup refs were kept; remove them with `git rebase-multiple --cleanup`");
        }
        AbortOutcome::Cancelled => {
            output::info("Cancelled - nothing was restored, the operation is still in progress");
        }
    }
    Ok(())
}
