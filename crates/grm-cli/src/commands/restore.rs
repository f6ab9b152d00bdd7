//! `--restore [branch]`: reset branches to their backups.

use anyhow::Result;

use super::Cli;
use super::utils::Session;
use crate::output;
use crate::services::RebaseOrchestrator;

/// Restore one branch, or every backed-up branch.
pub fn run(cli: &Cli, branch: Option<&str>) -> Result<()> {
    let session = Session::open(cli)?;
    let prompts = session.prompts(cli);
    let orchestrator = RebaseOrchestrator::new(
        &session.repo,
        &session.state,
        prompts.as_ref(),
        session.options(cli),
    );

    let restored = orchestrator.restore(branch)?;
    if restored.is_empty() {
        output::info("No backups to restore");
    } else {
        output::success(&format!("Restored {} branch(es)", restored.len()));
    }
    Ok(())
}
