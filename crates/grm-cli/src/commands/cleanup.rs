//! `--cleanup`: remove backup refs and fork-point tags.

use anyhow::Result;

use super::Cli;
use super::utils::Session;
use crate::output;
use crate::services::RebaseOrchestrator;

/// Delete backups and/or tags, as chosen.
pub fn run(cli: &Cli) -> Result<()> {
    let session = Session::open(cli)?;
    let prompts = session.prompts(cli);
    let orchestrator = RebaseOrchestrator::new(
        &session.repo,
        &session.state,
        prompts.as_ref(),
        session.options(cli),
    );

    let report = orchestrator.cleanup()?;
    match report.choice {
        None => output::info("Nothing to clean up"),
        Some(choice) => output::success(&format!(
            "Cleanup ({choice}): deleted {} backup ref(s) and {} fork-point tag(s)",
            report.backups_deleted, report.tags_deleted
        )),
    }
    Ok(())
}
