//! `--continue`: resume after a stop.

use anyhow::Result;

use super::Cli;
use super::start::report;
use super::utils::Session;
use crate::services::RebaseOrchestrator;

/// Resume the stopped operation.
pub fn run(cli: &Cli) -> Result<()> {
    let session = Session::open(cli)?;
    let prompts = session.prompts(cli);
    let orchestrator = RebaseOrchestrator::new(
        &session.repo,
        &session.state,
        prompts.as_ref(),
        session.options(cli),
    );

    report(orchestrator.continue_()?)
}
