//! git-rebase-multiple - rebase a branch and every branch forked from it.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod prompts;
mod services;

use commands::Cli;
use prompts::Cancelled;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // GRM_LOG overrides; --verbose turns on debug for our crates.
    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("GRM_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!("grm_cli={level},grm_core={level},grm_git={level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    output::set_quiet(cli.quiet);

    match commands::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is::<Cancelled>() => {
            output::info("Cancelled");
            ExitCode::SUCCESS
        }
        Err(e) => {
            output::error(&format!("{e:#}"));
            if e
                .downcast_ref::<grm_core::Error>()
                .is_some_and(grm_core::Error::is_precondition)
            {
                output::detail("Nothing was changed.");
            }
            ExitCode::FAILURE
        }
    }
}
