use anyhow::{Context, Result};
use grm_core::{Config, StateManager};
use grm_git::{ExecOptions, GitOps, Repository};

use super::Cli;
use crate::prompts::{AutoPrompts, InteractivePrompts, Prompts};
use crate::services::OrchestratorOptions;

/// Everything a mode needs, resolved from flags and config.
pub struct Session {
    pub repo: Repository,
    pub state: StateManager,
    pub config: Config,
}

impl Session {
    /// Open the current repository, its state file and its config.
    ///
    /// `verbose` comes from `--verbose` or `general.verbose` in the config.
    pub fn open(cli: &Cli) -> Result<Self> {
        let repo = Repository::open_current(ExecOptions {
            verbose: cli.verbose,
        })
        .context("Not inside a git repository")?;
        let config = Config::load(Config::path_in(repo.git_dir()))?;

        let repo = if config.general.verbose && !repo.options().verbose {
            Repository::open(repo.workdir(), ExecOptions { verbose: true })?
        } else {
            repo
        };
        let state = StateManager::new(repo.git_dir());

        Ok(Self {
            repo,
            state,
            config,
        })
    }

    /// Orchestrator switches: config, then flags.
    #[must_use]
    pub fn options(&self, cli: &Cli) -> OrchestratorOptions {
        let general = &self.config.general;
        OrchestratorOptions {
            remote: general.remote.clone(),
            check_remote_divergence: general.check_remote_divergence && !cli.skip_remote_check,
            pause_between_children: general.pause_between_children && !cli.no_pause,
        }
    }

    /// Terminal prompts, or fixed answers with `--yes`.
    #[must_use]
    pub fn prompts(&self, cli: &Cli) -> Box<dyn Prompts> {
        if cli.yes {
            Box::new(AutoPrompts {
                cleanup: cli.cleanup_mode.unwrap_or(self.config.defaults.cleanup),
                abort_action: cli.abort_mode.unwrap_or(self.config.defaults.abort_action),
            })
        } else {
            Box::new(InteractivePrompts {
                cleanup: cli.cleanup_mode,
                abort_action: cli.abort_mode,
            })
        }
    }
}
