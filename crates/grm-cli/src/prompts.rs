//! User decisions the orchestrator asks for.
//!
//! [`InteractivePrompts`] asks on the terminal through `inquire`.
//! [`AutoPrompts`] answers from flags and config for `--yes` runs.

use anyhow::{Context, Result, bail};
use grm_core::{AbortAction, CleanupOption, DivergenceAction, RebaseConfig};
use grm_git::{BranchRef, RemoteDivergence};
use inquire::{Confirm, InquireError, MultiSelect, Select, Text};

use crate::output;

/// The user backed out. Not a failure: the process exits 0.
#[derive(Debug, thiserror::Error)]
#[error("cancelled")]
pub struct Cancelled;

/// Synchronous decisions. Every answer is already a valid value.
pub trait Prompts {
    fn select_parent_branch(&self, branches: &[BranchRef]) -> Result<String>;

    fn select_target_branch(&self, branches: &[BranchRef], exclude: &str) -> Result<String>;

    /// Pick children of `parent`. `candidates` are detected suggestions and
    /// start selected; `others` can be added by hand.
    fn select_child_branches(
        &self,
        parent: &str,
        candidates: &[BranchRef],
        others: &[BranchRef],
    ) -> Result<Vec<String>>;

    fn confirm_plan(&self, config: &RebaseConfig, steps: &[String]) -> Result<bool>;

    fn press_enter_to_continue(&self) -> Result<()>;

    fn select_cleanup_option(&self) -> Result<CleanupOption>;

    fn select_abort_action(&self) -> Result<AbortAction>;

    fn select_divergence_action(
        &self,
        branch: &str,
        divergence: RemoteDivergence,
    ) -> Result<DivergenceAction>;
}

/// Map Esc / Ctrl-C to [`Cancelled`].
fn answer<T>(result: std::result::Result<T, InquireError>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Err(Cancelled.into())
        }
        Err(e) => Err(e).context("prompt failed"),
    }
}

/// Prompts on the terminal. A preset answer skips its prompt.
#[derive(Debug, Default)]
pub struct InteractivePrompts {
    pub cleanup: Option<CleanupOption>,
    pub abort_action: Option<AbortAction>,
}

impl InteractivePrompts {
    fn ensure_terminal() -> Result<()> {
        if !console::user_attended() {
            bail!(
                "cannot prompt: not running in a terminal (pass --yes with --parent, --target and --children)"
            );
        }
        Ok(())
    }

    fn pick_branch(message: &str, branches: &[&BranchRef]) -> Result<String> {
        Self::ensure_terminal()?;
        if branches.is_empty() {
            bail!("no branches to choose from");
        }
        let labels: Vec<String> = branches.iter().map(|b| branch_label(b)).collect();
        let start = branches.iter().position(|b| b.is_current).unwrap_or(0);
        let choice = answer(
            Select::new(message, labels)
                .with_starting_cursor(start)
                .raw_prompt(),
        )?;
        Ok(branches[choice.index].name.clone())
    }
}

fn branch_label(branch: &BranchRef) -> String {
    let marker = if branch.is_current { " (current)" } else { "" };
    format!("{}{marker}  {}", branch.name, branch.short_sha())
}

fn choice_labels<T: Copy + std::fmt::Display>(
    choices: &[T],
    describe: fn(T) -> &'static str,
) -> Vec<String> {
    choices
        .iter()
        .map(|c| format!("{c:<17} {}", describe(*c)))
        .collect()
}

const fn describe_cleanup(option: CleanupOption) -> &'static str {
    match option {
        CleanupOption::Keep => "keep backups and fork-point tags",
        CleanupOption::DeleteAll => "delete backups and fork-point tags",
        CleanupOption::DeleteTagsOnly => "delete fork-point tags, keep backups",
    }
}

const fn describe_abort(action: AbortAction) -> &'static str {
    match action {
        AbortAction::Stash => "stash the changes, then restore",
        AbortAction::Discard => "throw the changes away, then restore",
        AbortAction::Cancel => "leave everything as is",
    }
}

const fn describe_divergence(action: DivergenceAction) -> &'static str {
    match action {
        DivergenceAction::Pull => "merge the remote branch in first",
        DivergenceAction::Reset => "move the local branch to the remote one",
        DivergenceAction::Skip => "use the local branch as is",
        DivergenceAction::Cancel => "stop here",
    }
}

fn divergence_text(divergence: RemoteDivergence) -> String {
    match divergence {
        RemoteDivergence::Behind(n) => format!("{n} commit(s) behind"),
        RemoteDivergence::Diverged { ahead, behind } => {
            format!("diverged ({ahead} ahead, {behind} behind)")
        }
        RemoteDivergence::Ahead(n) => format!("{n} commit(s) ahead"),
        RemoteDivergence::InSync => "in sync".into(),
        RemoteDivergence::NoRemote => "not on the remote".into(),
    }
}

impl Prompts for InteractivePrompts {
    fn select_parent_branch(&self, branches: &[BranchRef]) -> Result<String> {
        let all: Vec<&BranchRef> = branches.iter().collect();
        Self::pick_branch("Parent branch (rebased first):", &all)
    }

    fn select_target_branch(&self, branches: &[BranchRef], exclude: &str) -> Result<String> {
        let rest: Vec<&BranchRef> = branches.iter().filter(|b| b.name != exclude).collect();
        Self::pick_branch(&format!("Rebase '{exclude}' onto:"), &rest)
    }

    fn select_child_branches(
        &self,
        parent: &str,
        candidates: &[BranchRef],
        others: &[BranchRef],
    ) -> Result<Vec<String>> {
        Self::ensure_terminal()?;
        let branches: Vec<&BranchRef> = candidates.iter().chain(others).collect();
        if branches.is_empty() {
            output::info(&format!("No other branches to rebase along with '{parent}'"));
            return Ok(vec![]);
        }
        if candidates.is_empty() {
            output::info(&format!("No branches detected on top of '{parent}'"));
        }

        let labels: Vec<String> = branches
            .iter()
            .enumerate()
            .map(|(i, b)| {
                if i < candidates.len() {
                    format!("{} (detected)", branch_label(b))
                } else {
                    branch_label(b)
                }
            })
            .collect();
        let preselected: Vec<usize> = (0..candidates.len()).collect();

        let chosen = answer(
            MultiSelect::new(
                &format!("Children of '{parent}' (rebased top to bottom):"),
                labels,
            )
            .with_default(&preselected)
            .raw_prompt(),
        )?;
        Ok(chosen
            .into_iter()
            .map(|c| branches[c.index].name.clone())
            .collect())
    }

    fn confirm_plan(&self, config: &RebaseConfig, steps: &[String]) -> Result<bool> {
        Self::ensure_terminal()?;
        output::hr();
        output::info(&format!(
            "Plan: rebase '{}' onto '{}' with {} child branch(es)",
            config.parent_branch,
            config.target_branch,
            config.child_branches.len()
        ));
        for (n, step) in steps.iter().enumerate() {
            output::detail(&format!("  {}. {step}", n + 1));
        }
        output::hr();
        answer(Confirm::new("Proceed?").with_default(true).prompt())
    }

    fn press_enter_to_continue(&self) -> Result<()> {
        Self::ensure_terminal()?;
        answer(
            Text::new("Review the result, then press Enter to rebase the next child")
                .prompt(),
        )?;
        Ok(())
    }

    fn select_cleanup_option(&self) -> Result<CleanupOption> {
        if let Some(choice) = self.cleanup {
            return Ok(choice);
        }
        Self::ensure_terminal()?;
        let choice = answer(
            Select::new(
                "Clean up backups and fork-point tags?",
                choice_labels(CleanupOption::ALL, describe_cleanup),
            )
            .raw_prompt(),
        )?;
        Ok(CleanupOption::ALL[choice.index])
    }

    fn select_abort_action(&self) -> Result<AbortAction> {
        if let Some(action) = self.abort_action {
            return Ok(action);
        }
        Self::ensure_terminal()?;
        let choice = answer(
            Select::new(
                "The working tree has uncommitted changes. What should happen to them?",
                choice_labels(AbortAction::ALL, describe_abort),
            )
            .raw_prompt(),
        )?;
        Ok(AbortAction::ALL[choice.index])
    }

    fn select_divergence_action(
        &self,
        branch: &str,
        divergence: RemoteDivergence,
    ) -> Result<DivergenceAction> {
        Self::ensure_terminal()?;
        let choice = answer(
            Select::new(
                &format!(
                    "'{branch}' is {} its remote branch. What now?",
                    divergence_text(divergence)
                ),
                choice_labels(DivergenceAction::ALL, describe_divergence),
            )
            .raw_prompt(),
        )?;
        Ok(DivergenceAction::ALL[choice.index])
    }
}

/// Answers from flags and config, never blocks.
#[derive(Debug, Clone)]
pub struct AutoPrompts {
    pub cleanup: CleanupOption,
    pub abort_action: AbortAction,
}

impl Prompts for AutoPrompts {
    fn select_parent_branch(&self, _branches: &[BranchRef]) -> Result<String> {
        bail!("--parent is required with --yes")
    }

    fn select_target_branch(&self, _branches: &[BranchRef], _exclude: &str) -> Result<String> {
        bail!("--target is required with --yes")
    }

    fn select_child_branches(
        &self,
        parent: &str,
        candidates: &[BranchRef],
        _others: &[BranchRef],
    ) -> Result<Vec<String>> {
        if !candidates.is_empty() {
            let names: Vec<&str> = candidates.iter().map(|b| b.name.as_str()).collect();
            output::warn(&format!(
                "Branches that look forked from '{parent}' are not included without --children: {}",
                names.join(", ")
            ));
        }
        Ok(vec![])
    }

    fn confirm_plan(&self, _config: &RebaseConfig, steps: &[String]) -> Result<bool> {
        for (n, step) in steps.iter().enumerate() {
            output::detail(&format!("  {}. {step}", n + 1));
        }
        Ok(true)
    }

    fn press_enter_to_continue(&self) -> Result<()> {
        Ok(())
    }

    fn select_cleanup_option(&self) -> Result<CleanupOption> {
        Ok(self.cleanup)
    }

    fn select_abort_action(&self) -> Result<AbortAction> {
        Ok(self.abort_action)
    }

    fn select_divergence_action(
        &self,
        branch: &str,
        divergence: RemoteDivergence,
    ) -> Result<DivergenceAction> {
        output::warn(&format!(
            "'{branch}' is {} its remote branch; continuing with the local branch",
            divergence_text(divergence)
        ));
        Ok(DivergenceAction::Skip)
    }
}
