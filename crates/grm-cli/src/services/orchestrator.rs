//! Rebase orchestration: a parent onto a new base, then every child onto
//! the rebased parent.
//!
//! Every branch is backed up and every fork point tagged before anything
//! moves. Progress is written to the state file after each step, so a run
//! stopped by a conflict can be continued or fully rolled back from
//! another process.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use grm_core::{
    AbortAction, BackupInfo, BackupManager, CleanupOption, DivergenceAction,
    Error as CoreError, ForkPointInfo, ForkPointManager, RebaseConfig, RebasePhase, RebaseState,
    StateStore, validate_branch_name,
};
use grm_git::{BranchRef, FailureKind, GitOps, RemoteDivergence};

use crate::output;
use crate::prompts::Prompts;

/// Behaviour switches, resolved from config and flags.
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Remote for the divergence pre-flight.
    pub remote: String,
    pub check_remote_divergence: bool,
    pub pause_between_children: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            remote: "origin".into(),
            check_remote_divergence: true,
            pause_between_children: true,
        }
    }
}

/// What the user asked for up front. Anything missing is prompted for.
#[derive(Debug, Clone, Default)]
pub struct StartRequest {
    pub parent: Option<String>,
    pub target: Option<String>,
    pub children: Option<Vec<String>>,
    pub dry_run: bool,
}

/// What a run would do.
#[derive(Debug, Clone)]
pub struct Plan {
    pub config: RebaseConfig,
    pub steps: Vec<String>,
    /// Fork points as they would be tagged now.
    pub fork_points: Vec<ForkPointInfo>,
}

/// A finished operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub parent: String,
    pub target: String,
    pub rebased: Vec<String>,
    pub skipped: Vec<String>,
    pub cleanup: Option<CleanupOption>,
    pub original_branch: String,
}

impl Summary {
    fn from_state(state: &RebaseState, cleanup: Option<CleanupOption>) -> Self {
        Self {
            parent: state.parent_branch.clone(),
            target: state.target_branch.clone(),
            rebased: state.completed.clone(),
            skipped: state.skipped.clone(),
            cleanup,
            original_branch: state.original_branch.clone(),
        }
    }
}

/// Result of `start` and `continue`.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(Summary),
    /// A rebase stopped; state is saved for `--continue` or `--abort`.
    Paused {
        phase: RebasePhase,
        branch: String,
        failure: FailureKind,
    },
    DryRun(Plan),
    /// The user declined before anything changed.
    Cancelled,
}

/// Result of `abort`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortOutcome {
    NothingToDo,
    Restored {
        branches: Vec<String>,
        original_branch: String,
    },
    /// The user kept their uncommitted changes; nothing was restored.
    Cancelled,
}

/// An operation that has not finished.
#[derive(Debug, Clone)]
pub struct ActiveOperation {
    pub state: RebaseState,
    pub rebase_in_progress: bool,
    /// Why the current unit stopped, if one is stopped.
    pub failure: Option<FailureKind>,
}

/// Everything `--status` shows.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub active: Option<ActiveOperation>,
    pub backups: Vec<BackupInfo>,
    pub fork_points: Vec<ForkPointInfo>,
}

/// Result of a standalone cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub choice: Option<CleanupOption>,
    pub backups_deleted: usize,
    pub tags_deleted: usize,
}

fn head_ref(branch: &str) -> String {
    format!("refs/heads/{branch}")
}

/// Drives a multi-branch rebase through its phases.
pub struct RebaseOrchestrator<'a, G: GitOps, S: StateStore, P: Prompts + ?Sized> {
    repo: &'a G,
    state: &'a S,
    prompts: &'a P,
    options: OrchestratorOptions,
}

impl<'a, G: GitOps, S: StateStore, P: Prompts + ?Sized> RebaseOrchestrator<'a, G, S, P> {
    #[must_use]
    pub const fn new(
        repo: &'a G,
        state: &'a S,
        prompts: &'a P,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            repo,
            state,
            prompts,
            options,
        }
    }

    const fn backups(&self) -> BackupManager<'a, G> {
        BackupManager::new(self.repo)
    }

    const fn forks(&self) -> ForkPointManager<'a, G> {
        ForkPointManager::new(self.repo)
    }

    fn load(&self) -> Result<RebaseState> {
        Ok(self.state.load().ok_or(CoreError::NoActiveOperation)?)
    }

    // === Start ===

    /// Start a new operation.
    ///
    /// Preconditions are checked in order: repository lock, existing
    /// operation, native rebase, dirty tree (skipped for a dry run). Nothing
    /// is mutated if any fails.
    pub fn start(&self, request: &StartRequest) -> Result<RunOutcome> {
        self.check_preconditions(request.dry_run)?;

        let original_branch = self.repo.current_branch()?;
        let config = self.select(request)?;

        if !request.dry_run
            && self.options.check_remote_divergence
            && !self.preflight_divergence(&config, &original_branch)?
        {
            return Ok(RunOutcome::Cancelled);
        }

        let plan = self.plan(&config)?;
        if request.dry_run {
            return Ok(RunOutcome::DryRun(plan));
        }
        if !self.prompts.confirm_plan(&config, &plan.steps)? {
            return Ok(RunOutcome::Cancelled);
        }

        let state = self.snapshot(&config, &original_branch)?;
        self.rebase_parent(&state)
    }

    fn check_preconditions(&self, dry_run: bool) -> Result<()> {
        if self.repo.is_locked() {
            return Err(CoreError::RepositoryLocked.into());
        }
        if self.state.is_active() {
            return Err(CoreError::OperationInProgress.into());
        }
        if self.repo.is_rebase_in_progress() {
            return Err(CoreError::RebaseInProgress.into());
        }
        if !dry_run && self.repo.has_uncommitted_changes()? {
            return Err(CoreError::DirtyWorkingTree.into());
        }
        Ok(())
    }

    fn require_branch(&self, name: &str) -> Result<()> {
        validate_branch_name(name)?;
        if !self.repo.branch_exists(name) {
            return Err(grm_git::Error::BranchNotFound(name.to_string()).into());
        }
        Ok(())
    }

    /// Resolve parent, target and children from the request and prompts.
    fn select(&self, request: &StartRequest) -> Result<RebaseConfig> {
        let branches = self.repo.branches()?;

        let parent = match &request.parent {
            Some(parent) => parent.clone(),
            None => self.prompts.select_parent_branch(&branches)?,
        };
        self.require_branch(&parent)?;

        let target = match &request.target {
            Some(target) => target.clone(),
            None => self.prompts.select_target_branch(&branches, &parent)?,
        };
        self.require_branch(&target)?;

        let children = match &request.children {
            Some(children) => children.clone(),
            None => {
                let candidates: Vec<BranchRef> = self
                    .repo
                    .find_potential_children(&parent)?
                    .into_iter()
                    .filter(|b| b.name != target)
                    .collect();
                let others: Vec<BranchRef> = branches
                    .into_iter()
                    .filter(|b| {
                        b.name != parent
                            && b.name != target
                            && !candidates.iter().any(|c| c.name == b.name)
                    })
                    .collect();
                self.prompts
                    .select_child_branches(&parent, &candidates, &others)?
            }
        };

        let config = RebaseConfig::new(parent, target, children)?;
        for child in &config.child_branches {
            self.require_branch(child)?;
        }
        Ok(config)
    }

    /// Describe the run without changing anything.
    pub fn plan(&self, config: &RebaseConfig) -> Result<Plan> {
        let parent_ref = head_ref(&config.parent_branch);
        let mut fork_points = Vec::with_capacity(config.child_branches.len());
        for child in &config.child_branches {
            let child_ref = head_ref(child);
            let fork_point_sha = self.repo.merge_base(&parent_ref, &child_ref)?;
            let commits_ahead = self.repo.count_commits(&fork_point_sha, &child_ref)?;
            fork_points.push(ForkPointInfo {
                child_branch: child.clone(),
                fork_point_sha,
                commits_ahead,
                tag_name: ForkPointManager::<G>::tag_name(child),
            });
        }

        let affected: Vec<&str> = config.affected_branches().collect();
        let mut steps = vec![format!(
            "Back up {} under {}",
            affected.join(", "),
            BackupManager::<G>::REF_PREFIX
        )];
        for fork in &fork_points {
            steps.push(format!(
                "Tag the fork point of '{}' as {} ({} commit(s) ahead)",
                fork.child_branch, fork.tag_name, fork.commits_ahead
            ));
        }
        steps.push(format!(
            "Rebase '{}' onto '{}'",
            config.parent_branch, config.target_branch
        ));
        for fork in &fork_points {
            steps.push(format!(
                "Rebase '{}' onto '{}' from {} (replays {} commit(s))",
                fork.child_branch, config.parent_branch, fork.tag_name, fork.commits_ahead
            ));
        }
        steps.push("Choose what to do with backups and fork-point tags".into());

        Ok(Plan {
            config: config.clone(),
            steps,
            fork_points,
        })
    }

    /// BACKUP then SAVE_FORK_POINTS, then create the state that refers to them.
    fn snapshot(&self, config: &RebaseConfig, original_branch: &str) -> Result<RebaseState> {
        tracing::debug!(phase = %RebasePhase::Backup, "phase transition");
        let mut backups = BTreeMap::new();
        for branch in config.affected_branches() {
            let info = self.backups().create(branch)?;
            if let Some(old) = &info.replaced {
                output::warn(&format!(
                    "Replaced an older backup of '{branch}' (was {})",
                    output::short_sha(old)
                ));
            }
            output::success(&format!(
                "Backed up {branch} at {}",
                output::short_sha(&info.sha)
            ));
            backups.insert(info.branch, info.sha);
        }

        tracing::debug!(phase = %RebasePhase::SaveForkPoints, "phase transition");
        let mut fork_points = BTreeMap::new();
        for child in &config.child_branches {
            let info = self.forks().save(&config.parent_branch, child)?;
            output::success(&format!(
                "Tagged {} at {} ({} commit(s) ahead)",
                info.tag_name,
                output::short_sha(&info.fork_point_sha),
                info.commits_ahead
            ));
            fork_points.insert(info.child_branch, info.fork_point_sha);
        }

        Ok(self
            .state
            .create(config, backups, fork_points, original_branch)?)
    }

    /// Divergence pre-flight for parent and target. Returns `false` if the
    /// user cancelled.
    fn preflight_divergence(&self, config: &RebaseConfig, original_branch: &str) -> Result<bool> {
        let remote = self.options.remote.as_str();
        for branch in [&config.parent_branch, &config.target_branch] {
            let divergence = self.remote_divergence(branch)?;
            if !divergence.needs_attention() {
                continue;
            }

            match self.prompts.select_divergence_action(branch, divergence)? {
                DivergenceAction::Pull => {
                    self.repo.checkout(branch)?;
                    let outcome = self.repo.pull(remote, branch);
                    if !outcome.success {
                        bail!(
                            "`git pull {remote} {branch}` failed - resolve it, then start again"
                        );
                    }
                    self.return_to(original_branch);
                    output::success(&format!("Pulled {remote}/{branch} into {branch}"));
                }
                DivergenceAction::Reset => {
                    self.repo
                        .reset_branch(branch, &format!("refs/remotes/{remote}/{branch}"))?;
                    output::success(&format!("Reset {branch} to {remote}/{branch}"));
                }
                DivergenceAction::Skip => {}
                DivergenceAction::Cancel => return Ok(false),
            }
        }
        Ok(true)
    }

    fn remote_divergence(&self, branch: &str) -> Result<RemoteDivergence> {
        let remote = self.options.remote.as_str();
        if self.repo.remote_divergence(branch, remote)? == RemoteDivergence::NoRemote {
            tracing::debug!(branch, remote, "no remote-tracking branch, skipping pre-flight");
            return Ok(RemoteDivergence::NoRemote);
        }
        if let Err(e) = self.repo.fetch(remote, branch) {
            output::warn(&format!(
                "Could not fetch {remote}/{branch}, skipping its remote check: {e}"
            ));
            return Ok(RemoteDivergence::NoRemote);
        }
        Ok(self.repo.remote_divergence(branch, remote)?)
    }

    // === Rebase phases ===

    /// PARENT_REBASE. Refused unless every child has its fork-point tag.
    fn rebase_parent(&self, state: &RebaseState) -> Result<RunOutcome> {
        self.forks().require_all(&state.child_branches)?;
        if state.phase != RebasePhase::ParentRebase {
            self.state.update_phase(RebasePhase::ParentRebase)?;
        }

        let parent = state.parent_branch.as_str();
        let target = state.target_branch.as_str();
        output::info(&format!("Rebasing {parent} onto {target}"));
        self.repo.checkout(parent)?;
        if !self.repo.rebase(&head_ref(target)).success {
            return Ok(self.paused(RebasePhase::ParentRebase, parent));
        }

        self.state.mark_completed(parent)?;
        output::success(&format!("Rebased {parent} onto {target}"));
        self.run_children()
    }

    /// CHILD_REBASE loop over pending children, in order.
    fn run_children(&self) -> Result<RunOutcome> {
        let mut state = self.load()?;
        if state.phase != RebasePhase::ChildRebase {
            state = self.state.update_phase(RebasePhase::ChildRebase)?;
        }

        while let Some(child) = state.next_child().map(String::from) {
            if self.forks().get(&child)?.is_none() {
                state = self.skip_child(&child)?;
                continue;
            }

            state = self.state.set_current_child(Some(&child))?;
            if let Some(paused) = self.rebase_child(&state.parent_branch, &child)? {
                return Ok(paused);
            }
            state = self.child_done(&child)?;
        }

        self.finalize()
    }

    fn rebase_child(&self, parent: &str, child: &str) -> Result<Option<RunOutcome>> {
        output::info(&format!("Rebasing {child} onto {parent}"));
        self.repo.checkout(child)?;
        let upstream = ForkPointManager::<G>::tag_ref(child);
        if self.repo.rebase_onto(&head_ref(parent), &upstream).success {
            Ok(None)
        } else {
            Ok(Some(self.paused(RebasePhase::ChildRebase, child)))
        }
    }

    fn child_done(&self, child: &str) -> Result<RebaseState> {
        let state = self.state.mark_completed(child)?;
        output::success(&format!("Rebased {child} onto {}", state.parent_branch));
        if state.next_child().is_some() && self.options.pause_between_children {
            self.prompts.press_enter_to_continue()?;
        }
        Ok(state)
    }

    fn skip_child(&self, child: &str) -> Result<RebaseState> {
        tracing::info!(child, "fork-point tag missing, skipping child");
        output::warn(&format!(
            "Fork-point tag {} is missing; skipping '{child}'",
            ForkPointManager::<G>::tag_name(child)
        ));
        Ok(self.state.mark_skipped(child)?)
    }

    fn paused(&self, phase: RebasePhase, branch: &str) -> RunOutcome {
        let failure = self.repo.diagnose_rebase_failure();
        tracing::info!(%phase, branch, %failure, "rebase stopped");
        RunOutcome::Paused {
            phase,
            branch: branch.to_string(),
            failure,
        }
    }

    /// CLEANUP then COMPLETE.
    fn finalize(&self) -> Result<RunOutcome> {
        let mut state = self.load()?;
        if state.phase != RebasePhase::Cleanup {
            state = self.state.update_phase(RebasePhase::Cleanup)?;
        }

        let choice = self.prompts.select_cleanup_option()?;
        self.apply_cleanup(&state, choice)?;

        self.state.update_phase(RebasePhase::Complete)?;
        self.state.clear()?;
        self.return_to(&state.original_branch);

        Ok(RunOutcome::Completed(Summary::from_state(&state, Some(choice))))
    }

    /// Delete this operation's backups and/or tags.
    fn apply_cleanup(&self, state: &RebaseState, choice: CleanupOption) -> Result<()> {
        if choice == CleanupOption::DeleteAll {
            for branch in state.backups.keys() {
                self.backups().delete(branch)?;
            }
            output::success("Deleted backup refs");
        }
        if matches!(choice, CleanupOption::DeleteAll | CleanupOption::DeleteTagsOnly) {
            for child in &state.child_branches {
                self.forks().delete(child)?;
            }
            output::success("Deleted fork-point tags");
        }
        Ok(())
    }

    fn return_to(&self, branch: &str) {
        if self.repo.current_branch().is_ok_and(|current| current == branch) {
            return;
        }
        if let Err(e) = self.repo.checkout(branch) {
            output::warn(&format!("Could not check out '{branch}' again: {e}"));
        }
    }

    // === Continue ===

    /// Resume a stopped operation.
    ///
    /// A native rebase still in progress is continued first. Without one,
    /// the stopped unit counts as done only if its rebase actually landed;
    /// otherwise it is attempted again. Completed units are never redone.
    pub fn continue_(&self) -> Result<RunOutcome> {
        let state = self.load()?;
        if state.phase.is_terminal() {
            self.state.clear()?;
            output::info(&format!(
                "The recorded operation had already reached {}; cleared its state",
                state.phase
            ));
            return Ok(RunOutcome::Completed(Summary::from_state(&state, None)));
        }
        if self.repo.is_locked() {
            return Err(CoreError::RepositoryLocked.into());
        }

        match state.phase {
            RebasePhase::Init | RebasePhase::Backup | RebasePhase::SaveForkPoints => {
                self.rebase_parent(&state)
            }
            RebasePhase::ParentRebase if !state.parent_done() => self.resume_parent(&state),
            RebasePhase::ParentRebase | RebasePhase::ChildRebase => {
                match state.current_child.clone() {
                    Some(child) if !state.is_completed(&child) => {
                        self.resume_child(&state, &child)
                    }
                    _ => self.run_children(),
                }
            }
            RebasePhase::Cleanup | RebasePhase::Complete | RebasePhase::Aborted => {
                self.finalize()
            }
        }
    }

    fn resume_parent(&self, state: &RebaseState) -> Result<RunOutcome> {
        let parent = state.parent_branch.as_str();
        let target = state.target_branch.as_str();

        if self.repo.is_rebase_in_progress() {
            output::info(&format!("Continuing the rebase of {parent}"));
            if !self.repo.rebase_continue().success {
                return Ok(self.paused(RebasePhase::ParentRebase, parent));
            }
        } else if !self.repo.is_ancestor(&head_ref(target), &head_ref(parent))? {
            output::info(&format!("{parent} is not on top of {target} yet; rebasing again"));
            return self.rebase_parent(state);
        }

        self.state.mark_completed(parent)?;
        output::success(&format!("Rebased {parent} onto {target}"));
        self.run_children()
    }

    fn resume_child(&self, state: &RebaseState, child: &str) -> Result<RunOutcome> {
        let parent = state.parent_branch.as_str();

        if self.repo.is_rebase_in_progress() {
            output::info(&format!("Continuing the rebase of {child}"));
            if !self.repo.rebase_continue().success {
                return Ok(self.paused(RebasePhase::ChildRebase, child));
            }
        } else if !self.repo.is_ancestor(&head_ref(parent), &head_ref(child))? {
            if self.forks().get(child)?.is_none() {
                self.skip_child(child)?;
                return self.run_children();
            }
            output::info(&format!("{child} is not on top of {parent} yet; rebasing again"));
            if let Some(paused) = self.rebase_child(parent, child)? {
                return Ok(paused);
            }
        }

        self.child_done(child)?;
        self.run_children()
    }

    // === Abort ===

    /// Put every branch back where it was before the operation.
    ///
    /// Works from any non-terminal phase: backups hold the original heads,
    /// not deltas. Deleted branches are recreated from their backup. If any
    /// branch cannot be restored the state is kept so abort can be run again.
    /// A leftover state that already reached COMPLETE or ABORTED is only
    /// cleared.
    pub fn abort(&self) -> Result<AbortOutcome> {
        let Some(state) = self.state.load() else {
            return Ok(AbortOutcome::NothingToDo);
        };
        if state.phase.is_terminal() {
            self.state.clear()?;
            output::info(&format!(
                "The recorded operation had already reached {}; cleared its state",
                state.phase
            ));
            return Ok(AbortOutcome::NothingToDo);
        }
        if self.repo.is_locked() {
            return Err(CoreError::RepositoryLocked.into());
        }

        if self.repo.is_rebase_in_progress() && !self.repo.rebase_abort().success {
            output::warn("`git rebase --abort` failed; restoring branches anyway");
        }

        if self.repo.has_uncommitted_changes()? {
            match self.prompts.select_abort_action()? {
                AbortAction::Stash => {
                    self.repo.stash("git-rebase-multiple: abort")?;
                    output::info("Stashed uncommitted changes (see `git stash list`)");
                }
                AbortAction::Discard => {
                    self.repo.discard_changes()?;
                    output::info("Discarded uncommitted changes");
                }
                AbortAction::Cancel => return Ok(AbortOutcome::Cancelled),
            }
        }

        let mut restored = Vec::new();
        let mut failed = Vec::new();
        for branch in state.config().affected_branches() {
            let sha = match self.backups().get(branch)? {
                Some(info) => info.sha,
                None => match state.backups.get(branch) {
                    Some(sha) => sha.clone(),
                    None => continue,
                },
            };
            match self.backups().restore_to(branch, &sha) {
                Ok(()) => {
                    output::success(&format!(
                        "Restored {branch} to {}",
                        output::short_sha(&sha)
                    ));
                    restored.push(branch.to_string());
                }
                Err(e) => {
                    tracing::info!(branch, error = %e, "restore failed");
                    failed.push(format!("{branch} ({e})"));
                }
            }
        }

        if !failed.is_empty() {
            bail!(
                "could not restore {} - state kept; fix the problem and run `git rebase-multiple --abort` again",
                failed.join(", ")
            );
        }

        for child in &state.child_branches {
            self.forks().delete(child)?;
        }
        self.state.update_phase(RebasePhase::Aborted)?;
        self.state.clear()?;
        self.return_to(&state.original_branch);

        Ok(AbortOutcome::Restored {
            branches: restored,
            original_branch: state.original_branch,
        })
    }

    // === Status, restore, cleanup ===

    /// Snapshot of the active operation, backups and fork-point tags.
    pub fn status(&self) -> Result<StatusReport> {
        let active = self.state.load().map(|state| {
            let failure = state
                .current_unit()
                .map(|_| self.repo.diagnose_rebase_failure());
            ActiveOperation {
                rebase_in_progress: self.repo.is_rebase_in_progress(),
                failure,
                state,
            }
        });

        Ok(StatusReport {
            active,
            backups: self.backups().list()?,
            fork_points: self.forks().list()?,
        })
    }

    /// Hard-reset one branch, or every backed-up branch, to its backup.
    ///
    /// Refused while an operation is active or the tree is not clean.
    pub fn restore(&self, branch: Option<&str>) -> Result<Vec<BackupInfo>> {
        self.check_preconditions(false)?;

        let original = self.repo.current_branch().ok();
        let mut restored = Vec::new();
        if let Some(branch) = branch {
            let sha = self.backups().restore(branch)?;
            output::success(&format!("Restored {branch} to {}", output::short_sha(&sha)));
            restored.push(BackupInfo {
                branch: branch.to_string(),
                ref_name: BackupManager::<G>::ref_name(branch),
                sha,
                replaced: None,
            });
        } else {
            for info in self.backups().list()? {
                if !self.repo.branch_exists(&info.branch) {
                    output::warn(&format!(
                        "Branch '{}' no longer exists; skipping its backup",
                        info.branch
                    ));
                    continue;
                }
                self.backups().restore_to(&info.branch, &info.sha)?;
                output::success(&format!(
                    "Restored {} to {}",
                    info.branch,
                    output::short_sha(&info.sha)
                ));
                restored.push(info);
            }
        }

        if let Some(original) = original {
            self.return_to(&original);
        }
        Ok(restored)
    }

    /// Delete all backup refs and/or all fork-point tags.
    ///
    /// Refused while an operation is active: its backups are its rollback.
    pub fn cleanup(&self) -> Result<CleanupReport> {
        if self.state.is_active() {
            return Err(CoreError::OperationInProgress.into());
        }

        let backups = self.backups().list()?;
        let forks = self.forks().list()?;
        if backups.is_empty() && forks.is_empty() {
            return Ok(CleanupReport {
                choice: None,
                backups_deleted: 0,
                tags_deleted: 0,
            });
        }

        output::info(&format!(
            "Found {} backup ref(s) and {} fork-point tag(s)",
            backups.len(),
            forks.len()
        ));
        let choice = self.prompts.select_cleanup_option()?;
        let (backups_deleted, tags_deleted) = match choice {
            CleanupOption::Keep => (0, 0),
            CleanupOption::DeleteAll => (self.backups().cleanup()?, self.forks().cleanup()?),
            CleanupOption::DeleteTagsOnly => (0, self.forks().cleanup()?),
        };

        Ok(CleanupReport {
            choice: Some(choice),
            backups_deleted,
            tags_deleted,
        })
    }
}
