//! Mock implementations for testing services.
//!
//! These mocks implement the traits from grm-git, grm-core and the prompt
//! layer so orchestration can be tested without real repositories or a
//! terminal.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::Result;
use grm_core::state::RebaseState;
use grm_core::{
    AbortAction, CleanupOption, DivergenceAction, RebaseConfig, Result as CoreResult, StateStore,
};
use grm_git::{BranchRef, GitOps, InteractiveOutcome, RemoteDivergence, Result as GitResult};

use crate::prompts::Prompts;

/// In-memory repository.
///
/// Refs map full names to fake SHAs. A successful rebase of branch `b` onto
/// a base with SHA `x` moves `b` to `b+x` and records `x` as its ancestor.
/// Every mutating or interactive call is logged in `calls`.
pub struct MockGitOps {
    pub root: PathBuf,
    pub current: RefCell<String>,
    pub refs: RefCell<BTreeMap<String, String>>,
    pub ancestry: RefCell<Vec<(String, String)>>,
    pub merge_bases: RefCell<HashMap<String, String>>,
    pub commits_ahead: RefCell<HashMap<String, usize>>,
    pub remote: RefCell<HashMap<String, RemoteDivergence>>,
    pub dirty: RefCell<bool>,
    pub locked: RefCell<bool>,
    /// `(branch, base sha)` of a stopped rebase.
    pub rebasing: RefCell<Option<(String, String)>>,
    /// Branches whose next rebase stops with a conflict.
    pub conflicts: RefCell<Vec<String>>,
    /// How many `rebase --continue` calls still fail.
    pub continue_failures: RefCell<usize>,
    pub calls: RefCell<Vec<String>>,
}

impl Default for MockGitOps {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGitOps {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/mock/repo"),
            current: RefCell::new("main".to_string()),
            refs: RefCell::new(BTreeMap::new()),
            ancestry: RefCell::new(Vec::new()),
            merge_bases: RefCell::new(HashMap::new()),
            commits_ahead: RefCell::new(HashMap::new()),
            remote: RefCell::new(HashMap::new()),
            dirty: RefCell::new(false),
            locked: RefCell::new(false),
            rebasing: RefCell::new(None),
            conflicts: RefCell::new(Vec::new()),
            continue_failures: RefCell::new(0),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_branch(self, name: &str, sha: &str) -> Self {
        self.with_ref(&format!("refs/heads/{name}"), sha)
    }

    pub fn with_ref(self, name: &str, sha: &str) -> Self {
        self.refs
            .borrow_mut()
            .insert(name.to_string(), sha.to_string());
        self
    }

    pub fn with_current_branch(self, name: &str) -> Self {
        *self.current.borrow_mut() = name.to_string();
        self
    }

    /// Merge-base of any parent with `child`, and the child's commits past it.
    pub fn with_fork_point(self, child: &str, sha: &str, ahead: usize) -> Self {
        self.merge_bases
            .borrow_mut()
            .insert(child.to_string(), sha.to_string());
        self.commits_ahead.borrow_mut().insert(child.to_string(), ahead);
        self
    }

    pub fn with_remote(self, branch: &str, divergence: RemoteDivergence) -> Self {
        self.remote
            .borrow_mut()
            .insert(branch.to_string(), divergence);
        self
    }

    pub fn head(&self, branch: &str) -> String {
        self.get_ref(&format!("refs/heads/{branch}")).unwrap()
    }

    pub fn get_ref(&self, name: &str) -> Option<String> {
        self.refs.borrow().get(name).cloned()
    }

    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == call)
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c == call)
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn log(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn lookup(&self, rev: &str) -> Option<String> {
        let refs = self.refs.borrow();
        [
            rev.to_string(),
            format!("refs/heads/{rev}"),
            format!("refs/tags/{rev}"),
        ]
        .iter()
        .find_map(|name| refs.get(name).cloned())
        .or_else(|| refs.values().find(|sha| *sha == rev).cloned())
    }

    fn branch_name(rev: &str) -> &str {
        rev.strip_prefix("refs/heads/").unwrap_or(rev)
    }

    fn land(&self, branch: &str, base: &str) {
        let new_sha = format!("{branch}+{base}");
        self.ancestry
            .borrow_mut()
            .push((base.to_string(), new_sha.clone()));
        self.refs
            .borrow_mut()
            .insert(format!("refs/heads/{branch}"), new_sha);
    }

    fn apply_rebase(&self, base: &str) -> InteractiveOutcome {
        let branch = self.current();
        let mut conflicts = self.conflicts.borrow_mut();
        if let Some(i) = conflicts.iter().position(|b| *b == branch) {
            conflicts.remove(i);
            *self.rebasing.borrow_mut() = Some((branch, base.to_string()));
            *self.dirty.borrow_mut() = true;
            return InteractiveOutcome::failed(Some(1));
        }
        drop(conflicts);
        self.land(&branch, base);
        InteractiveOutcome::ok()
    }
}

impl GitOps for MockGitOps {
    fn workdir(&self) -> &Path {
        &self.root
    }

    fn git_dir(&self) -> &Path {
        &self.root
    }

    fn current_branch(&self) -> GitResult<String> {
        Ok(self.current())
    }

    fn branches(&self) -> GitResult<Vec<BranchRef>> {
        let current = self.current();
        Ok(self
            .refs
            .borrow()
            .iter()
            .filter_map(|(name, sha)| {
                let name = name.strip_prefix("refs/heads/")?;
                Some(BranchRef {
                    name: name.to_string(),
                    sha: sha.clone(),
                    is_current: name == current,
                })
            })
            .collect())
    }

    fn branch_exists(&self, name: &str) -> bool {
        self.refs
            .borrow()
            .contains_key(&format!("refs/heads/{name}"))
    }

    fn sha(&self, rev: &str) -> GitResult<String> {
        self.lookup(rev)
            .ok_or_else(|| grm_git::Error::BranchNotFound(rev.to_string()))
    }

    fn resolve(&self, rev: &str) -> GitResult<Option<String>> {
        Ok(self.lookup(rev))
    }

    fn merge_base(&self, one: &str, two: &str) -> GitResult<String> {
        match self.merge_bases.borrow().get(Self::branch_name(two)) {
            Some(sha) => Ok(sha.clone()),
            None => self.sha(one),
        }
    }

    fn count_commits(&self, _from: &str, to: &str) -> GitResult<usize> {
        Ok(self
            .commits_ahead
            .borrow()
            .get(Self::branch_name(to))
            .copied()
            .unwrap_or(0))
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> GitResult<bool> {
        let ancestor = self.sha(ancestor)?;
        let descendant = self.sha(descendant)?;
        Ok(ancestor == descendant
            || self
                .ancestry
                .borrow()
                .iter()
                .any(|(a, d)| *a == ancestor && *d == descendant))
    }

    fn has_uncommitted_changes(&self) -> GitResult<bool> {
        Ok(*self.dirty.borrow())
    }

    fn is_rebase_in_progress(&self) -> bool {
        self.rebasing.borrow().is_some()
    }

    fn is_locked(&self) -> bool {
        *self.locked.borrow()
    }

    fn checkout(&self, branch: &str) -> GitResult<()> {
        if !self.branch_exists(branch) {
            return Err(grm_git::Error::BranchNotFound(branch.to_string()));
        }
        self.log(format!("checkout {branch}"));
        *self.current.borrow_mut() = branch.to_string();
        Ok(())
    }

    fn reset_hard(&self, rev: &str) -> GitResult<()> {
        let sha = self.sha(rev)?;
        self.log(format!("reset --hard {sha}"));
        let branch = self.current();
        self.refs
            .borrow_mut()
            .insert(format!("refs/heads/{branch}"), sha);
        *self.dirty.borrow_mut() = false;
        Ok(())
    }

    fn reset_branch(&self, branch: &str, rev: &str) -> GitResult<()> {
        let sha = self.sha(rev)?;
        self.log(format!("reset-branch {branch} {sha}"));
        self.refs
            .borrow_mut()
            .insert(format!("refs/heads/{branch}"), sha);
        Ok(())
    }

    fn stash(&self, _message: &str) -> GitResult<()> {
        self.log("stash".into());
        *self.dirty.borrow_mut() = false;
        Ok(())
    }

    fn discard_changes(&self) -> GitResult<()> {
        self.log("discard".into());
        *self.dirty.borrow_mut() = false;
        Ok(())
    }

    fn rebase(&self, upstream: &str) -> InteractiveOutcome {
        self.log(format!("rebase {upstream}"));
        match self.lookup(upstream) {
            Some(base) => self.apply_rebase(&base),
            None => InteractiveOutcome::failed(Some(128)),
        }
    }

    fn rebase_onto(&self, new_base: &str, upstream: &str) -> InteractiveOutcome {
        self.log(format!("rebase --onto {new_base} {upstream}"));
        match (self.lookup(new_base), self.lookup(upstream)) {
            (Some(base), Some(_)) => self.apply_rebase(&base),
            _ => InteractiveOutcome::failed(Some(128)),
        }
    }

    fn rebase_continue(&self) -> InteractiveOutcome {
        self.log("rebase --continue".into());
        let mut failures = self.continue_failures.borrow_mut();
        if *failures > 0 {
            *failures -= 1;
            return InteractiveOutcome::failed(Some(1));
        }
        let Some((branch, base)) = self.rebasing.borrow_mut().take() else {
            return InteractiveOutcome::failed(Some(128));
        };
        *self.dirty.borrow_mut() = false;
        self.land(&branch, &base);
        InteractiveOutcome::ok()
    }

    fn rebase_abort(&self) -> InteractiveOutcome {
        self.log("rebase --abort".into());
        *self.rebasing.borrow_mut() = None;
        *self.dirty.borrow_mut() = false;
        InteractiveOutcome::ok()
    }

    fn update_ref(&self, name: &str, sha: &str, _message: &str) -> GitResult<()> {
        self.log(format!("update-ref {name} {sha}"));
        self.refs
            .borrow_mut()
            .insert(name.to_string(), sha.to_string());
        Ok(())
    }

    fn delete_ref(&self, name: &str) -> GitResult<()> {
        self.log(format!("update-ref -d {name}"));
        self.refs.borrow_mut().remove(name);
        Ok(())
    }

    fn list_refs(&self, prefix: &str) -> GitResult<Vec<(String, String)>> {
        Ok(self
            .refs
            .borrow()
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, sha)| (name.clone(), sha.clone()))
            .collect())
    }

    fn create_tag(&self, name: &str, sha: &str) -> GitResult<()> {
        self.log(format!("tag {name} {sha}"));
        self.refs
            .borrow_mut()
            .insert(format!("refs/tags/{name}"), sha.to_string());
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> GitResult<()> {
        self.log(format!("tag -d {name}"));
        self.refs.borrow_mut().remove(&format!("refs/tags/{name}"));
        Ok(())
    }

    fn fetch(&self, remote: &str, branch: &str) -> GitResult<()> {
        self.log(format!("fetch {remote} {branch}"));
        Ok(())
    }

    fn remote_divergence(&self, branch: &str, _remote: &str) -> GitResult<RemoteDivergence> {
        Ok(self
            .remote
            .borrow()
            .get(branch)
            .copied()
            .unwrap_or(RemoteDivergence::NoRemote))
    }

    fn pull(&self, remote: &str, branch: &str) -> InteractiveOutcome {
        self.log(format!("pull {remote} {branch}"));
        InteractiveOutcome::ok()
    }
}

/// In-memory state store.
pub struct MockStateStore {
    pub path: PathBuf,
    pub state: RefCell<Option<RebaseState>>,
}

impl Default for MockStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStateStore {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("/mock/repo/.git/rebase-multiple-state.json"),
            state: RefCell::new(None),
        }
    }
}

impl StateStore for MockStateStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Option<RebaseState> {
        self.state.borrow().clone()
    }

    fn save(&self, state: &RebaseState) -> CoreResult<()> {
        *self.state.borrow_mut() = Some(state.clone());
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        *self.state.borrow_mut() = None;
        Ok(())
    }
}

/// Prompts with fixed answers and a log of which were asked.
pub struct ScriptedPrompts {
    pub parent: String,
    pub target: String,
    pub children: Vec<String>,
    pub confirm: bool,
    pub cleanup: CleanupOption,
    pub abort_action: AbortAction,
    pub divergence: DivergenceAction,
    pub asked: RefCell<Vec<&'static str>>,
}

impl ScriptedPrompts {
    pub fn new(parent: &str, target: &str, children: &[&str]) -> Self {
        Self {
            parent: parent.to_string(),
            target: target.to_string(),
            children: children.iter().map(ToString::to_string).collect(),
            confirm: true,
            cleanup: CleanupOption::Keep,
            abort_action: AbortAction::Stash,
            divergence: DivergenceAction::Skip,
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn log(&self) -> Vec<&'static str> {
        self.asked.borrow().clone()
    }

    fn ask(&self, prompt: &'static str) {
        self.asked.borrow_mut().push(prompt);
    }
}

impl Prompts for ScriptedPrompts {
    fn select_parent_branch(&self, _branches: &[BranchRef]) -> Result<String> {
        self.ask("select_parent");
        Ok(self.parent.clone())
    }

    fn select_target_branch(&self, _branches: &[BranchRef], _exclude: &str) -> Result<String> {
        self.ask("select_target");
        Ok(self.target.clone())
    }

    fn select_child_branches(
        &self,
        _parent: &str,
        _candidates: &[BranchRef],
        _others: &[BranchRef],
    ) -> Result<Vec<String>> {
        self.ask("select_children");
        Ok(self.children.clone())
    }

    fn confirm_plan(&self, _config: &RebaseConfig, _steps: &[String]) -> Result<bool> {
        self.ask("confirm_plan");
        Ok(self.confirm)
    }

    fn press_enter_to_continue(&self) -> Result<()> {
        self.ask("press_enter");
        Ok(())
    }

    fn select_cleanup_option(&self) -> Result<CleanupOption> {
        self.ask("select_cleanup");
        Ok(self.cleanup)
    }

    fn select_abort_action(&self) -> Result<AbortAction> {
        self.ask("select_abort");
        Ok(self.abort_action)
    }

    fn select_divergence_action(
        &self,
        _branch: &str,
        _divergence: RemoteDivergence,
    ) -> Result<DivergenceAction> {
        self.ask("select_divergence");
        Ok(self.divergence)
    }
}
