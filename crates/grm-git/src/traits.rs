//! Trait abstractions for git operations.
//!
//! This module defines the `GitOps` trait which abstracts git operations,
//! enabling dependency injection and testability.

use std::path::Path;

use crate::{BranchRef, FailureKind, InteractiveOutcome, RemoteDivergence, Result};

/// Trait for git repository operations.
///
/// Methods returning [`Result`] are capturing calls: a non-zero exit from
/// git is an error carrying stderr. Methods returning
/// [`InteractiveOutcome`] inherit the terminal and never fail; the caller
/// decides what a non-zero exit means.
#[allow(clippy::missing_errors_doc)]
pub trait GitOps {
    // === Repository Info ===

    /// Get the working directory path.
    fn workdir(&self) -> &Path;

    /// Get the repository metadata directory (`.git`).
    fn git_dir(&self) -> &Path;

    /// Get the current branch name.
    ///
    /// Returns an error if HEAD is detached.
    fn current_branch(&self) -> Result<String>;

    /// List every local branch head.
    fn branches(&self) -> Result<Vec<BranchRef>>;

    /// Check if a local branch exists.
    fn branch_exists(&self, name: &str) -> bool;

    /// Resolve a revision to a full commit SHA.
    fn sha(&self, rev: &str) -> Result<String>;

    /// Resolve a revision, returning `None` if it does not exist.
    fn resolve(&self, rev: &str) -> Result<Option<String>>;

    // === History Queries ===

    /// Find the merge base of two revisions.
    fn merge_base(&self, one: &str, two: &str) -> Result<String>;

    /// Count commits in `from..to`.
    fn count_commits(&self, from: &str, to: &str) -> Result<usize>;

    /// Check whether `ancestor` is an ancestor of (or equal to) `descendant`.
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool>;

    // === Working Tree State ===

    /// Check for staged, unstaged or untracked changes.
    fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Check for a `rebase-merge` or `rebase-apply` directory.
    fn is_rebase_in_progress(&self) -> bool;

    /// Check for `index.lock`.
    fn is_locked(&self) -> bool;

    // === Branch Mutation ===

    /// Checkout a branch.
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Hard reset the current branch and working tree.
    fn reset_hard(&self, rev: &str) -> Result<()>;

    /// Move a branch to a commit, resetting the tree if it is checked out.
    fn reset_branch(&self, branch: &str, rev: &str) -> Result<()>;

    /// Stash all uncommitted changes, including untracked files.
    fn stash(&self, message: &str) -> Result<()>;

    /// Throw away all uncommitted changes, including untracked files.
    fn discard_changes(&self) -> Result<()>;

    // === Rebase (interactive) ===

    /// `git rebase <upstream>` on the current branch.
    fn rebase(&self, upstream: &str) -> InteractiveOutcome;

    /// `git rebase --onto <new_base> <upstream>` on the current branch.
    fn rebase_onto(&self, new_base: &str, upstream: &str) -> InteractiveOutcome;

    /// `git rebase --continue`.
    fn rebase_continue(&self) -> InteractiveOutcome;

    /// `git rebase --abort`.
    fn rebase_abort(&self) -> InteractiveOutcome;

    // === References ===

    /// Atomically point `name` at `sha`.
    fn update_ref(&self, name: &str, sha: &str, message: &str) -> Result<()>;

    /// Delete a reference.
    fn delete_ref(&self, name: &str) -> Result<()>;

    /// List `(refname, sha)` pairs under a prefix such as `refs/tags/fork/`.
    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, String)>>;

    /// Create a lightweight tag.
    fn create_tag(&self, name: &str, sha: &str) -> Result<()>;

    /// Delete a tag.
    fn delete_tag(&self, name: &str) -> Result<()>;

    // === Remote ===

    /// Fetch a single branch from a remote.
    fn fetch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Compare a local branch with `<remote>/<branch>`.
    fn remote_divergence(&self, branch: &str, remote: &str) -> Result<RemoteDivergence>;

    /// `git pull --no-edit <remote> <branch>` into the current branch.
    fn pull(&self, remote: &str, branch: &str) -> InteractiveOutcome;

    // === Provided ===

    /// Classify why the last rebase stopped.
    ///
    /// Priority order is lock, conflict, dirty, unknown. A conflict leaves
    /// both a rebase in progress and a dirty tree, so it must be tested
    /// before the plain dirty check.
    fn diagnose_rebase_failure(&self) -> FailureKind {
        if self.is_locked() {
            return FailureKind::Lock;
        }

        let dirty = self.has_uncommitted_changes().unwrap_or(false);
        if self.is_rebase_in_progress() && dirty {
            FailureKind::Conflict
        } else if dirty {
            FailureKind::Dirty
        } else {
            FailureKind::Unknown
        }
    }

    /// Local branches that look like they were forked from `parent`.
    ///
    /// A branch qualifies when the parent's head is an ancestor of it and it
    /// has at least one commit of its own. There are no false positives, but
    /// a dependent branch that was rebased elsewhere will be missed.
    fn find_potential_children(&self, parent: &str) -> Result<Vec<BranchRef>> {
        let parent_sha = self.sha(parent)?;
        let mut children = Vec::new();

        for branch in self.branches()? {
            if branch.name == parent || branch.sha == parent_sha {
                continue;
            }
            if self.is_ancestor(&parent_sha, &branch.sha)?
                && self.count_commits(&parent_sha, &branch.sha)? > 0
            {
                children.push(branch);
            }
        }

        Ok(children)
    }
}
