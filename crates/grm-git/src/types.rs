//! Plain data returned by git queries.

use std::fmt;

/// A local branch head, read live from git.
///
/// Never cache one of these across calls; the SHA is only valid for the
/// instant it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    /// Short branch name (`feature/auth`).
    pub name: String,
    /// Full commit SHA of the branch head.
    pub sha: String,
    /// Whether this branch is checked out.
    pub is_current: bool,
}

impl BranchRef {
    /// Abbreviated SHA for display.
    #[must_use]
    pub fn short_sha(&self) -> &str {
        &self.sha[..self.sha.len().min(8)]
    }
}

/// Result of an interactive (stdio-inherited) git invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractiveOutcome {
    /// Whether git exited zero.
    pub success: bool,
    /// Exit code, `None` if git could not be spawned or was killed by a signal.
    pub exit_code: Option<i32>,
}

impl InteractiveOutcome {
    /// A successful outcome.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
        }
    }

    /// A failed outcome with the given exit code.
    #[must_use]
    pub const fn failed(exit_code: Option<i32>) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Why a rebase stopped.
///
/// Variants are listed in diagnosis priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// `index.lock` exists: another git process owns the repository.
    Lock,
    /// A rebase is in progress and the tree has unmerged changes.
    Conflict,
    /// Uncommitted changes with no rebase in progress.
    Dirty,
    /// None of the above.
    Unknown,
}

impl FailureKind {
    /// Lowercase identifier (`lock`, `conflict`, `dirty`, `unknown`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Conflict => "conflict",
            Self::Dirty => "dirty",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship between a local branch and its remote-tracking ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDivergence {
    /// Same commit.
    InSync,
    /// Local has commits the remote lacks.
    Ahead(usize),
    /// Remote has commits the local branch lacks.
    Behind(usize),
    /// Both sides have unique commits.
    Diverged {
        /// Commits only on the local branch.
        ahead: usize,
        /// Commits only on the remote branch.
        behind: usize,
    },
    /// No remote-tracking ref exists.
    NoRemote,
}

impl RemoteDivergence {
    /// Whether the local branch is missing remote commits.
    #[must_use]
    pub const fn needs_attention(self) -> bool {
        matches!(self, Self::Behind(_) | Self::Diverged { .. })
    }
}
