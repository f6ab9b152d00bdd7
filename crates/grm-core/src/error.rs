//! Error types for grm-core.

use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in grm-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `index.lock` exists.
    #[error(
        "repository is locked by another git process (.git/index.lock exists) - wait for it to finish, or remove the lock if it is stale"
    )]
    RepositoryLocked,

    /// A state file already exists.
    #[error(
        "a rebase-multiple operation is already in progress - run `git rebase-multiple --continue` or `git rebase-multiple --abort`"
    )]
    OperationInProgress,

    /// A native git rebase is active.
    #[error("a git rebase is already in progress - finish it with `git rebase --continue` or `git rebase --abort`")]
    RebaseInProgress,

    /// Uncommitted changes in the working tree.
    #[error("working tree has uncommitted changes - commit or run `git stash` first")]
    DirtyWorkingTree,

    /// Children without a fork-point tag cannot be rebased safely.
    #[error(
        "fork points missing for: {} - run `git rebase-multiple --abort` and start again",
        .0.join(", ")
    )]
    MissingForkPoints(Vec<String>),

    /// Invalid branch name.
    #[error("invalid branch name '{name}': {reason}")]
    InvalidBranchName {
        /// The invalid name.
        name: String,
        /// Why the name is invalid.
        reason: String,
    },

    /// The chosen branches do not form a usable configuration.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// No state file.
    #[error("no rebase-multiple operation in progress")]
    NoActiveOperation,

    /// No backup ref for the branch.
    #[error("no backup found for '{0}' - run `git rebase-multiple --status` to list backups")]
    BackupNotFound(String),

    /// Config file parsing error.
    #[error("failed to parse {file}: {message}")]
    ConfigParse {
        /// The config file.
        file: PathBuf,
        /// Parser message.
        message: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Git operation error.
    #[error(transparent)]
    Git(#[from] grm_git::Error),
}

impl Error {
    /// Whether this error is raised before any mutation because a
    /// precondition does not hold.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::RepositoryLocked
                | Self::OperationInProgress
                | Self::RebaseInProgress
                | Self::DirtyWorkingTree
                | Self::MissingForkPoints(_)
                | Self::InvalidBranchName { .. }
                | Self::InvalidSelection(_)
        )
    }
}
