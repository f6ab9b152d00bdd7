//! Error types for grm-git.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during git operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Not inside a git repository.
    #[error("not a git repository")]
    NotARepository,

    /// Repository has no working tree.
    #[error("cannot operate on a bare repository")]
    BareRepository,

    /// HEAD is detached (not on a branch).
    #[error("HEAD is detached - checkout a branch first")]
    DetachedHead,

    /// Branch not found.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// A capturing git command exited non-zero.
    #[error("`git {command}` failed ({}): {stderr}", exit_status(.code))]
    Command {
        /// The git arguments, space separated.
        command: String,
        /// Exit code, `None` if killed by a signal.
        code: Option<i32>,
        /// Captured stderr, trimmed.
        stderr: String,
    },

    /// The git binary could not be spawned.
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// Git printed something we could not interpret.
    #[error("unexpected output from `git {command}`: {output}")]
    UnexpectedOutput {
        /// The git arguments, space separated.
        command: String,
        /// The offending output.
        output: String,
    },

    /// Underlying git2 error (repository discovery).
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}

fn exit_status(code: &Option<i32>) -> String {
    code.map_or_else(|| "killed by signal".to_string(), |c| format!("exit {c}"))
}
