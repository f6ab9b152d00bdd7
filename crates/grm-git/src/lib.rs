//! # grm-git
//!
//! Git execution layer for git-rebase-multiple.
//!
//! Every operation runs the `git` binary in one of two modes: *capturing*
//! (stdout/stderr collected, non-zero exit is an [`Error::Command`]) for
//! queries and fatal-on-failure mutations, and *interactive* (stdio inherited,
//! never an error) for rebases, where a halt on conflicts is an expected
//! outcome reported through [`InteractiveOutcome`].

mod error;
mod repository;
mod traits;
mod types;

pub use error::{Error, Result};
pub use repository::{ExecOptions, Repository};
pub use traits::GitOps;
pub use types::{BranchRef, FailureKind, InteractiveOutcome, RemoteDivergence};
