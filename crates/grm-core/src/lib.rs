//! # grm-core
//!
//! Durable bookkeeping for multi-branch rebases.
//!
//! - [`BackupManager`] snapshots branch heads into `refs/backup/grm/<branch>`.
//! - [`ForkPointManager`] records parent/child merge-bases as `fork/<child>` tags.
//! - [`StateManager`] persists operation progress to
//!   `.git/rebase-multiple-state.json` so an interrupted run can resume or
//!   roll back.
//!
//! Git refs and tags are the safety net; the state file is advisory.

pub mod backup;
pub mod branch_name;
pub mod config;
pub mod error;
pub mod fork_point;
pub mod state;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_support;

pub use backup::BackupManager;
pub use branch_name::validate_branch_name;
pub use config::Config;
pub use error::{Error, Result};
pub use fork_point::ForkPointManager;
pub use state::{RebaseState, StateManager};
pub use traits::StateStore;
pub use types::{
    AbortAction, BackupInfo, CleanupOption, DivergenceAction, ForkPointInfo, RebaseConfig,
    RebasePhase,
};
