//! Persistence seam for operation state.
//!
//! [`StateStore`] has three raw operations; the phase and progress updates
//! the orchestrator performs are provided on top of them as
//! load-modify-save.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::state::RebaseState;
use crate::types::{RebaseConfig, RebasePhase};

/// Trait for operation state storage.
///
/// Implementors provide raw load/save/clear; the read-modify-write
/// operations are built on top. There is no locking: one operator, one
/// operation per repository.
#[allow(clippy::missing_errors_doc)]
pub trait StateStore {
    /// Where the state lives, for messages.
    fn location(&self) -> &Path;

    /// Load the state. Missing and unreadable state are both `None`.
    fn load(&self) -> Option<RebaseState>;

    /// Persist the whole state.
    fn save(&self, state: &RebaseState) -> Result<()>;

    /// Remove the state. Succeeds if there is none.
    fn clear(&self) -> Result<()>;

    /// Whether an operation is active.
    fn is_active(&self) -> bool {
        self.load().is_some()
    }

    /// Create and persist the initial state for an operation.
    ///
    /// Call only once the backups and fork points it references exist.
    fn create(
        &self,
        config: &RebaseConfig,
        backups: BTreeMap<String, String>,
        fork_points: BTreeMap<String, String>,
        original_branch: &str,
    ) -> Result<RebaseState> {
        let state = RebaseState::new(config, backups, fork_points, original_branch);
        self.save(&state)?;
        Ok(state)
    }

    /// Load, apply `change`, save, and return the new state.
    fn modify<F: FnOnce(&mut RebaseState)>(&self, change: F) -> Result<RebaseState> {
        let mut state = self.load().ok_or(Error::NoActiveOperation)?;
        change(&mut state);
        self.save(&state)?;
        Ok(state)
    }

    /// Move to a new phase.
    fn update_phase(&self, phase: RebasePhase) -> Result<RebaseState> {
        tracing::debug!(%phase, "phase transition");
        self.modify(|state| state.phase = phase)
    }

    /// Record a branch as rebased.
    fn mark_completed(&self, branch: &str) -> Result<RebaseState> {
        self.modify(|state| state.mark_completed(branch))
    }

    /// Record a child as skipped.
    fn mark_skipped(&self, branch: &str) -> Result<RebaseState> {
        self.modify(|state| state.mark_skipped(branch))
    }

    /// Record which child is being rebased.
    fn set_current_child(&self, child: Option<&str>) -> Result<RebaseState> {
        self.modify(|state| state.current_child = child.map(String::from))
    }
}
