//! Operation state persisted to `.git/rebase-multiple-state.json`.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::traits::StateStore;
use crate::types::{RebaseConfig, RebasePhase};

/// Progress of one multi-branch rebase.
///
/// Advisory only: backups and fork points are git objects and survive
/// even if this file is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebaseState {
    /// When the operation started.
    pub started_at: DateTime<Utc>,

    /// Current phase.
    pub phase: RebasePhase,

    pub parent_branch: String,
    pub target_branch: String,
    pub child_branches: Vec<String>,

    /// Branch name to pre-operation head SHA.
    pub backups: BTreeMap<String, String>,

    /// Child name to fork-point SHA.
    pub fork_points: BTreeMap<String, String>,

    /// Branches rebased so far, in order.
    pub completed: Vec<String>,

    /// Branches still to rebase, in order. The parent comes first.
    pub pending: Vec<String>,

    /// Child whose rebase is running or halted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_child: Option<String>,

    /// Branch checked out before the operation.
    pub original_branch: String,

    /// Children skipped because their fork point was missing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl RebaseState {
    /// Initial state: phase `INIT`, everything pending.
    #[must_use]
    pub fn new(
        config: &RebaseConfig,
        backups: BTreeMap<String, String>,
        fork_points: BTreeMap<String, String>,
        original_branch: &str,
    ) -> Self {
        Self {
            started_at: Utc::now(),
            phase: RebasePhase::Init,
            parent_branch: config.parent_branch.clone(),
            target_branch: config.target_branch.clone(),
            child_branches: config.child_branches.clone(),
            backups,
            fork_points,
            completed: vec![],
            pending: config.affected_branches().map(String::from).collect(),
            current_child: None,
            original_branch: original_branch.to_string(),
            skipped: vec![],
        }
    }

    /// The operation's input.
    #[must_use]
    pub fn config(&self) -> RebaseConfig {
        RebaseConfig {
            parent_branch: self.parent_branch.clone(),
            target_branch: self.target_branch.clone(),
            child_branches: self.child_branches.clone(),
        }
    }

    /// Whether the parent has been rebased.
    #[must_use]
    pub fn parent_done(&self) -> bool {
        self.is_completed(&self.parent_branch)
    }

    /// Whether a branch has been rebased.
    #[must_use]
    pub fn is_completed(&self, branch: &str) -> bool {
        self.completed.iter().any(|b| b == branch)
    }

    /// First pending child.
    #[must_use]
    pub fn next_child(&self) -> Option<&str> {
        self.pending
            .iter()
            .find(|b| **b != self.parent_branch)
            .map(String::as_str)
    }

    /// Move a branch from pending to completed.
    pub fn mark_completed(&mut self, branch: &str) {
        self.pending.retain(|b| b != branch);
        if !self.is_completed(branch) {
            self.completed.push(branch.to_string());
        }
        if self.current_child.as_deref() == Some(branch) {
            self.current_child = None;
        }
    }

    /// Move a child from pending to skipped.
    pub fn mark_skipped(&mut self, branch: &str) {
        self.pending.retain(|b| b != branch);
        if !self.skipped.iter().any(|b| b == branch) {
            self.skipped.push(branch.to_string());
        }
        if self.current_child.as_deref() == Some(branch) {
            self.current_child = None;
        }
    }

    /// The branch whose rebase is running or halted, if any.
    #[must_use]
    pub fn current_unit(&self) -> Option<&str> {
        match self.phase {
            RebasePhase::ParentRebase if !self.parent_done() => Some(self.parent_branch.as_str()),
            RebasePhase::ChildRebase => self.current_child.as_deref(),
            _ => None,
        }
    }
}

/// File-backed [`StateStore`].
#[derive(Debug, Clone)]
pub struct StateManager {
    path: PathBuf,
}

impl StateManager {
    /// File name inside the git directory.
    pub const STATE_FILE: &'static str = "rebase-multiple-state.json";

    /// State manager for the repository whose metadata directory is `git_dir`.
    #[must_use]
    pub fn new(git_dir: impl AsRef<Path>) -> Self {
        Self {
            path: git_dir.as_ref().join(Self::STATE_FILE),
        }
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl StateStore for StateManager {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Option<RebaseState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable state file, treating as no active operation");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt state file, treating as no active operation");
                None
            }
        }
    }

    /// Write and sync a sibling temp file, then rename over the real one.
    fn save(&self, state: &RebaseState) -> Result<()> {
        let content = serde_json::to_string_pretty(state)?;
        let temp = self.temp_path();
        let mut file = File::create(&temp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn setup() -> (TempDir, StateManager) {
        let temp = TempDir::new().unwrap();
        let manager = StateManager::new(temp.path());
        (temp, manager)
    }

    fn config() -> RebaseConfig {
        RebaseConfig::new("feature", "main", ["child-1", "child-2"]).unwrap()
    }

    fn create(manager: &StateManager) -> RebaseState {
        let backups = BTreeMap::from([
            ("feature".to_string(), "aaa".to_string()),
            ("child-1".to_string(), "bbb".to_string()),
            ("child-2".to_string(), "ccc".to_string()),
        ]);
        let forks = BTreeMap::from([
            ("child-1".to_string(), "f1".to_string()),
            ("child-2".to_string(), "f2".to_string()),
        ]);
        manager.create(&config(), backups, forks, "main").unwrap()
    }

    #[test]
    fn test_create_initial_state() {
        let (_temp, manager) = setup();
        let state = create(&manager);

        assert_eq!(state.phase, RebasePhase::Init);
        assert_eq!(state.pending, vec!["feature", "child-1", "child-2"]);
        assert!(state.completed.is_empty());
        assert_eq!(state.original_branch, "main");
        assert_eq!(manager.load().unwrap(), state);
        assert!(manager.is_active());
    }

    #[test]
    fn test_missing_file_is_no_operation() {
        let (_temp, manager) = setup();
        assert!(manager.load().is_none());
        assert!(!manager.is_active());
    }

    #[test]
    fn test_corrupt_file_fails_open() {
        let (_temp, manager) = setup();
        fs::write(manager.location(), "{ not json").unwrap();
        assert!(manager.load().is_none());
    }

    #[test]
    fn test_read_modify_write_operations() {
        let (_temp, manager) = setup();
        create(&manager);

        manager.update_phase(RebasePhase::ParentRebase).unwrap();
        manager.mark_completed("feature").unwrap();
        manager.update_phase(RebasePhase::ChildRebase).unwrap();
        manager.set_current_child(Some("child-1")).unwrap();

        let state = manager.load().unwrap();
        assert_eq!(state.phase, RebasePhase::ChildRebase);
        assert_eq!(state.completed, vec!["feature"]);
        assert_eq!(state.pending, vec!["child-1", "child-2"]);
        assert_eq!(state.current_unit(), Some("child-1"));

        let state = manager.mark_completed("child-1").unwrap();
        assert!(state.current_child.is_none());
        assert_eq!(state.next_child(), Some("child-2"));

        let state = manager.mark_skipped("child-2").unwrap();
        assert_eq!(state.skipped, vec!["child-2"]);
        assert!(state.pending.is_empty());
        assert_eq!(state.next_child(), None);
    }

    #[test]
    fn test_mark_completed_is_idempotent() {
        let (_temp, manager) = setup();
        create(&manager);
        manager.mark_completed("feature").unwrap();
        let state = manager.mark_completed("feature").unwrap();
        assert_eq!(state.completed, vec!["feature"]);
    }

    #[test]
    fn test_update_without_state() {
        let (_temp, manager) = setup();
        assert!(matches!(
            manager.update_phase(RebasePhase::Cleanup),
            Err(Error::NoActiveOperation)
        ));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let (temp, manager) = setup();
        create(&manager);
        manager.update_phase(RebasePhase::Backup).unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![StateManager::STATE_FILE.to_string()]);
    }

    #[test]
    fn test_save_overwrites_stale_temp_file() {
        let (temp, manager) = setup();
        let stale = temp.path().join(format!("{}.tmp", StateManager::STATE_FILE));
        fs::write(&stale, "{ \"leftover\": true, \"padding\": \"xxxxxxxxxxxxxxxxxxxxxxxx\" }").unwrap();

        let created = create(&manager);
        assert_eq!(manager.load(), Some(created));
        assert!(!stale.exists());
    }

    #[test]
    fn test_clear_twice() {
        let (_temp, manager) = setup();
        create(&manager);
        manager.clear().unwrap();
        manager.clear().unwrap();
        assert!(manager.load().is_none());
    }

    #[test]
    fn test_file_format_uses_camel_case() {
        let (_temp, manager) = setup();
        create(&manager);
        manager.set_current_child(Some("child-1")).unwrap();

        let raw = fs::read_to_string(manager.location()).unwrap();
        assert!(raw.contains("\"startedAt\""));
        assert!(raw.contains("\"parentBranch\""));
        assert!(raw.contains("\"forkPoints\""));
        assert!(raw.contains("\"currentChild\": \"child-1\""));
        assert!(raw.contains("\"phase\": \"INIT\""));
    }

    #[test]
    fn test_loads_file_without_optional_fields() {
        let (_temp, manager) = setup();
        let raw = r#"{
            "startedAt": "2024-01-01T00:00:00Z",
            "phase": "PARENT_REBASE",
            "parentBranch": "feature",
            "targetBranch": "main",
            "childBranches": ["child"],
            "backups": {"feature": "aaa", "child": "bbb"},
            "forkPoints": {"child": "fff"},
            "completed": [],
            "pending": ["feature", "child"],
            "originalBranch": "main"
        }"#;
        fs::write(manager.location(), raw).unwrap();

        let state = manager.load().unwrap();
        assert_eq!(state.current_unit(), Some("feature"));
        assert!(state.skipped.is_empty());
        assert_eq!(state.config().child_branches, vec!["child"]);
    }
}
