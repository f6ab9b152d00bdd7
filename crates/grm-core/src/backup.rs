//! Backup refs: durable snapshots of branch heads.
//!
//! A backup lives at `refs/backup/grm/<branch>`. Writing it is a single
//! `update-ref`, so a backup is either fully present or absent, and unlike
//! reflog entries it is never garbage collected until deleted.

use grm_git::GitOps;

use crate::error::{Error, Result};
use crate::types::BackupInfo;

/// Creates, restores and removes backup refs.
#[derive(Debug)]
pub struct BackupManager<'a, G: GitOps> {
    repo: &'a G,
}

impl<'a, G: GitOps> BackupManager<'a, G> {
    /// Namespace every backup ref lives under.
    pub const REF_PREFIX: &'static str = "refs/backup/grm/";

    #[must_use]
    pub const fn new(repo: &'a G) -> Self {
        Self { repo }
    }

    /// Backup ref name for a branch.
    #[must_use]
    pub fn ref_name(branch: &str) -> String {
        format!("{}{branch}", Self::REF_PREFIX)
    }

    /// Record the branch's current head.
    ///
    /// An existing backup for the same branch is replaced; the old SHA is
    /// reported in [`BackupInfo::replaced`].
    ///
    /// # Errors
    /// Returns error if the branch does not exist or the ref update fails.
    pub fn create(&self, branch: &str) -> Result<BackupInfo> {
        let sha = self.repo.sha(&format!("refs/heads/{branch}"))?;
        let ref_name = Self::ref_name(branch);

        let replaced = self.repo.resolve(&ref_name)?.filter(|old| *old != sha);
        if let Some(old) = &replaced {
            tracing::warn!(branch, old = %old, new = %sha, "replacing existing backup");
        }

        self.repo.update_ref(
            &ref_name,
            &sha,
            &format!("git-rebase-multiple: backup {branch}"),
        )?;
        tracing::debug!(branch, %sha, "backup created");

        Ok(BackupInfo {
            branch: branch.to_string(),
            sha,
            ref_name,
            replaced,
        })
    }

    /// Look up the backup for a branch.
    ///
    /// # Errors
    /// Returns error if git fails.
    pub fn get(&self, branch: &str) -> Result<Option<BackupInfo>> {
        let ref_name = Self::ref_name(branch);
        Ok(self.repo.resolve(&ref_name)?.map(|sha| BackupInfo {
            branch: branch.to_string(),
            sha,
            ref_name,
            replaced: None,
        }))
    }

    /// Checkout the branch and hard-reset it to its backup.
    ///
    /// Destructive: anything committed on the branch since the backup is
    /// dropped from the branch (it stays reachable through the reflog).
    ///
    /// # Errors
    /// Returns [`Error::BackupNotFound`] if there is no backup.
    pub fn restore(&self, branch: &str) -> Result<String> {
        let info = self
            .get(branch)?
            .ok_or_else(|| Error::BackupNotFound(branch.to_string()))?;
        self.restore_to(branch, &info.sha)?;
        Ok(info.sha)
    }

    /// Checkout the branch and hard-reset it to `sha`.
    ///
    /// A branch that no longer exists is recreated at `sha`.
    ///
    /// # Errors
    /// Returns error if checkout or reset fails.
    pub fn restore_to(&self, branch: &str, sha: &str) -> Result<()> {
        if !self.repo.branch_exists(branch) {
            self.repo.update_ref(
                &format!("refs/heads/{branch}"),
                sha,
                &format!("git-rebase-multiple: recreate {branch}"),
            )?;
            tracing::debug!(branch, sha, "branch recreated from backup");
            return Ok(());
        }
        self.repo.checkout(branch)?;
        self.repo.reset_hard(sha)?;
        tracing::debug!(branch, sha, "branch restored");
        Ok(())
    }

    /// Every backup, sorted by branch name.
    ///
    /// # Errors
    /// Returns error if git fails.
    pub fn list(&self) -> Result<Vec<BackupInfo>> {
        let mut backups: Vec<BackupInfo> = self
            .repo
            .list_refs(Self::REF_PREFIX)?
            .into_iter()
            .filter_map(|(ref_name, sha)| {
                let branch = ref_name.strip_prefix(Self::REF_PREFIX)?.to_string();
                Some(BackupInfo {
                    branch,
                    sha,
                    ref_name,
                    replaced: None,
                })
            })
            .collect();
        backups.sort_by(|a, b| a.branch.cmp(&b.branch));
        Ok(backups)
    }

    /// Delete one backup. Returns whether it existed.
    ///
    /// # Errors
    /// Returns error if git fails.
    pub fn delete(&self, branch: &str) -> Result<bool> {
        let ref_name = Self::ref_name(branch);
        if self.repo.resolve(&ref_name)?.is_none() {
            return Ok(false);
        }
        self.repo.delete_ref(&ref_name)?;
        Ok(true)
    }

    /// Delete every backup. Returns how many were removed.
    ///
    /// # Errors
    /// Returns error if git fails.
    pub fn cleanup(&self) -> Result<usize> {
        let backups = self.list()?;
        for backup in &backups {
            self.repo.delete_ref(&backup.ref_name)?;
        }
        Ok(backups.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{commit_file, git, init_test_repo};

    #[test]
    fn test_create_records_current_head() {
        let (temp, repo) = init_test_repo();
        git(temp.path(), &["checkout", "-b", "feature/a"]);
        commit_file(temp.path(), "a.txt", "a", "a");
        let head = repo.sha("feature/a").unwrap();

        let backups = BackupManager::new(&repo);
        let info = backups.create("feature/a").unwrap();

        assert_eq!(info.sha, head);
        assert_eq!(info.ref_name, "refs/backup/grm/feature/a");
        assert!(info.replaced.is_none());
        assert_eq!(repo.sha("refs/backup/grm/feature/a").unwrap(), head);
    }

    #[test]
    fn test_create_for_missing_branch_fails() {
        let (_temp, repo) = init_test_repo();
        assert!(BackupManager::new(&repo).create("nope").is_err());
    }

    #[test]
    fn test_recreate_reports_replaced_sha() {
        let (temp, repo) = init_test_repo();
        let backups = BackupManager::new(&repo);
        let first = backups.create("main").unwrap();

        commit_file(temp.path(), "b.txt", "b", "b");
        let second = backups.create("main").unwrap();

        assert_eq!(second.replaced, Some(first.sha));
        assert_eq!(backups.get("main").unwrap().unwrap().sha, second.sha);
    }

    #[test]
    fn test_restore_resets_branch() {
        let (temp, repo) = init_test_repo();
        let backups = BackupManager::new(&repo);
        let info = backups.create("main").unwrap();

        commit_file(temp.path(), "later.txt", "later", "later");
        assert_ne!(repo.sha("main").unwrap(), info.sha);

        let restored = backups.restore("main").unwrap();
        assert_eq!(restored, info.sha);
        assert_eq!(repo.sha("main").unwrap(), info.sha);
        assert!(!temp.path().join("later.txt").exists());
    }

    #[test]
    fn test_restore_recreates_deleted_branch() {
        let (temp, repo) = init_test_repo();
        git(temp.path(), &["checkout", "-b", "gone"]);
        commit_file(temp.path(), "gone.txt", "gone", "gone");
        let backups = BackupManager::new(&repo);
        let info = backups.create("gone").unwrap();

        git(temp.path(), &["checkout", "main"]);
        git(temp.path(), &["branch", "-D", "gone"]);
        assert!(!repo.branch_exists("gone"));

        assert_eq!(backups.restore("gone").unwrap(), info.sha);
        assert_eq!(repo.sha("gone").unwrap(), info.sha);
        assert_eq!(repo.current_branch().unwrap(), "main");
    }

    #[test]
    fn test_restore_without_backup() {
        let (_temp, repo) = init_test_repo();
        assert!(matches!(
            BackupManager::new(&repo).restore("main"),
            Err(Error::BackupNotFound(_))
        ));
    }

    #[test]
    fn test_list_delete_cleanup() {
        let (temp, repo) = init_test_repo();
        git(temp.path(), &["branch", "zeta"]);
        git(temp.path(), &["branch", "alpha"]);

        let backups = BackupManager::new(&repo);
        backups.create("zeta").unwrap();
        backups.create("alpha").unwrap();
        backups.create("main").unwrap();

        let names: Vec<_> = backups.list().unwrap().into_iter().map(|b| b.branch).collect();
        assert_eq!(names, vec!["alpha", "main", "zeta"]);

        assert!(backups.delete("alpha").unwrap());
        assert!(!backups.delete("alpha").unwrap());
        assert_eq!(backups.cleanup().unwrap(), 2);
        assert!(backups.list().unwrap().is_empty());
    }
}
