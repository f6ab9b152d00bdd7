//! Fork-point tags: where each child left its parent.
//!
//! The merge-base of parent and child must be captured while the parent
//! still points at its old history. Once the parent is rebased, the
//! merge-base of new parent and child is an older commit, and
//! `rebase --onto <parent> <that commit>` would silently replay the parent's
//! old commits onto the child. The tag `fork/<child>` freezes the correct
//! commit.

use grm_git::GitOps;

use crate::error::{Error, Result};
use crate::types::ForkPointInfo;

/// Records and looks up fork-point tags.
#[derive(Debug)]
pub struct ForkPointManager<'a, G: GitOps> {
    repo: &'a G,
}

impl<'a, G: GitOps> ForkPointManager<'a, G> {
    /// Prefix of every fork-point tag.
    pub const TAG_PREFIX: &'static str = "fork/";

    const TAG_REF_PREFIX: &'static str = "refs/tags/fork/";

    #[must_use]
    pub const fn new(repo: &'a G) -> Self {
        Self { repo }
    }

    /// Tag name for a child (`fork/<child>`).
    #[must_use]
    pub fn tag_name(child: &str) -> String {
        format!("{}{child}", Self::TAG_PREFIX)
    }

    /// Fully qualified tag ref, unambiguous against branches named `fork/...`.
    #[must_use]
    pub fn tag_ref(child: &str) -> String {
        format!("{}{child}", Self::TAG_REF_PREFIX)
    }

    /// Compute and tag the fork point of `child` from `parent`.
    ///
    /// Must run before `parent` is rebased. A stale tag from an earlier
    /// operation is replaced.
    ///
    /// # Errors
    /// Returns error if either branch is missing or they share no history.
    pub fn save(&self, parent: &str, child: &str) -> Result<ForkPointInfo> {
        let parent_ref = format!("refs/heads/{parent}");
        let child_ref = format!("refs/heads/{child}");

        let fork_point_sha = self.repo.merge_base(&parent_ref, &child_ref)?;
        let commits_ahead = self.repo.count_commits(&fork_point_sha, &child_ref)?;

        let tag_name = Self::tag_name(child);
        if self.repo.resolve(&Self::tag_ref(child))?.is_some() {
            self.repo.delete_tag(&tag_name)?;
        }
        self.repo.create_tag(&tag_name, &fork_point_sha)?;

        tracing::debug!(parent, child, fork_point = %fork_point_sha, commits_ahead, "fork point saved");

        Ok(ForkPointInfo {
            child_branch: child.to_string(),
            fork_point_sha,
            commits_ahead,
            tag_name,
        })
    }

    /// Look up the fork point of a child.
    ///
    /// `commits_ahead` is counted against the child's current head.
    ///
    /// # Errors
    /// Returns error if git fails.
    pub fn get(&self, child: &str) -> Result<Option<ForkPointInfo>> {
        let Some(fork_point_sha) = self.repo.resolve(&Self::tag_ref(child))? else {
            return Ok(None);
        };
        let commits_ahead = self.commits_ahead(&fork_point_sha, child)?;

        Ok(Some(ForkPointInfo {
            child_branch: child.to_string(),
            fork_point_sha,
            commits_ahead,
            tag_name: Self::tag_name(child),
        }))
    }

    fn commits_ahead(&self, fork_point_sha: &str, child: &str) -> Result<usize> {
        if !self.repo.branch_exists(child) {
            return Ok(0);
        }
        Ok(self
            .repo
            .count_commits(fork_point_sha, &format!("refs/heads/{child}"))?)
    }

    /// Children among `children` that have no fork-point tag.
    ///
    /// # Errors
    /// Returns error if git fails.
    pub fn missing(&self, children: &[String]) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for child in children {
            if self.repo.resolve(&Self::tag_ref(child))?.is_none() {
                missing.push(child.clone());
            }
        }
        Ok(missing)
    }

    /// Fail unless every child has a fork-point tag.
    ///
    /// # Errors
    /// Returns [`Error::MissingForkPoints`] listing the children without one.
    pub fn require_all(&self, children: &[String]) -> Result<()> {
        let missing = self.missing(children)?;
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingForkPoints(missing))
        }
    }

    /// Delete one fork-point tag. Returns whether it existed.
    ///
    /// # Errors
    /// Returns error if git fails.
    pub fn delete(&self, child: &str) -> Result<bool> {
        if self.repo.resolve(&Self::tag_ref(child))?.is_none() {
            return Ok(false);
        }
        self.repo.delete_tag(&Self::tag_name(child))?;
        Ok(true)
    }

    /// Every fork-point tag, sorted by child name.
    ///
    /// # Errors
    /// Returns error if git fails.
    pub fn list(&self) -> Result<Vec<ForkPointInfo>> {
        let mut forks = Vec::new();
        for (ref_name, sha) in self.repo.list_refs(Self::TAG_REF_PREFIX)? {
            let Some(child) = ref_name.strip_prefix(Self::TAG_REF_PREFIX) else {
                continue;
            };
            forks.push(ForkPointInfo {
                child_branch: child.to_string(),
                commits_ahead: self.commits_ahead(&sha, child)?,
                fork_point_sha: sha,
                tag_name: Self::tag_name(child),
            });
        }
        forks.sort_by(|a, b| a.child_branch.cmp(&b.child_branch));
        Ok(forks)
    }

    /// Delete every fork-point tag. Returns how many were removed.
    ///
    /// # Errors
    /// Returns error if git fails.
    pub fn cleanup(&self) -> Result<usize> {
        let forks = self.list()?;
        for fork in &forks {
            self.repo.delete_tag(&fork.tag_name)?;
        }
        Ok(forks.len())
    }
}
