//! Data model shared by the managers and the orchestrator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::branch_name::validate_branch_name;
use crate::error::{Error, Result};

/// Immutable input for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebaseConfig {
    /// Branch rebased first.
    pub parent_branch: String,
    /// New base for the parent.
    pub target_branch: String,
    /// Branches forked directly from the parent, in processing order.
    pub child_branches: Vec<String>,
}

impl RebaseConfig {
    /// Build a validated config.
    ///
    /// Every name must be a valid branch name, the parent must differ from the
    /// target, and no child may be the parent or the target. Duplicate
    /// children are dropped, keeping the first occurrence.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBranchName`] or [`Error::InvalidSelection`].
    pub fn new(
        parent_branch: impl Into<String>,
        target_branch: impl Into<String>,
        child_branches: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let parent_branch = parent_branch.into();
        let target_branch = target_branch.into();
        validate_branch_name(&parent_branch)?;
        validate_branch_name(&target_branch)?;

        if parent_branch == target_branch {
            return Err(Error::InvalidSelection(format!(
                "parent and target are both '{parent_branch}'"
            )));
        }

        let mut children: Vec<String> = Vec::new();
        for child in child_branches {
            let child = child.into();
            validate_branch_name(&child)?;
            if child == parent_branch || child == target_branch {
                return Err(Error::InvalidSelection(format!(
                    "'{child}' cannot be both a child and the parent or target"
                )));
            }
            if !children.contains(&child) {
                children.push(child);
            }
        }

        Ok(Self {
            parent_branch,
            target_branch,
            child_branches: children,
        })
    }

    /// Parent followed by every child: the branches this operation mutates.
    pub fn affected_branches(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.parent_branch.as_str())
            .chain(self.child_branches.iter().map(String::as_str))
    }
}

/// A branch head captured before any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// The backed-up branch.
    pub branch: String,
    /// Head SHA at capture time.
    pub sha: String,
    /// Full ref name (`refs/backup/grm/<branch>`).
    pub ref_name: String,
    /// SHA of an older backup this one replaced, if any.
    pub replaced: Option<String>,
}

/// The merge-base of parent and child, captured before the parent moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkPointInfo {
    /// The child branch.
    pub child_branch: String,
    /// Merge-base SHA at capture time.
    pub fork_point_sha: String,
    /// Commits on the child beyond the fork point.
    pub commits_ahead: usize,
    /// Tag name (`fork/<child>`).
    pub tag_name: String,
}

/// Progress of an operation.
///
/// Phases are ordered; `Aborted` is reachable from any non-terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebasePhase {
    Init,
    Backup,
    SaveForkPoints,
    ParentRebase,
    ChildRebase,
    Cleanup,
    Complete,
    Aborted,
}

impl RebasePhase {
    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Aborted)
    }

    /// Upper-case identifier as stored in the state file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Backup => "BACKUP",
            Self::SaveForkPoints => "SAVE_FORK_POINTS",
            Self::ParentRebase => "PARENT_REBASE",
            Self::ChildRebase => "CHILD_REBASE",
            Self::Cleanup => "CLEANUP",
            Self::Complete => "COMPLETE",
            Self::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for RebasePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every choice, in menu order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Kebab-case identifier.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown value '{other}' (expected one of: {})",
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

choice_enum! {
    /// What to do with backups and fork tags once an operation succeeds.
    CleanupOption {
        /// Leave backup refs and fork tags in place.
        Keep => "keep",
        /// Delete backup refs and fork tags.
        DeleteAll => "delete-all",
        /// Delete fork tags, keep backup refs.
        DeleteTagsOnly => "delete-tags-only",
    }
}

choice_enum! {
    /// What to do with uncommitted changes found during `--abort`.
    AbortAction {
        /// `git stash push --include-untracked`.
        Stash => "stash",
        /// Hard reset and clean.
        Discard => "discard",
        /// Leave everything as is and stop.
        Cancel => "cancel",
    }
}

choice_enum! {
    /// What to do when a branch is behind or diverged from its remote.
    DivergenceAction {
        /// Merge the remote branch into the local one.
        Pull => "pull",
        /// Move the local branch to the remote-tracking SHA.
        Reset => "reset",
        /// Proceed with the local branch as is.
        Skip => "skip",
        /// Stop without changing anything.
        Cancel => "cancel",
    }
}
