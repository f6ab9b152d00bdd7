//! Repository wrapper that drives the `git` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use colored::Colorize;

use crate::error::{Error, Result};
use crate::traits::GitOps;
use crate::types::{BranchRef, InteractiveOutcome, RemoteDivergence};

/// Per-executor settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOptions {
    /// Echo every git command to stderr before running it.
    pub verbose: bool,
}

/// A git repository, operated on through `git` subprocesses.
///
/// Discovery goes through git2 so that worktrees and `GIT_DIR` layouts
/// resolve the same way git itself resolves them.
pub struct Repository {
    workdir: PathBuf,
    git_dir: PathBuf,
    options: ExecOptions,
}

impl Repository {
    /// Open the repository containing `path`.
    ///
    /// # Errors
    /// Returns error if no repository is found or it is bare.
    pub fn open(path: impl AsRef<Path>, options: ExecOptions) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                Error::NotARepository
            } else {
                Error::Git2(e)
            }
        })?;
        let workdir = inner.workdir().ok_or(Error::BareRepository)?.to_path_buf();
        let git_dir = inner.path().to_path_buf();

        tracing::debug!(workdir = %workdir.display(), git_dir = %git_dir.display(), "opened repository");

        Ok(Self {
            workdir,
            git_dir,
            options,
        })
    }

    /// Open the repository containing the current directory.
    ///
    /// # Errors
    /// Returns error if not inside a non-bare git repository.
    pub fn open_current(options: ExecOptions) -> Result<Self> {
        Self::open(".", options)
    }

    /// The settings this executor was built with.
    #[must_use]
    pub const fn options(&self) -> ExecOptions {
        self.options
    }

    // === Execution modes ===

    fn command(&self, args: &[&str]) -> Command {
        let line = args.join(" ");
        tracing::debug!(command = %line, "git");
        if self.options.verbose {
            eprintln!("{}", format!("$ git {line}").dimmed());
        }

        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.workdir);
        cmd
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        Ok(self.command(args).stdin(Stdio::null()).output()?)
    }

    fn command_error(args: &[&str], output: &Output) -> Error {
        Error::Command {
            command: args.join(" "),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Capturing mode: stdout on success, [`Error::Command`] otherwise.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
        } else {
            Err(Self::command_error(args, &output))
        }
    }

    /// Capturing mode for predicates: exit 0 is `true`, exit 1 is `false`.
    fn run_check(&self, args: &[&str]) -> Result<bool> {
        let output = self.output(args)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(Self::command_error(args, &output)),
        }
    }

    /// Interactive mode: stdio inherited, never an error.
    fn run_interactive(&self, args: &[&str]) -> InteractiveOutcome {
        match self.command(args).status() {
            Ok(status) => InteractiveOutcome {
                success: status.success(),
                exit_code: status.code(),
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn git");
                InteractiveOutcome::failed(None)
            }
        }
    }
}

impl GitOps for Repository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    fn current_branch(&self) -> Result<String> {
        let args = ["symbolic-ref", "--quiet", "--short", "HEAD"];
        let output = self.output(&args)?;
        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout).trim().to_string()),
            Some(1) => Err(Error::DetachedHead),
            _ => Err(Self::command_error(&args, &output)),
        }
    }

    fn branches(&self) -> Result<Vec<BranchRef>> {
        let stdout = self.run(&[
            "for-each-ref",
            "--format=%(refname)%09%(objectname)%09%(HEAD)",
            "refs/heads/",
        ])?;

        let mut branches = Vec::new();
        for line in stdout.lines().filter(|l| !l.is_empty()) {
            let mut fields = line.split('\t');
            let (Some(refname), Some(sha), Some(head)) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(Error::UnexpectedOutput {
                    command: "for-each-ref refs/heads/".into(),
                    output: line.to_string(),
                });
            };
            branches.push(BranchRef {
                name: refname.trim_start_matches("refs/heads/").to_string(),
                sha: sha.to_string(),
                is_current: head == "*",
            });
        }

        Ok(branches)
    }

    fn branch_exists(&self, name: &str) -> bool {
        let refname = format!("refs/heads/{name}");
        self.run_check(&["show-ref", "--verify", "--quiet", &refname])
            .unwrap_or(false)
    }

    fn sha(&self, rev: &str) -> Result<String> {
        self.resolve(rev)?
            .ok_or_else(|| Error::BranchNotFound(rev.to_string()))
    }

    fn resolve(&self, rev: &str) -> Result<Option<String>> {
        let spec = format!("{rev}^{{commit}}");
        let args = ["rev-parse", "--verify", "--quiet", spec.as_str()];
        let output = self.output(&args)?;
        match output.status.code() {
            Some(0) => Ok(Some(
                String::from_utf8_lossy(&output.stdout).trim().to_string(),
            )),
            Some(1) => Ok(None),
            _ => Err(Self::command_error(&args, &output)),
        }
    }

    fn merge_base(&self, one: &str, two: &str) -> Result<String> {
        self.run(&["merge-base", one, two])
    }

    fn count_commits(&self, from: &str, to: &str) -> Result<usize> {
        let range = format!("{from}..{to}");
        let stdout = self.run(&["rev-list", "--count", &range])?;
        stdout
            .trim()
            .parse()
            .map_err(|_| Error::UnexpectedOutput {
                command: format!("rev-list --count {range}"),
                output: stdout,
            })
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        self.run_check(&["merge-base", "--is-ancestor", ancestor, descendant])
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(!self.run(&["status", "--porcelain"])?.is_empty())
    }

    fn is_rebase_in_progress(&self) -> bool {
        self.git_dir.join("rebase-merge").exists() || self.git_dir.join("rebase-apply").exists()
    }

    fn is_locked(&self) -> bool {
        self.git_dir.join("index.lock").exists()
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        if !self.branch_exists(branch) {
            return Err(Error::BranchNotFound(branch.to_string()));
        }
        self.run(&["checkout", "--quiet", branch, "--"])?;
        Ok(())
    }

    fn reset_hard(&self, rev: &str) -> Result<()> {
        self.run(&["reset", "--hard", "--quiet", rev])?;
        Ok(())
    }

    fn reset_branch(&self, branch: &str, rev: &str) -> Result<()> {
        let sha = self.sha(rev)?;
        if self.current_branch().ok().as_deref() == Some(branch) {
            return self.reset_hard(&sha);
        }

        let refname = format!("refs/heads/{branch}");
        let message = format!("git-rebase-multiple: reset {branch} to {}", &sha[..8.min(sha.len())]);
        self.update_ref(&refname, &sha, &message)
    }

    fn stash(&self, message: &str) -> Result<()> {
        self.run(&["stash", "push", "--include-untracked", "-m", message])?;
        Ok(())
    }

    fn discard_changes(&self) -> Result<()> {
        self.run(&["reset", "--hard", "--quiet", "HEAD"])?;
        self.run(&["clean", "-fd", "--quiet"])?;
        Ok(())
    }

    fn rebase(&self, upstream: &str) -> InteractiveOutcome {
        self.run_interactive(&["rebase", upstream])
    }

    fn rebase_onto(&self, new_base: &str, upstream: &str) -> InteractiveOutcome {
        self.run_interactive(&["rebase", "--onto", new_base, upstream])
    }

    fn rebase_continue(&self) -> InteractiveOutcome {
        self.run_interactive(&["rebase", "--continue"])
    }

    fn rebase_abort(&self) -> InteractiveOutcome {
        self.run_interactive(&["rebase", "--abort"])
    }

    fn update_ref(&self, name: &str, sha: &str, message: &str) -> Result<()> {
        self.run(&["update-ref", "-m", message, name, sha])?;
        Ok(())
    }

    fn delete_ref(&self, name: &str) -> Result<()> {
        self.run(&["update-ref", "-d", name])?;
        Ok(())
    }

    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let pattern = prefix.trim_end_matches('/');
        let stdout = self.run(&["for-each-ref", "--format=%(refname)%09%(objectname)", pattern])?;

        Ok(stdout
            .lines()
            .filter_map(|line| line.split_once('\t'))
            .map(|(name, sha)| (name.to_string(), sha.to_string()))
            .collect())
    }

    fn create_tag(&self, name: &str, sha: &str) -> Result<()> {
        self.run(&["tag", name, sha])?;
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.run(&["tag", "-d", name])?;
        Ok(())
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["fetch", "--quiet", remote, branch])?;
        Ok(())
    }

    fn remote_divergence(&self, branch: &str, remote: &str) -> Result<RemoteDivergence> {
        let Some(remote_sha) = self.resolve(&format!("refs/remotes/{remote}/{branch}"))? else {
            return Ok(RemoteDivergence::NoRemote);
        };
        let local_sha = self.sha(branch)?;

        if local_sha == remote_sha {
            return Ok(RemoteDivergence::InSync);
        }

        let ahead = self.count_commits(&remote_sha, &local_sha)?;
        let behind = self.count_commits(&local_sha, &remote_sha)?;

        Ok(match (ahead, behind) {
            (0, 0) => RemoteDivergence::InSync,
            (ahead, 0) => RemoteDivergence::Ahead(ahead),
            (0, behind) => RemoteDivergence::Behind(behind),
            (ahead, behind) => RemoteDivergence::Diverged { ahead, behind },
        })
    }

    fn pull(&self, remote: &str, branch: &str) -> InteractiveOutcome {
        self.run_interactive(&["pull", "--no-edit", remote, branch])
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.git_dir)
            .field("verbose", &self.options.verbose)
            .finish()
    }
}
