//! Throwaway repositories for tests.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;
use std::process::Command;

use grm_git::{ExecOptions, Repository};
use tempfile::TempDir;

pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn commit_file(dir: &Path, file: &str, content: &str, msg: &str) {
    fs::write(dir.join(file), content).unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", msg]);
}

/// Commit `count` new files named `<prefix>-<n>.txt`.
pub fn commit_many(dir: &Path, prefix: &str, count: usize) {
    for n in 0..count {
        let name = format!("{prefix}-{n}.txt");
        commit_file(dir, &name, &name, &name);
    }
}

pub fn init_test_repo() -> (TempDir, Repository) {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    git(dir, &["init"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "core.editor", "true"]);
    commit_file(dir, "README.md", "# Test\n", "Initial commit");
    git(dir, &["branch", "-M", "main"]);

    let repo = Repository::open(dir, ExecOptions::default()).unwrap();
    (temp, repo)
}
