//! Branch name validation for user-supplied names.
//!
//! Names typed on the command line end up as git arguments and inside ref
//! names (`refs/backup/grm/<branch>`, `fork/<branch>`), so they are checked
//! against git's ref-format rules and a set of shell metacharacters before
//! anything runs.

use crate::error::{Error, Result};

const FORBIDDEN: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];
const SHELL_META: &[char] = &[
    '$', ';', '|', '&', '>', '<', '`', '"', '\'', '(', ')', '{', '}', '!',
];
const FORBIDDEN_SEQUENCES: &[&str] = &["..", "//", "@{", "/."];

/// Validate a branch name.
///
/// # Errors
/// Returns [`Error::InvalidBranchName`] naming the first rule violated.
pub fn validate_branch_name(name: &str) -> Result<()> {
    let reject = |reason: String| {
        Err(Error::InvalidBranchName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return reject("branch name cannot be empty".into());
    }
    if name == "@" {
        return reject("branch name cannot be '@'".into());
    }
    if name.starts_with(['.', '/', '-']) {
        return reject("branch name cannot start with '.', '/' or '-'".into());
    }
    if name.ends_with(['.', '/']) {
        return reject("branch name cannot end with '.' or '/'".into());
    }
    #[allow(clippy::case_sensitive_file_extension_comparisons)]
    if name.ends_with(".lock") {
        return reject("branch name cannot end with '.lock'".into());
    }
    if name.chars().any(|c| c.is_ascii_control()) {
        return reject("branch name cannot contain control characters".into());
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN.contains(c)) {
        return reject(format!("branch name cannot contain '{c}'"));
    }
    if let Some(c) = name.chars().find(|c| SHELL_META.contains(c)) {
        return reject(format!("branch name cannot contain shell metacharacter '{c}'"));
    }
    if let Some(seq) = FORBIDDEN_SEQUENCES.iter().find(|seq| name.contains(**seq)) {
        return reject(format!("branch name cannot contain '{seq}'"));
    }

    Ok(())
}
