//! Configuration loaded from `.git/rebase-multiple.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{AbortAction, CleanupOption};

/// Tool configuration. A missing file yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Answers used when running non-interactively.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl Config {
    /// File name inside the git directory.
    pub const FILE_NAME: &'static str = "rebase-multiple.toml";

    /// Path of the config file for a repository.
    #[must_use]
    pub fn path_in(git_dir: impl AsRef<Path>) -> PathBuf {
        git_dir.as_ref().join(Self::FILE_NAME)
    }

    /// Load config from a TOML file.
    ///
    /// # Errors
    /// Returns error if the file exists but can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Remote compared against in the divergence pre-flight.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Whether to run the divergence pre-flight.
    #[serde(default = "default_true")]
    pub check_remote_divergence: bool,

    /// Whether to wait for the user between child rebases.
    #[serde(default = "default_true")]
    pub pause_between_children: bool,

    /// Echo git commands.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            check_remote_divergence: true,
            pause_between_children: true,
            verbose: false,
        }
    }
}

/// Non-interactive answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_cleanup")]
    pub cleanup: CleanupOption,

    #[serde(default = "default_abort_action")]
    pub abort_action: AbortAction,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            cleanup: default_cleanup(),
            abort_action: default_abort_action(),
        }
    }
}

fn default_remote() -> String {
    "origin".into()
}

const fn default_true() -> bool {
    true
}

const fn default_cleanup() -> CleanupOption {
    CleanupOption::Keep
}

const fn default_abort_action() -> AbortAction {
    AbortAction::Stash
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.remote, "origin");
        assert!(config.general.check_remote_divergence);
        assert!(config.general.pause_between_children);
        assert!(!config.general.verbose);
        assert_eq!(config.defaults.cleanup, CleanupOption::Keep);
        assert_eq!(config.defaults.abort_action, AbortAction::Stash);
    }

    #[test]
    fn test_full_file() {
        let temp = TempDir::new().unwrap();
        let path = Config::path_in(temp.path());
        fs::write(
            &path,
            r#"
[general]
remote = "upstream"
check_remote_divergence = false
pause_between_children = false
verbose = true

[defaults]
cleanup = "delete-all"
abort_action = "discard"
"#,
        )
        .unwrap();

        let expected = Config {
            general: GeneralConfig {
                remote: "upstream".into(),
                check_remote_divergence: false,
                pause_between_children: false,
                verbose: true,
            },
            defaults: DefaultsConfig {
                cleanup: CleanupOption::DeleteAll,
                abort_action: AbortAction::Discard,
            },
        };

        assert_eq!(Config::load(&path).unwrap(), expected);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = Config::path_in(temp.path());
        fs::write(&path, "[defaults]\ncleanup = \"delete-tags-only\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.defaults.cleanup, CleanupOption::DeleteTagsOnly);
        assert_eq!(config.general.remote, "origin");
        assert!(config.general.pause_between_children);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = Config::path_in(temp.path());
        fs::write(&path, "[general]\nremote = 42\n").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_missing_config_returns_default() {
        let config = Config::load("/nonexistent/path/rebase-multiple.toml").unwrap();
        assert_eq!(config, Config::default());
    }
}
