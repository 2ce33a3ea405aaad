//! Configuration management for gitstore.

use std::fs;
use std::path::{Path, PathBuf};

use gitstore_git::{Author, EmptyCommitPolicy, WriteOptions};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// gitstore configuration, by default loaded from `.git/gitstore.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Identity for write commits. Falls back to git's `user.name`/`user.email`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorConfig>,

    /// Push settings.
    #[serde(default)]
    pub push: PushConfig,
}

impl Config {
    /// File name of the config inside the git directory.
    pub const FILE_NAME: &'static str = "gitstore.toml";

    /// Default config location for a repository.
    #[must_use]
    pub fn default_path(git_dir: &Path) -> PathBuf {
        git_dir.join(Self::FILE_NAME)
    }

    /// Load config from a TOML file. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
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

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Write options for one write command, with an optional message.
    ///
    /// # Errors
    /// Returns error if the configured author has a blank name or email.
    pub fn write_options(&self, message: Option<&str>) -> Result<WriteOptions> {
        let mut options = WriteOptions::new()
            .with_remotes(self.push.remotes.iter().cloned())
            .with_empty_commits(self.push.empty_commits.into());
        if let Some(author) = &self.author {
            options = options.with_author(Author::new(&author.name, &author.email)?);
        }
        if let Some(message) = message {
            options = options.with_message(message);
        }
        Ok(options)
    }
}

/// Commit identity settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorConfig {
    /// Author name.
    pub name: String,
    /// Author email.
    pub email: String,
}

/// Push settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushConfig {
    /// Remotes to push to. Empty means every configured remote.
    #[serde(default)]
    pub remotes: Vec<String>,

    /// What to do when a write changes nothing.
    #[serde(default)]
    pub empty_commits: EmptyCommits,
}

/// Config-file spelling of [`EmptyCommitPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyCommits {
    /// Commit and push anyway.
    #[default]
    Commit,
    /// Skip the commit and the push.
    Skip,
}

impl From<EmptyCommits> for EmptyCommitPolicy {
    fn from(value: EmptyCommits) -> Self {
        match value {
            EmptyCommits::Commit => Self::Commit,
            EmptyCommits::Skip => Self::Skip,
        }
    }
}
