//! One repository, one handle, every operation.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use gitstore_git::{
    AddFilesCommand, CommitId, CommitInfo, DeleteFilesCommand, FileContent, FileQuery,
    GitCommand, ListFilesCommand, LogCommand, ReadFileCommand, ReadFilesCommand, Repository,
    WriteOutcome,
};

use crate::config::Config;
use crate::error::Result;

/// A repository opened once and reused for every command.
///
/// Write operations take the author, remotes and empty-commit policy from
/// the [`Config`]; only the message varies per call.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    repo: Repository,
    config: Config,
}

impl Store {
    /// Open the repository at `path` with an explicit config.
    ///
    /// # Errors
    /// Returns error if `path` is not a repository.
    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let repo = Repository::open(&path)?;
        Ok(Self { path, repo, config })
    }

    /// Open the repository at `path` with the config stored in its git
    /// directory, if any.
    ///
    /// # Errors
    /// Returns error if `path` is not a repository or the config is invalid.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let repo = Repository::open(&path)?;
        let config_path = Config::default_path(repo.git_dir());
        let config = Config::load(&config_path)?;
        tracing::debug!(config = %config_path.display(), "loaded config");
        Ok(Self { path, repo, config })
    }

    /// The underlying repository handle.
    #[must_use]
    pub const fn repository(&self) -> &Repository {
        &self.repo
    }

    /// The active config.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// List tracked files.
    ///
    /// # Errors
    /// Returns error if the revision cannot be resolved.
    pub fn list_files(&self, query: FileQuery) -> Result<BTreeSet<String>> {
        self.run(ListFilesCommand::new(&self.path, query)?)
    }

    /// Read one file at HEAD or at `commit_id`.
    ///
    /// # Errors
    /// Returns error if the path is blank or the file does not exist.
    pub fn read_file(&self, path: &str, commit_id: Option<CommitId>) -> Result<FileContent> {
        let mut command = ReadFileCommand::new(&self.path, path)?;
        if let Some(commit_id) = commit_id {
            command = command.with_commit_id(commit_id);
        }
        self.run(command)
    }

    /// Read every file a query selects, all or nothing.
    ///
    /// # Errors
    /// Returns error if the listing or any single read fails.
    pub fn read_files(&self, query: FileQuery) -> Result<BTreeMap<String, FileContent>> {
        self.run(ReadFilesCommand::new(&self.path, query)?)
    }

    /// Remove files matching `pattern`, commit and push.
    ///
    /// # Errors
    /// Returns error if the pattern is blank or staging or committing fails.
    /// Push failures are reported in the outcome.
    pub fn delete_files(&self, pattern: &str, message: Option<&str>) -> Result<WriteOutcome> {
        let options = self.config.write_options(message)?;
        self.run(DeleteFilesCommand::new(&self.path, pattern)?.with_options(options))
    }

    /// Write files, commit and push.
    ///
    /// # Errors
    /// Returns error if a path is invalid or staging or committing fails.
    /// Push failures are reported in the outcome.
    pub fn add_files(
        &self,
        files: BTreeMap<String, Vec<u8>>,
        message: Option<&str>,
    ) -> Result<WriteOutcome> {
        let options = self.config.write_options(message)?;
        self.run(AddFilesCommand::new(&self.path, files)?.with_options(options))
    }

    /// Commit history, newest first.
    ///
    /// # Errors
    /// Returns error if the history cannot be walked.
    pub fn log(&self, path: Option<&str>, limit: Option<usize>) -> Result<Vec<CommitInfo>> {
        let mut command = LogCommand::new(&self.path)?;
        if let Some(path) = path {
            command = command.with_path(path);
        }
        if let Some(limit) = limit {
            command = command.with_limit(limit);
        }
        self.run(command)
    }

    fn run<C: GitCommand>(&self, command: C) -> Result<C::Output> {
        Ok(command.execute(&self.repo)?)
    }
}
