//! Commands that change the repository: stage, then commit and push.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use git2::IndexMatchedPath;

use crate::commit::{WriteOptions, WriteOutcome, WritePlan, commit_and_push};
use crate::error::{ArgumentError, Result};
use crate::traits::{GitCommand, require_repository_path};
use crate::Repository;

/// Remove every tracked file matching a pattern, then commit and push.
///
/// Acts on the live index of the current branch, like `git rm`: matching
/// entries leave the index and their files leave the working tree.
#[derive(Debug, Clone)]
pub struct DeleteFilesCommand {
    repository_path: PathBuf,
    pattern: String,
    options: WriteOptions,
}

impl DeleteFilesCommand {
    /// Create a delete command for a git pathspec.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] if the repository path is empty or the
    /// pattern is blank.
    pub fn new(
        repository_path: impl Into<PathBuf>,
        pattern: impl Into<String>,
    ) -> std::result::Result<Self, ArgumentError> {
        let repository_path = repository_path.into();
        let pattern = pattern.into();
        require_repository_path(&repository_path)?;
        ArgumentError::require_non_blank("file pattern", &pattern)?;
        Ok(Self {
            repository_path,
            pattern,
            options: WriteOptions::default(),
        })
    }

    /// Use these commit and push options.
    #[must_use]
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// The pathspec being removed.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl GitCommand for DeleteFilesCommand {
    type Output = WriteOutcome;

    fn repository_path(&self) -> &Path {
        &self.repository_path
    }

    fn execute(self, repo: &Repository) -> Result<Self::Output> {
        let workdir = repo.require_workdir()?.to_path_buf();
        let plan = WritePlan::resolve(repo, &self.options)?;

        let mut index = repo.inner().index()?;
        index.read(false)?;

        let mut removed = Vec::new();
        let mut record = |path: &Path, _: &[u8]| -> i32 {
            removed.push(path.to_path_buf());
            0
        };
        index.remove_all(
            [self.pattern.as_str()],
            Some(&mut record as &mut IndexMatchedPath<'_>),
        )?;
        index.write()?;
        tracing::debug!(pattern = %self.pattern, count = removed.len(), "staged removals");

        for path in &removed {
            remove_from_workdir(&workdir, path);
        }

        let message = self
            .options
            .message()
            .map_or_else(|| format!("Delete {}", self.pattern), String::from);
        commit_and_push(repo, &mut index, &plan, self.options.empty_commits(), &message)
    }
}

/// Delete a file that left the index, plus any directories it leaves empty.
///
/// Failures here are logged: the removal is already staged and committing
/// it matters more than a stray file.
fn remove_from_workdir(workdir: &Path, relative: &Path) {
    let full = workdir.join(relative);
    match fs::remove_file(&full) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return,
        Err(e) => {
            tracing::warn!(path = %full.display(), error = %e, "could not remove file from working tree");
            return;
        }
    }

    let mut dir = full.parent();
    while let Some(current) = dir {
        if current == workdir || fs::remove_dir(current).is_err() {
            break;
        }
        dir = current.parent();
    }
}

/// Write files into the working tree, stage them, then commit and push.
#[derive(Debug, Clone)]
pub struct AddFilesCommand {
    repository_path: PathBuf,
    files: BTreeMap<String, Vec<u8>>,
    options: WriteOptions,
}

impl AddFilesCommand {
    /// Create a command adding or overwriting `files` (path -> content).
    ///
    /// # Errors
    /// Returns [`ArgumentError`] if the repository path is empty, there are
    /// no files, or a path is blank, absolute, escapes the repository, or
    /// points into `.git`.
    pub fn new(
        repository_path: impl Into<PathBuf>,
        files: BTreeMap<String, Vec<u8>>,
    ) -> std::result::Result<Self, ArgumentError> {
        let repository_path = repository_path.into();
        require_repository_path(&repository_path)?;
        if files.is_empty() {
            return Err(ArgumentError::new("files", "at least one file is required"));
        }
        for path in files.keys() {
            validate_relative_path(path)?;
        }
        Ok(Self {
            repository_path,
            files,
            options: WriteOptions::default(),
        })
    }

    /// Use these commit and push options.
    #[must_use]
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }
}

impl GitCommand for AddFilesCommand {
    type Output = WriteOutcome;

    fn repository_path(&self) -> &Path {
        &self.repository_path
    }

    fn execute(self, repo: &Repository) -> Result<Self::Output> {
        let plan = WritePlan::resolve(repo, &self.options)?;

        let mut index = repo.inner().index()?;
        index.read(false)?;
        for (path, content) in &self.files {
            let full = repo.workdir_path(path)?;
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&full, content)?;
            index.add_path(Path::new(path))?;
        }
        index.write()?;
        tracing::debug!(count = self.files.len(), "staged files");

        let message = self.options.message().map_or_else(
            || match self.files.len() {
                1 => "Add 1 file".to_string(),
                n => format!("Add {n} files"),
            },
            String::from,
        );
        commit_and_push(repo, &mut index, &plan, self.options.empty_commits(), &message)
    }
}

/// Accept only paths the index stores verbatim: `/`-separated, relative,
/// with no empty, `.`, `..` or `.git` segment.
fn validate_relative_path(path: &str) -> std::result::Result<(), ArgumentError> {
    ArgumentError::require_non_blank("file path", path)?;

    if Path::new(path).has_root() || path.starts_with('/') {
        return Err(ArgumentError::new(
            "file path",
            format!("'{path}' must be relative to the repository root"),
        ));
    }
    for segment in path.split('/') {
        match segment {
            "" | "." | ".." => {
                return Err(ArgumentError::new(
                    "file path",
                    format!("'{path}' must be a normalized path inside the repository"),
                ));
            }
            name if name.eq_ignore_ascii_case(".git") => {
                return Err(ArgumentError::new(
                    "file path",
                    format!("'{path}' points into .git"),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commit::{Author, EmptyCommitPolicy, PushStatus};
    use crate::list::ListFilesCommand;
    use crate::read::ReadFileCommand;
    use crate::revision::{CommitId, FileQuery};
    use crate::test_support::TestRepo;
    use crate::Error;

    fn sample_repo() -> TestRepo {
        let test = TestRepo::with_remote();
        test.commit(
            &[("a.txt", "a"), ("b.txt", "b"), ("dir/c.txt", "c")],
            "initial",
        );
        test
    }

    fn list_all(test: &TestRepo) -> Vec<String> {
        ListFilesCommand::new(test.path(), FileQuery::new().recursive(true))
            .unwrap()
            .execute(&test.repo)
            .unwrap()
            .into_iter()
            .collect()
    }

    fn head(test: &TestRepo) -> git2::Oid {
        test.repo.inner().head().unwrap().target().unwrap()
    }

    #[test]
    fn delete_commits_and_pushes() {
        let test = sample_repo();
        let options = WriteOptions::new().with_message("remove a");

        let outcome = DeleteFilesCommand::new(test.path(), "a.txt")
            .unwrap()
            .with_options(options)
            .execute(&test.repo)
            .unwrap();

        assert_eq!(list_all(&test), vec!["b.txt", "dir/c.txt"]);
        assert!(!test.path().join("a.txt").exists());

        let commit = outcome.commit.clone().unwrap();
        assert_eq!(commit.as_str(), head(&test).to_string());
        let message = test.repo.inner().find_commit(head(&test)).unwrap();
        assert_eq!(message.message(), Some("remove a"));

        assert_eq!(outcome.pushes.len(), 1);
        assert!(outcome.all_pushed());
        assert_eq!(outcome.pushes[0].remote, "origin");

        let branch = test.repo.current_branch().unwrap();
        assert_eq!(test.remote_tip(&branch), Some(head(&test)));
    }

    #[test]
    fn delete_directory_cleans_worktree() {
        let test = sample_repo();

        DeleteFilesCommand::new(test.path(), "dir")
            .unwrap()
            .execute(&test.repo)
            .unwrap();

        assert_eq!(list_all(&test), vec!["a.txt", "b.txt"]);
        assert!(!test.path().join("dir").exists());
        let message = test.repo.inner().find_commit(head(&test)).unwrap();
        assert_eq!(message.message(), Some("Delete dir"));
    }

    #[test]
    fn empty_match_still_commits_by_default() {
        let test = sample_repo();
        let before = head(&test);

        let outcome = DeleteFilesCommand::new(test.path(), "*.md")
            .unwrap()
            .execute(&test.repo)
            .unwrap();

        let after = head(&test);
        assert_ne!(before, after);
        let commit = test.repo.inner().find_commit(after).unwrap();
        let parent = test.repo.inner().find_commit(before).unwrap();
        assert_eq!(commit.tree_id(), parent.tree_id());
        assert_eq!(outcome.pushes.len(), 1);
        assert!(outcome.all_pushed());
    }

    #[test]
    fn empty_match_can_be_skipped() {
        let test = sample_repo();
        let before = head(&test);

        let outcome = DeleteFilesCommand::new(test.path(), "*.md")
            .unwrap()
            .with_options(WriteOptions::new().with_empty_commits(EmptyCommitPolicy::Skip))
            .execute(&test.repo)
            .unwrap();

        assert_eq!(outcome.commit, None);
        assert!(outcome.pushes.is_empty());
        assert_eq!(head(&test), before);
    }

    #[test]
    fn missing_remote_fails_before_staging() {
        let test = TestRepo::new();
        test.commit(&[("a.txt", "a")], "initial");
        let before = head(&test);

        let err = DeleteFilesCommand::new(test.path(), "a.txt")
            .unwrap()
            .execute(&test.repo)
            .unwrap_err();

        assert!(matches!(err, Error::NoRemotes));
        assert_eq!(head(&test), before);
        assert!(test.path().join("a.txt").exists());
        let index = test.repo.inner().index().unwrap();
        assert!(index.get_path(Path::new("a.txt"), 0).is_some());
    }

    #[test]
    fn unknown_remote_rejected() {
        let test = sample_repo();
        let err = DeleteFilesCommand::new(test.path(), "a.txt")
            .unwrap()
            .with_options(WriteOptions::new().with_remotes(["upstream"]))
            .execute(&test.repo)
            .unwrap_err();
        assert!(matches!(err, Error::RemoteNotFound(r) if r == "upstream"));
    }

    #[test]
    fn detached_head_rejected() {
        let test = sample_repo();
        let oid = head(&test);
        test.repo.inner().set_head_detached(oid).unwrap();

        let err = DeleteFilesCommand::new(test.path(), "a.txt")
            .unwrap()
            .execute(&test.repo)
            .unwrap_err();
        assert!(matches!(err, Error::DetachedHead));
        assert!(test.path().join("a.txt").exists());
    }

    #[test]
    fn failed_push_keeps_local_commit() {
        let test = TestRepo::new();
        test.commit(&[("a.txt", "a"), ("b.txt", "b")], "initial");
        let missing = tempfile::TempDir::new().unwrap();
        let url = missing.path().join("gone.git");
        test.repo
            .inner()
            .remote("origin", &url.to_string_lossy())
            .unwrap();
        let before = head(&test);

        let outcome = DeleteFilesCommand::new(test.path(), "a.txt")
            .unwrap()
            .execute(&test.repo)
            .unwrap();

        assert_ne!(head(&test), before);
        assert!(outcome.commit.is_some());
        assert_eq!(outcome.pushes.len(), 1);
        assert_eq!(outcome.pushes[0].status, PushStatus::Failed);
        assert!(!outcome.all_pushed());
    }

    #[test]
    fn one_result_per_remote() {
        let test = sample_repo();
        let mirror = tempfile::TempDir::new().unwrap();
        git2::Repository::init_bare(mirror.path()).unwrap();
        test.repo
            .inner()
            .remote("mirror", &mirror.path().to_string_lossy())
            .unwrap();

        let outcome = DeleteFilesCommand::new(test.path(), "b.txt")
            .unwrap()
            .execute(&test.repo)
            .unwrap();

        let mut remotes: Vec<&str> = outcome.pushes.iter().map(|p| p.remote.as_str()).collect();
        remotes.sort_unstable();
        assert_eq!(remotes, vec!["mirror", "origin"]);
        assert!(outcome.all_pushed());
    }

    #[test]
    fn blank_pattern_rejected_before_repository_access() {
        let err = DeleteFilesCommand::new("/no/such/repository", "  ").unwrap_err();
        assert_eq!(err.field, "file pattern");
        assert!(!Path::new("/no/such/repository").exists());
    }

    #[test]
    fn add_files_writes_commits_and_pushes() {
        let test = sample_repo();
        let files = BTreeMap::from([
            ("notes/today.md".to_string(), b"# today".to_vec()),
            ("a.txt".to_string(), b"changed".to_vec()),
        ]);
        let author = Author::new("Ada", "ada@example.com").unwrap();

        let outcome = AddFilesCommand::new(test.path(), files)
            .unwrap()
            .with_options(WriteOptions::new().with_author(author))
            .execute(&test.repo)
            .unwrap();
        assert!(outcome.all_pushed());

        let commit = test.repo.inner().find_commit(head(&test)).unwrap();
        assert_eq!(commit.author().name(), Some("Ada"));
        assert_eq!(commit.message(), Some("Add 2 files"));

        let content = ReadFileCommand::new(test.path(), "a.txt")
            .unwrap()
            .execute(&test.repo)
            .unwrap();
        assert_eq!(content.into_string().unwrap(), "changed");
        assert!(list_all(&test).contains(&"notes/today.md".to_string()));
    }

    #[test]
    fn add_files_validates_paths() {
        let one = |path: &str| BTreeMap::from([(path.to_string(), Vec::new())]);

        assert!(AddFilesCommand::new("repo", BTreeMap::new()).is_err());
        assert!(AddFilesCommand::new("repo", one("")).is_err());
        assert!(AddFilesCommand::new("repo", one("../escape.txt")).is_err());
        assert!(AddFilesCommand::new("repo", one("/etc/passwd")).is_err());
        assert!(AddFilesCommand::new("repo", one(".git/config")).is_err());
        assert!(AddFilesCommand::new("repo", one("docs/.GIT/hooks")).is_err());
        assert!(AddFilesCommand::new("repo", one("docs/ok.txt")).is_ok());
        assert!(AddFilesCommand::new("repo", one(".gitignore")).is_ok());
    }

    #[test]
    fn add_files_rejects_unnormalized_paths_before_writing() {
        let test = sample_repo();
        let before = head(&test);

        for path in ["./new.txt", "docs/./new.txt", "docs//new.txt", "docs/"] {
            let files = BTreeMap::from([(path.to_string(), b"new".to_vec())]);
            let err = AddFilesCommand::new(test.path(), files).unwrap_err();
            assert_eq!(err.field, "file path", "{path}");
        }

        assert!(!test.path().join("new.txt").exists());
        assert!(!test.path().join("docs").exists());
        assert_eq!(head(&test), before);
    }

    #[test]
    fn diverged_push_is_rejected() {
        let test = sample_repo();
        let branch = test.repo.current_branch().unwrap();

        DeleteFilesCommand::new(test.path(), "a.txt")
            .unwrap()
            .execute(&test.repo)
            .unwrap();
        let pushed = head(&test);
        assert_eq!(test.remote_tip(&branch), Some(pushed));

        // Move the local branch back so the next commit diverges from the remote.
        let raw = test.repo.inner();
        let parent = raw.find_commit(pushed).unwrap().parent(0).unwrap();
        raw.reset(parent.as_object(), git2::ResetType::Hard, None)
            .unwrap();

        let outcome = DeleteFilesCommand::new(test.path(), "b.txt")
            .unwrap()
            .execute(&test.repo)
            .unwrap();

        assert_eq!(outcome.commit, Some(CommitId::from(head(&test))));
        assert_eq!(outcome.pushes.len(), 1);
        assert_eq!(outcome.pushes[0].status, PushStatus::Rejected);
        assert!(!outcome.all_pushed());
        assert_eq!(test.remote_tip(&branch), Some(pushed));
    }

    #[test]
    fn locked_index_fails_without_changes() {
        let test = sample_repo();
        let before = head(&test);
        std::fs::write(test.repo.git_dir().join("index.lock"), "").unwrap();

        let err = DeleteFilesCommand::new(test.path(), "a.txt")
            .unwrap()
            .execute(&test.repo)
            .unwrap_err();

        assert!(err.is_lock_contention(), "{err:?}");
        assert_eq!(head(&test), before);
        assert!(test.path().join("a.txt").exists());
        let branch = test.repo.current_branch().unwrap();
        assert_eq!(test.remote_tip(&branch), None);
    }
}
