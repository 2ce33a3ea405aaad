//! Repository handle shared by every command.

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Signature};

use crate::error::{Error, Result};
use crate::revision::CommitId;

/// Handle on one on-disk repository.
///
/// The handle is validated once when opened and can then be reused for any
/// number of command executions. It is `Send` but not `Sync`: threads that
/// work on the same repository concurrently open their own handles, and
/// libgit2's index and reference lock files arbitrate between writers.
pub struct Repository {
    inner: git2::Repository,
}

impl Repository {
    /// Open the repository at exactly `path`.
    ///
    /// Unlike `git` itself this does not search parent directories: the
    /// path has to be the working tree root or the git directory.
    ///
    /// # Errors
    /// Returns [`Error::NotARepository`] if there is no repository at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = git2::Repository::open(path).map_err(|e| match e.code() {
            ErrorCode::NotFound => Error::NotARepository(path.to_path_buf()),
            _ => Error::from(e),
        })?;
        tracing::debug!(path = %path.display(), "opened repository");
        Ok(Self { inner })
    }

    /// Get the path to the repository root (workdir).
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.inner.workdir()
    }

    /// Get the working tree root, failing for bare repositories.
    ///
    /// # Errors
    /// Returns [`Error::BareRepository`] if there is no working tree.
    pub fn require_workdir(&self) -> Result<&Path> {
        self.workdir().ok_or(Error::BareRepository)
    }

    /// Get the path to the .git directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    /// Get the name of the current branch.
    ///
    /// # Errors
    /// Returns error if HEAD is detached.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head().or_else(|e| match e.code() {
            // A fresh repository has HEAD pointing at a branch with no commits yet.
            ErrorCode::UnbornBranch => self.inner.find_reference("HEAD"),
            _ => Err(e),
        })?;

        if head.kind() == Some(git2::ReferenceType::Symbolic) {
            return head
                .symbolic_target()
                .and_then(|target| target.strip_prefix("refs/heads/"))
                .map(String::from)
                .ok_or(Error::DetachedHead);
        }

        if !head.is_branch() {
            return Err(Error::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(Error::DetachedHead)
    }

    /// Resolve a revision to a commit.
    ///
    /// `None` means HEAD. Returns `Ok(None)` when HEAD is unborn, i.e. the
    /// repository has no commits yet.
    ///
    /// # Errors
    /// Returns [`Error::RevisionNotFound`] if the revision does not name a commit.
    pub(crate) fn resolve_commit(&self, commit_id: Option<&CommitId>) -> Result<Option<git2::Commit<'_>>> {
        let Some(id) = commit_id else {
            return match self.inner.head() {
                Ok(head) => Ok(Some(head.peel_to_commit()?)),
                Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            };
        };

        let not_found = |e: git2::Error| match e.code() {
            ErrorCode::NotFound
            | ErrorCode::InvalidSpec
            | ErrorCode::Ambiguous
            | ErrorCode::Peel => Error::RevisionNotFound(id.to_string()),
            _ => Error::from(e),
        };

        let commit = self
            .inner
            .revparse_single(id.as_str())
            .and_then(|object| object.peel_to_commit())
            .map_err(not_found)?;

        tracing::debug!(revision = %id, commit = %commit.id(), "resolved revision");
        Ok(Some(commit))
    }

    /// Resolve a revision to the full id of the commit it names.
    ///
    /// `None` means HEAD; an unborn HEAD resolves to `None`.
    ///
    /// # Errors
    /// Returns [`Error::RevisionNotFound`] if the revision does not name a commit.
    pub fn resolve_revision(&self, commit_id: Option<&CommitId>) -> Result<Option<CommitId>> {
        Ok(self
            .resolve_commit(commit_id)?
            .map(|commit| CommitId::from(commit.id())))
    }

    /// Names of all remotes configured in the repository.
    ///
    /// # Errors
    /// Returns error if the repository config cannot be read.
    pub fn remote_names(&self) -> Result<Vec<String>> {
        let remotes = self.inner.remotes()?;
        Ok(remotes.iter().flatten().map(String::from).collect())
    }

    /// Get the default signature for commits.
    ///
    /// # Errors
    /// Returns error if git config doesn't have user.name/email.
    pub(crate) fn signature(&self) -> Result<Signature<'_>> {
        Ok(self.inner.signature()?)
    }

    /// Get a reference to the underlying git2 repository.
    ///
    /// Use sparingly - prefer high-level methods.
    #[must_use]
    pub(crate) fn inner(&self) -> &git2::Repository {
        &self.inner
    }

    /// Absolute path of a repository-relative file in the working tree.
    pub(crate) fn workdir_path(&self, relative: &str) -> Result<PathBuf> {
        Ok(self.require_workdir()?.join(relative))
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.git_dir())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::TestRepo;
    use tempfile::TempDir;

    #[test]
    fn open_rejects_plain_directory() {
        let temp = TempDir::new().unwrap();
        let err = Repository::open(temp.path()).unwrap_err();
        assert!(matches!(err, Error::NotARepository(p) if p == temp.path()));
    }

    #[test]
    fn open_does_not_discover_parent() {
        let test = TestRepo::new();
        let nested = test.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        assert!(Repository::open(&nested).is_err());
    }

    #[test]
    fn unborn_head_resolves_to_nothing() {
        let test = TestRepo::new();
        assert!(test.repo.resolve_commit(None).unwrap().is_none());
        assert!(!test.repo.current_branch().unwrap().is_empty());
    }

    #[test]
    fn resolve_commit_by_revspec() {
        let test = TestRepo::new();
        let first = test.commit(&[("a.txt", "one")], "first");
        test.commit(&[("a.txt", "two")], "second");

        let id = CommitId::new("HEAD~1").unwrap();
        let resolved = test.repo.resolve_commit(Some(&id)).unwrap().unwrap();
        assert_eq!(resolved.id(), first);

        let public = test.repo.resolve_revision(Some(&id)).unwrap();
        assert_eq!(public, Some(CommitId::from(first)));
        assert!(TestRepo::new().repo.resolve_revision(None).unwrap().is_none());
    }

    #[test]
    fn unknown_revision_is_reported() {
        let test = TestRepo::new();
        test.commit(&[("a.txt", "one")], "first");

        let id = CommitId::new("no-such-branch").unwrap();
        let err = test.repo.resolve_commit(Some(&id)).unwrap_err();
        assert!(matches!(err, Error::RevisionNotFound(r) if r == "no-such-branch"));
    }

    #[test]
    fn lists_remotes() {
        let test = TestRepo::with_remote();
        assert_eq!(test.repo.remote_names().unwrap(), vec!["origin".to_string()]);
    }
}
