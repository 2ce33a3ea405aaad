//! The contract every git command implements.

use std::path::Path;

use crate::{Repository, Result};

/// A single git operation bound to one repository.
///
/// Commands are built by a validating constructor, executed once, and
/// discarded: `execute` takes the command by value. A command can run
/// against a [`Repository`] handle the caller already holds, or open its
/// own with [`GitCommand::run`].
pub trait GitCommand: Sized {
    /// What a successful execution produces.
    type Output;

    /// The repository this command is scoped to.
    fn repository_path(&self) -> &Path;

    /// Execute against an open handle.
    ///
    /// # Errors
    /// Every failure, including those raised by libgit2, is reported as
    /// [`crate::Error`].
    fn execute(self, repo: &Repository) -> Result<Self::Output>;

    /// Open the command's repository and execute against it.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotARepository`] if the path is not a
    /// repository, otherwise whatever [`GitCommand::execute`] returns.
    fn run(self) -> Result<Self::Output> {
        let repo = Repository::open(self.repository_path())?;
        self.execute(&repo)
    }
}

/// Check the repository path every command requires.
pub(crate) fn require_repository_path(
    path: &Path,
) -> std::result::Result<(), crate::ArgumentError> {
    if path.as_os_str().is_empty() {
        Err(crate::ArgumentError::new(
            "repository path",
            "must not be empty",
        ))
    } else {
        Ok(())
    }
}
