//! Commit history, optionally restricted to one path.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use git2::{Commit, Oid, Sort, Tree};

use crate::error::{ArgumentError, Result};
use crate::revision::CommitId;
use crate::traits::{GitCommand, require_repository_path};
use crate::Repository;

/// One commit in a history listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit hash.
    pub id: CommitId,
    /// Author name.
    pub author_name: String,
    /// Author email.
    pub author_email: String,
    /// Author timestamp.
    pub date: DateTime<Utc>,
    /// Full commit message.
    pub message: String,
    /// Whether this is the commit HEAD points at.
    pub is_head: bool,
}

impl CommitInfo {
    fn from_commit(commit: &Commit<'_>, head: Option<Oid>) -> Self {
        let author = commit.author();
        Self {
            id: CommitId::from(commit.id()),
            author_name: author.name().unwrap_or_default().to_string(),
            author_email: author.email().unwrap_or_default().to_string(),
            date: DateTime::from_timestamp(author.when().seconds(), 0).unwrap_or_default(),
            message: commit.message().unwrap_or_default().trim_end().to_string(),
            is_head: head == Some(commit.id()),
        }
    }

    /// First line of the message.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// List commits newest first, starting at HEAD or a pinned revision.
#[derive(Debug, Clone)]
pub struct LogCommand {
    repository_path: PathBuf,
    path: Option<String>,
    commit_id: Option<CommitId>,
    limit: Option<usize>,
}

impl LogCommand {
    /// Create a history listing.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] if the repository path is empty.
    pub fn new(repository_path: impl Into<PathBuf>) -> std::result::Result<Self, ArgumentError> {
        let repository_path = repository_path.into();
        require_repository_path(&repository_path)?;
        Ok(Self {
            repository_path,
            path: None,
            commit_id: None,
            limit: None,
        })
    }

    /// Only include commits that change `path` (a file or directory).
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = path.trim_end_matches('/');
        self.path = (!path.trim().is_empty()).then(|| path.to_string());
        self
    }

    /// Start walking from `commit_id` instead of HEAD.
    #[must_use]
    pub fn with_commit_id(mut self, commit_id: CommitId) -> Self {
        self.commit_id = Some(commit_id);
        self
    }

    /// Return at most `limit` commits.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl GitCommand for LogCommand {
    type Output = Vec<CommitInfo>;

    fn repository_path(&self) -> &Path {
        &self.repository_path
    }

    fn execute(self, repo: &Repository) -> Result<Self::Output> {
        let Some(start) = repo.resolve_commit(self.commit_id.as_ref())? else {
            return Ok(Vec::new());
        };
        let head = repo.resolve_commit(None)?.map(|c| c.id());

        let raw = repo.inner();
        let mut revwalk = raw.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(start.id())?;

        let limit = self.limit.unwrap_or(usize::MAX);
        let mut commits = Vec::new();
        for oid in revwalk {
            if commits.len() >= limit {
                break;
            }
            let commit = raw.find_commit(oid?)?;
            if let Some(path) = &self.path {
                if !changes_path(&commit, path)? {
                    continue;
                }
            }
            commits.push(CommitInfo::from_commit(&commit, head));
        }

        tracing::debug!(start = %start.id(), count = commits.len(), "walked history");
        Ok(commits)
    }
}

/// Whether `commit` changes `path` relative to its first parent.
fn changes_path(commit: &Commit<'_>, path: &str) -> Result<bool> {
    let entry_at = |tree: &Tree<'_>| tree.get_path(Path::new(path)).ok().map(|e| e.id());

    let current = entry_at(&commit.tree()?);
    let previous = match commit.parent(0) {
        Ok(parent) => entry_at(&parent.tree()?),
        Err(_) => None,
    };
    Ok(current != previous)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::TestRepo;

    #[test]
    fn lists_newest_first() {
        let test = TestRepo::new();
        test.commit(&[("a.txt", "1")], "first");
        test.commit(&[("b.txt", "2")], "second\n\nbody");
        let third = test.commit(&[("a.txt", "3")], "third");

        let log = LogCommand::new(test.path())
            .unwrap()
            .execute(&test.repo)
            .unwrap();

        let summaries: Vec<&str> = log.iter().map(CommitInfo::summary).collect();
        assert_eq!(summaries, vec!["third", "second", "first"]);
        assert_eq!(log[0].id, CommitId::from(third));
        assert!(log[0].is_head);
        assert!(!log[1].is_head);
        assert_eq!(log[1].message, "second\n\nbody");
        assert_eq!(log[0].author_name, "Test User");
    }

    #[test]
    fn path_and_limit_filter() {
        let test = TestRepo::new();
        test.commit(&[("a.txt", "1")], "first");
        test.commit(&[("dir/b.txt", "2")], "second");
        test.commit(&[("a.txt", "3")], "third");

        let log = LogCommand::new(test.path())
            .unwrap()
            .with_path("a.txt")
            .execute(&test.repo)
            .unwrap();
        let summaries: Vec<&str> = log.iter().map(CommitInfo::summary).collect();
        assert_eq!(summaries, vec!["third", "first"]);

        let log = LogCommand::new(test.path())
            .unwrap()
            .with_path("dir/")
            .execute(&test.repo)
            .unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].summary(), "second");

        let log = LogCommand::new(test.path())
            .unwrap()
            .with_limit(2)
            .execute(&test.repo)
            .unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn empty_repository_has_no_history() {
        let test = TestRepo::new();
        let log = LogCommand::new(test.path())
            .unwrap()
            .execute(&test.repo)
            .unwrap();
        assert!(log.is_empty());
    }
}
