//! Revision pins and file queries shared by the read commands.

use std::fmt;

use git2::Oid;

use crate::error::ArgumentError;

/// A revision a read command is pinned to.
///
/// Anything `git rev-parse` understands is accepted: full or abbreviated
/// hashes, branch and tag names, `HEAD~2` and friends. Whether it actually
/// resolves is only known when the command executes.
///
/// # Examples
///
/// ```
/// use gitstore_git::CommitId;
///
/// let id = CommitId::new("HEAD~1").unwrap();
/// assert_eq!(id.as_str(), "HEAD~1");
///
/// assert!(CommitId::new("").is_err());
/// assert!(CommitId::new("two words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    /// Create a new revision pin.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] if the id is blank or contains whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, ArgumentError> {
        let id = id.into();
        ArgumentError::require_non_blank("commit id", &id)?;
        if id.chars().any(char::is_whitespace) {
            return Err(ArgumentError::new(
                "commit id",
                "must not contain whitespace",
            ));
        }
        Ok(Self(id))
    }

    /// Get the revision as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Oid> for CommitId {
    fn from(oid: Oid) -> Self {
        Self(oid.to_string())
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which files a listing or batch read selects.
///
/// The default query lists the top level of HEAD.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileQuery {
    commit_id: Option<CommitId>,
    filter: Option<String>,
    recursive: bool,
}

impl FileQuery {
    /// Query the top level of HEAD.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the query to a revision instead of HEAD.
    #[must_use]
    pub fn with_commit_id(mut self, commit_id: CommitId) -> Self {
        self.commit_id = Some(commit_id);
        self
    }

    /// Only select paths matching a git pathspec. A blank filter selects
    /// everything.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = if filter.trim().is_empty() {
            None
        } else {
            Some(filter)
        };
        self
    }

    /// Descend into subdirectories below the filter's base path.
    #[must_use]
    pub const fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// The revision pin, if any.
    #[must_use]
    pub const fn commit_id(&self) -> Option<&CommitId> {
        self.commit_id.as_ref()
    }

    /// The path filter, if any.
    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Whether matching descends into subdirectories.
    #[must_use]
    pub const fn is_recursive(&self) -> bool {
        self.recursive
    }
}
