//! Error types for gitstore-git.

use std::fmt;
use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while executing a git command.
///
/// This is the only failure type a command's `execute` returns. Failures
/// from libgit2 are carried by [`Error::Native`] without exposing `git2`
/// types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path is not a git repository.
    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// The command needs a working tree but the repository is bare.
    #[error("repository has no working tree")]
    BareRepository,

    /// HEAD is detached (not on a branch), so there is nothing to push.
    #[error("HEAD is detached - checkout a branch first")]
    DetachedHead,

    /// The requested revision does not resolve to a commit.
    #[error("revision not found: {0}")]
    RevisionNotFound(String),

    /// The file does not exist at the requested revision.
    #[error("file not found: {path} (at {revision})")]
    FileNotFound {
        /// Path relative to the repository root.
        path: String,
        /// Revision the lookup was made against.
        revision: String,
    },

    /// The path exists but is not a regular file.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// Remote not found.
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// The repository has no remote to push to.
    #[error("repository has no configured remote")]
    NoRemotes,

    /// IO error in the working tree.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by libgit2.
    #[error("git error: {0}")]
    Native(#[from] NativeError),
}

impl Error {
    /// Whether the failure was caused by another writer holding a lock on
    /// the index or a reference.
    #[must_use]
    pub fn is_lock_contention(&self) -> bool {
        matches!(self, Self::Native(e) if e.kind() == NativeErrorKind::Locked)
    }

    /// Kind of the underlying libgit2 failure, if there is one.
    #[must_use]
    pub fn native_kind(&self) -> Option<NativeErrorKind> {
        match self {
            Self::Native(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Self::Native(NativeError(err))
    }
}

/// Broad classification of a libgit2 failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeErrorKind {
    /// An object, reference or path does not exist.
    NotFound,
    /// A lock file is held by another writer.
    Locked,
    /// The operation conflicts with existing state.
    Conflict,
    /// Authentication or certificate failure.
    Auth,
    /// Transport-level failure talking to a remote.
    Network,
    /// Anything else.
    Other,
}

/// Opaque wrapper around the original libgit2 error.
///
/// The original error stays reachable through [`std::error::Error::source`].
pub struct NativeError(git2::Error);

impl NativeError {
    /// Classify the failure.
    #[must_use]
    pub fn kind(&self) -> NativeErrorKind {
        use git2::{ErrorClass, ErrorCode};

        match self.0.code() {
            ErrorCode::NotFound | ErrorCode::UnbornBranch => NativeErrorKind::NotFound,
            ErrorCode::Locked => NativeErrorKind::Locked,
            ErrorCode::Conflict
            | ErrorCode::MergeConflict
            | ErrorCode::Modified
            | ErrorCode::NotFastForward => NativeErrorKind::Conflict,
            ErrorCode::Auth | ErrorCode::Certificate => NativeErrorKind::Auth,
            _ => match self.0.class() {
                ErrorClass::Net | ErrorClass::Ssh | ErrorClass::Http | ErrorClass::Ssl => {
                    NativeErrorKind::Network
                }
                _ => NativeErrorKind::Other,
            },
        }
    }

    /// The libgit2 message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.0.message()
    }
}

impl fmt::Debug for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeError")
            .field("kind", &self.kind())
            .field("message", &self.message())
            .finish()
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for NativeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// A required command parameter was missing or malformed.
///
/// Returned by command constructors before any repository access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ArgumentError {
    /// Name of the offending parameter.
    pub field: &'static str,
    /// Why it was rejected.
    pub reason: String,
}

impl ArgumentError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// Reject `value` if it is empty or whitespace only.
    pub(crate) fn require_non_blank(field: &'static str, value: &str) -> std::result::Result<(), Self> {
        if value.trim().is_empty() {
            Err(Self::new(field, "must not be blank"))
        } else {
            Ok(())
        }
    }
}
