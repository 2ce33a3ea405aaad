//! # gitstore-git
//!
//! Command-based access to a local git repository, built on git2-rs.
//!
//! Each operation is a small command value: built by a validating
//! constructor, executed once against a [`Repository`] handle, and
//! discarded. Read commands ([`ListFilesCommand`], [`ReadFileCommand`],
//! [`ReadFilesCommand`], [`LogCommand`]) can be pinned to a historical
//! revision and never touch the working tree or index. Write commands
//! ([`DeleteFilesCommand`], [`AddFilesCommand`]) stage, commit on the
//! current branch and push to the configured remotes.
//!
//! # Concurrency
//!
//! Nothing here takes a lock. Concurrent writers on the same repository
//! are arbitrated by git's own `index.lock` and reference locks; the loser
//! gets an [`Error`] for which [`Error::is_lock_contention`] is true.
//! Reads pinned to a commit id only touch immutable objects and are safe
//! alongside writes. Unpinned reads follow HEAD and may observe a write
//! that lands mid-way.

mod commit;
mod error;
mod list;
mod log;
mod read;
mod repository;
mod revision;
mod traits;
mod write;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_support;

pub use commit::{Author, EmptyCommitPolicy, PushResult, PushStatus, WriteOptions, WriteOutcome};
pub use error::{ArgumentError, Error, NativeError, NativeErrorKind, Result};
pub use list::ListFilesCommand;
pub use log::{CommitInfo, LogCommand};
pub use read::{FileContent, ReadFileCommand, ReadFilesCommand};
pub use repository::Repository;
pub use revision::{CommitId, FileQuery};
pub use traits::GitCommand;
pub use write::{AddFilesCommand, DeleteFilesCommand};
