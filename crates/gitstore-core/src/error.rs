//! Error types for gitstore-core.

use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitstore-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A command parameter was rejected before touching the repository.
    #[error(transparent)]
    InvalidArgument(#[from] gitstore_git::ArgumentError),

    /// Config file parsing error.
    #[error("failed to parse {file}: {message}")]
    ConfigParse { file: PathBuf, message: String },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Git operation error.
    #[error(transparent)]
    Git(#[from] gitstore_git::Error),
}
