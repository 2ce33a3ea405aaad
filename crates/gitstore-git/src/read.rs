//! Reading file contents at a revision.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

use git2::{ErrorCode, ObjectType, Tree};

use crate::error::{ArgumentError, Error, Result};
use crate::list::ListFilesCommand;
use crate::revision::{CommitId, FileQuery};
use crate::traits::{GitCommand, require_repository_path};
use crate::Repository;

/// Content of one file at one revision.
///
/// Behaves like a stream: reading consumes it and it cannot be cloned or
/// rewound.
pub struct FileContent {
    path: String,
    content: Cursor<Vec<u8>>,
}

impl FileContent {
    fn new(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content: Cursor::new(bytes),
        }
    }

    /// Path of the file relative to the repository root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Total size of the file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.get_ref().len()
    }

    /// Whether the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the bytes that have not been read yet.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        let consumed = usize::try_from(self.content.position()).unwrap_or(usize::MAX);
        let mut bytes = self.content.into_inner();
        bytes.drain(..consumed.min(bytes.len()));
        bytes
    }

    /// Take the unread content as UTF-8 text.
    ///
    /// # Errors
    /// Returns error if the content is not valid UTF-8.
    pub fn into_string(self) -> std::result::Result<String, FromUtf8Error> {
        String::from_utf8(self.into_bytes())
    }
}

impl Read for FileContent {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.content.read(buf)
    }
}

impl fmt::Debug for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileContent")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}

/// Read a single file at HEAD or at a pinned revision.
#[derive(Debug, Clone)]
pub struct ReadFileCommand {
    repository_path: PathBuf,
    path: String,
    commit_id: Option<CommitId>,
}

impl ReadFileCommand {
    /// Create a command reading `path` at HEAD.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] if the repository path is empty or the file
    /// path is blank.
    pub fn new(
        repository_path: impl Into<PathBuf>,
        path: impl Into<String>,
    ) -> std::result::Result<Self, ArgumentError> {
        let repository_path = repository_path.into();
        let path = path.into();
        require_repository_path(&repository_path)?;
        ArgumentError::require_non_blank("file path", &path)?;
        Ok(Self {
            repository_path,
            path,
            commit_id: None,
        })
    }

    /// Read the file as it was at `commit_id`.
    #[must_use]
    pub fn with_commit_id(mut self, commit_id: CommitId) -> Self {
        self.commit_id = Some(commit_id);
        self
    }

    /// The file this command reads.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl GitCommand for ReadFileCommand {
    type Output = FileContent;

    fn repository_path(&self) -> &Path {
        &self.repository_path
    }

    fn execute(self, repo: &Repository) -> Result<Self::Output> {
        let revision = self
            .commit_id
            .as_ref()
            .map_or_else(|| "HEAD".to_string(), ToString::to_string);

        let Some(commit) = repo.resolve_commit(self.commit_id.as_ref())? else {
            return Err(Error::FileNotFound {
                path: self.path,
                revision,
            });
        };

        let content = read_from_tree(repo, &commit.tree()?, &self.path, &revision)?;
        tracing::debug!(path = %self.path, %revision, len = content.len(), "read file");
        Ok(content)
    }
}

fn read_from_tree(repo: &Repository, tree: &Tree<'_>, path: &str, revision: &str) -> Result<FileContent> {
    let entry = tree.get_path(Path::new(path)).map_err(|e| match e.code() {
        ErrorCode::NotFound => Error::FileNotFound {
            path: path.to_string(),
            revision: revision.to_string(),
        },
        _ => Error::from(e),
    })?;

    if entry.kind() != Some(ObjectType::Blob) {
        return Err(Error::NotAFile(path.to_string()));
    }

    let blob = repo.inner().find_blob(entry.id())?;
    Ok(FileContent::new(path, blob.content().to_vec()))
}

/// Read every file a [`FileQuery`] selects.
///
/// The revision is resolved once and both the listing and every read are
/// pinned to it, so one execution sees one snapshot. Reading is
/// all-or-nothing: the first failing file aborts the whole batch.
#[derive(Debug, Clone)]
pub struct ReadFilesCommand {
    repository_path: PathBuf,
    query: FileQuery,
}

impl ReadFilesCommand {
    /// Create a batch read.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] if the repository path is empty.
    pub fn new(
        repository_path: impl Into<PathBuf>,
        query: FileQuery,
    ) -> std::result::Result<Self, ArgumentError> {
        let repository_path = repository_path.into();
        require_repository_path(&repository_path)?;
        Ok(Self {
            repository_path,
            query,
        })
    }
}

impl GitCommand for ReadFilesCommand {
    /// File contents keyed by path; the path is the deduplication key.
    type Output = BTreeMap<String, FileContent>;

    fn repository_path(&self) -> &Path {
        &self.repository_path
    }

    fn execute(self, repo: &Repository) -> Result<Self::Output> {
        let Some(commit) = repo.resolve_commit(self.query.commit_id())? else {
            return Ok(BTreeMap::new());
        };
        let pinned = CommitId::from(commit.id());

        let listing = ListFilesCommand {
            repository_path: self.repository_path.clone(),
            query: self.query.with_commit_id(pinned.clone()),
        };
        let paths = listing.execute(repo)?;

        let mut contents = BTreeMap::new();
        for path in paths {
            if contents.contains_key(&path) {
                continue;
            }
            let read = ReadFileCommand {
                repository_path: self.repository_path.clone(),
                path: path.clone(),
                commit_id: Some(pinned.clone()),
            };
            contents.insert(path, read.execute(repo)?);
        }

        tracing::debug!(commit = %pinned, count = contents.len(), "read files");
        Ok(contents)
    }
}
