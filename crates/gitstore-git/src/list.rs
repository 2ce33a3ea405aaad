//! Listing tracked files at a revision.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use git2::{ObjectType, Pathspec, PathspecFlags, Tree, TreeWalkMode, TreeWalkResult};

use crate::error::{ArgumentError, Result};
use crate::revision::FileQuery;
use crate::traits::{GitCommand, require_repository_path};
use crate::Repository;

/// List the files tracked at a revision.
///
/// Paths are relative to the repository root and use `/` separators.
/// Without a commit id the listing reflects HEAD.
#[derive(Debug, Clone)]
pub struct ListFilesCommand {
    pub(crate) repository_path: PathBuf,
    pub(crate) query: FileQuery,
}

impl ListFilesCommand {
    /// Create a listing command.
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

    /// The query this command runs.
    #[must_use]
    pub const fn query(&self) -> &FileQuery {
        &self.query
    }
}

impl GitCommand for ListFilesCommand {
    type Output = BTreeSet<String>;

    fn repository_path(&self) -> &Path {
        &self.repository_path
    }

    fn execute(self, repo: &Repository) -> Result<Self::Output> {
        let Some(commit) = repo.resolve_commit(self.query.commit_id())? else {
            tracing::debug!("HEAD is unborn, nothing to list");
            return Ok(BTreeSet::new());
        };

        let files = list_tree(
            &commit.tree()?,
            self.query.filter(),
            self.query.is_recursive(),
        )?;
        tracing::debug!(commit = %commit.id(), count = files.len(), "listed files");
        Ok(files)
    }
}

/// Collect the blob paths in `tree` selected by `filter`.
fn list_tree(tree: &Tree<'_>, filter: Option<&str>, recursive: bool) -> Result<BTreeSet<String>> {
    let filter = filter
        .map(|f| f.trim_end_matches('/'))
        .filter(|f| !f.is_empty());
    let pathspec = filter.map(|f| Pathspec::new([f])).transpose()?;
    let base = base_path(tree, filter);

    let mut files = BTreeSet::new();
    tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
        if entry.kind() != Some(ObjectType::Blob) {
            return TreeWalkResult::Ok;
        }
        let Some(name) = entry.name() else {
            return TreeWalkResult::Ok;
        };

        let path = format!("{dir}{name}");
        let matches = pathspec
            .as_ref()
            .is_none_or(|spec| spec.matches_path(Path::new(&path), PathspecFlags::DEFAULT));
        if matches && (recursive || is_direct_child(&base, &path)) {
            files.insert(path);
        }
        TreeWalkResult::Ok
    })?;

    Ok(files)
}

/// The directory a filter is rooted at.
///
/// For `docs/*.md` that is `docs`; for a filter naming a directory it is
/// the directory itself; for a filter naming a file it is the file's parent.
fn base_path(tree: &Tree<'_>, filter: Option<&str>) -> String {
    let Some(filter) = filter else {
        return String::new();
    };

    let literal = match filter.find(['*', '?', '[']) {
        Some(wildcard) => &filter[..wildcard],
        None => {
            let names_dir = tree
                .get_path(Path::new(filter))
                .is_ok_and(|entry| entry.kind() == Some(ObjectType::Tree));
            if names_dir {
                return filter.to_string();
            }
            filter
        }
    };

    literal
        .rfind('/')
        .map_or_else(String::new, |slash| literal[..slash].to_string())
}

fn is_direct_child(base: &str, path: &str) -> bool {
    let rest = if base.is_empty() {
        Some(path)
    } else {
        path.strip_prefix(base).and_then(|r| r.strip_prefix('/'))
    };
    rest.is_some_and(|r| !r.contains('/'))
}
