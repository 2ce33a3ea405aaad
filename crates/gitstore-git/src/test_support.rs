//! Temporary repositories for unit tests.

use std::fs;
use std::path::Path;

use git2::Oid;
use tempfile::TempDir;

use crate::Repository;

pub struct TestRepo {
    dir: TempDir,
    remote: Option<TempDir>,
    pub repo: Repository,
}

impl TestRepo {
    /// Empty repository with a committer identity configured.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let raw = git2::Repository::init(dir.path()).unwrap();
        {
            let mut config = raw.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        drop(raw);

        let repo = Repository::open(dir.path()).unwrap();
        Self {
            dir,
            remote: None,
            repo,
        }
    }

    /// Empty repository with a bare repository registered as `origin`.
    pub fn with_remote() -> Self {
        let mut test = Self::new();
        let remote = TempDir::new().unwrap();
        git2::Repository::init_bare(remote.path()).unwrap();
        test.repo
            .inner()
            .remote("origin", &remote.path().to_string_lossy())
            .unwrap();
        test.remote = Some(remote);
        test
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write files into the working tree, stage them and commit on HEAD.
    pub fn commit(&self, files: &[(&str, &str)], message: &str) -> Oid {
        let raw = self.repo.inner();
        let mut index = raw.index().unwrap();
        for (path, content) in files {
            let full = self.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, content).unwrap();
            index.add_path(Path::new(path)).unwrap();
        }
        index.write().unwrap();

        let tree = raw.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = raw.signature().unwrap();
        let parent = raw.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        raw.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// Tip of `branch` in the bare remote, if it has been pushed.
    pub fn remote_tip(&self, branch: &str) -> Option<Oid> {
        let remote = self.remote.as_ref()?;
        let bare = git2::Repository::open_bare(remote.path()).unwrap();
        bare.refname_to_id(&format!("refs/heads/{branch}")).ok()
    }
}
