//! Commit and push, the finalization shared by every write command.
//!
//! A write runs STAGE -> COMMIT -> PUSH. Everything that can be checked
//! up front (branch, remotes, committer identity) is resolved before
//! staging so that a misconfigured repository fails before history is
//! touched. Once the commit exists it is never rolled back: push outcomes
//! are reported per remote as values, not errors.

use git2::{ErrorClass, ErrorCode, Index, PushOptions, RemoteCallbacks, Signature};

use crate::error::{ArgumentError, Error, Result};
use crate::revision::CommitId;
use crate::Repository;

/// Identity recorded as author and committer of write commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    name: String,
    email: String,
}

impl Author {
    /// Create an author identity.
    ///
    /// # Errors
    /// Returns [`ArgumentError`] if the name or email is blank.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> std::result::Result<Self, ArgumentError> {
        let name = name.into();
        let email = email.into();
        ArgumentError::require_non_blank("author name", &name)?;
        ArgumentError::require_non_blank("author email", &email)?;
        Ok(Self { name, email })
    }

    /// Author name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Author email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// What a write does when staging leaves the tree unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyCommitPolicy {
    /// Commit anyway (same tree as the parent) and push.
    #[default]
    Commit,
    /// Return without committing or pushing.
    Skip,
}

/// Options shared by every write command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    message: Option<String>,
    author: Option<Author>,
    remotes: Vec<String>,
    empty_commits: EmptyCommitPolicy,
}

impl WriteOptions {
    /// Defaults: command-specific message, git config identity, every
    /// configured remote, commit even when nothing changed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit message. A blank message falls back to the command's default.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = if message.trim().is_empty() {
            None
        } else {
            Some(message)
        };
        self
    }

    /// Commit as `author` instead of the git config identity.
    #[must_use]
    pub fn with_author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    /// Push to these remotes only. Empty means every configured remote.
    #[must_use]
    pub fn with_remotes<I, S>(mut self, remotes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remotes = remotes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the empty commit policy.
    #[must_use]
    pub const fn with_empty_commits(mut self, policy: EmptyCommitPolicy) -> Self {
        self.empty_commits = policy;
        self
    }

    /// The explicit commit message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The explicit author, if any.
    #[must_use]
    pub const fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    /// Remotes to push to.
    #[must_use]
    pub fn remotes(&self) -> &[String] {
        &self.remotes
    }

    /// The empty commit policy.
    #[must_use]
    pub const fn empty_commits(&self) -> EmptyCommitPolicy {
        self.empty_commits
    }
}

/// How a push to one remote went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStatus {
    /// The remote accepted the update.
    Pushed,
    /// The remote refused the update.
    Rejected,
    /// The push could not be performed (unreachable remote, auth, ...).
    Failed,
}

/// Outcome of pushing one reference to one remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushResult {
    /// Remote name.
    pub remote: String,
    /// Reference that was pushed, e.g. `refs/heads/main`.
    pub reference: String,
    /// Whether it landed.
    pub status: PushStatus,
    /// Remote or transport message.
    pub message: String,
}

impl PushResult {
    /// Whether the remote now has the commit.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == PushStatus::Pushed
    }
}

/// Result of a write command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// The commit created, or `None` when an empty write was skipped.
    pub commit: Option<CommitId>,
    /// One entry per remote pushed to.
    pub pushes: Vec<PushResult>,
}

impl WriteOutcome {
    /// Whether every push succeeded.
    #[must_use]
    pub fn all_pushed(&self) -> bool {
        self.pushes.iter().all(PushResult::is_success)
    }
}

/// Everything a write needs that can be resolved before staging.
pub(crate) struct WritePlan {
    branch: String,
    remotes: Vec<String>,
    signature: Signature<'static>,
}

impl WritePlan {
    pub(crate) fn resolve(repo: &Repository, options: &WriteOptions) -> Result<Self> {
        let branch = repo.current_branch()?;

        let remotes = if options.remotes.is_empty() {
            repo.remote_names()?
        } else {
            for name in &options.remotes {
                repo.inner().find_remote(name).map_err(|e| match e.code() {
                    ErrorCode::NotFound | ErrorCode::InvalidSpec => {
                        Error::RemoteNotFound(name.clone())
                    }
                    _ => Error::from(e),
                })?;
            }
            options.remotes.clone()
        };
        if remotes.is_empty() {
            return Err(Error::NoRemotes);
        }

        let signature = match &options.author {
            Some(author) => Signature::now(&author.name, &author.email)?,
            None => repo.signature()?.to_owned(),
        };

        Ok(Self {
            branch,
            remotes,
            signature,
        })
    }
}

/// Commit the staged index on HEAD and push the branch to every remote in
/// the plan.
pub(crate) fn commit_and_push(
    repo: &Repository,
    index: &mut Index,
    plan: &WritePlan,
    policy: EmptyCommitPolicy,
    message: &str,
) -> Result<WriteOutcome> {
    let raw = repo.inner();
    let parent = repo.resolve_commit(None)?;
    let tree_id = index.write_tree()?;

    let unchanged = parent
        .as_ref()
        .map_or_else(|| index.is_empty(), |p| p.tree_id() == tree_id);
    if unchanged && policy == EmptyCommitPolicy::Skip {
        tracing::info!(branch = %plan.branch, "nothing staged, skipping commit");
        return Ok(WriteOutcome {
            commit: None,
            pushes: Vec::new(),
        });
    }

    let tree = raw.find_tree(tree_id)?;
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    let oid = raw.commit(
        Some("HEAD"),
        &plan.signature,
        &plan.signature,
        message,
        &tree,
        &parents,
    )?;
    tracing::info!(commit = %oid, branch = %plan.branch, empty = unchanged, "created commit");

    let reference = format!("refs/heads/{}", plan.branch);
    let pushes = plan
        .remotes
        .iter()
        .map(|remote| push(raw, remote, &reference))
        .collect();

    Ok(WriteOutcome {
        commit: Some(CommitId::from(oid)),
        pushes,
    })
}

fn push(repo: &git2::Repository, remote: &str, reference: &str) -> PushResult {
    let (status, message) = match push_reference(repo, remote, reference) {
        Ok(None) => (PushStatus::Pushed, "ok".to_string()),
        Ok(Some(rejection)) => {
            tracing::warn!(remote, reference, %rejection, "push rejected");
            (PushStatus::Rejected, rejection)
        }
        Err(e) if is_rejection(&e) => {
            tracing::warn!(remote, reference, rejection = %e.message(), "push rejected");
            (PushStatus::Rejected, e.message().to_string())
        }
        Err(e) => {
            tracing::warn!(remote, reference, error = %e, "push failed");
            (PushStatus::Failed, e.message().to_string())
        }
    };

    if status == PushStatus::Pushed {
        tracing::info!(remote, reference, "pushed");
    }

    PushResult {
        remote: remote.to_string(),
        reference: reference.to_string(),
        status,
        message,
    }
}

/// Whether a push error means the remote refused the update rather than
/// the push never reaching it.
///
/// Local and file transports refuse a non-fast-forward update with an
/// error instead of going through `push_update_reference`.
fn is_rejection(err: &git2::Error) -> bool {
    err.code() == ErrorCode::NotFastForward
        || (err.class() == ErrorClass::Reference && err.message().contains("fastforward"))
}

/// Push `reference` to the same name on `remote`, returning the remote's
/// rejection message if it refused the update.
fn push_reference(
    repo: &git2::Repository,
    remote: &str,
    reference: &str,
) -> std::result::Result<Option<String>, git2::Error> {
    let refspec = format!("{reference}:{reference}");
    let mut rejection = None;
    {
        let mut remote = repo.find_remote(remote)?;
        let mut callbacks = RemoteCallbacks::new();
        callbacks.push_update_reference(|_, status| {
            if let Some(message) = status {
                rejection = Some(message.to_string());
            }
            Ok(())
        });
        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);
        remote.push(&[refspec.as_str()], Some(&mut options))?;
    }
    Ok(rejection)
}
