use std::path::Path;

use anyhow::{Context, Result, bail};
use gitstore_core::{Config, Store};
use gitstore_git::{CommitId, FileQuery, PushStatus, WriteOutcome};
use serde::Serialize;

use crate::output;

/// Open the store, with an explicit config file if one was given.
pub fn open_store(repo: &Path, config: Option<&Path>) -> Result<Store> {
    tracing::debug!(repo = %repo.display(), config = ?config, "opening store");
    let store = match config {
        Some(path) => {
            let config = Config::load(path)
                .with_context(|| format!("Cannot load config {}", path.display()))?;
            Store::open(repo, config)?
        }
        None => Store::open_default(repo)?,
    };
    Ok(store)
}

/// Parse a `--at` revision.
pub fn parse_revision(at: Option<&str>) -> Result<Option<CommitId>> {
    Ok(at.map(CommitId::new).transpose()?)
}

/// Build a file query from the shared `ls`/`dump` flags.
pub fn file_query(filter: Option<&str>, recursive: bool, at: Option<&str>) -> Result<FileQuery> {
    let mut query = FileQuery::new().recursive(recursive);
    if let Some(filter) = filter {
        query = query.with_filter(filter);
    }
    if let Some(commit_id) = parse_revision(at)? {
        query = query.with_commit_id(commit_id);
    }
    Ok(query)
}

#[derive(Serialize)]
struct OutcomeJson<'a> {
    commit: Option<&'a str>,
    pushes: Vec<PushJson<'a>>,
}

#[derive(Serialize)]
struct PushJson<'a> {
    remote: &'a str,
    reference: &'a str,
    status: &'static str,
    message: &'a str,
}

/// Print the result of a write and fail if any push did not land.
pub fn report_outcome(outcome: &WriteOutcome, json: bool) -> Result<()> {
    if json {
        let out = OutcomeJson {
            commit: outcome.commit.as_ref().map(CommitId::as_str),
            pushes: outcome
                .pushes
                .iter()
                .map(|p| PushJson {
                    remote: &p.remote,
                    reference: &p.reference,
                    status: match p.status {
                        PushStatus::Pushed => "pushed",
                        PushStatus::Rejected => "rejected",
                        PushStatus::Failed => "failed",
                    },
                    message: &p.message,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match &outcome.commit {
            Some(commit) => output::success(&format!("Committed {}", output::short_id(commit.as_str()))),
            None => output::info("Nothing changed, no commit created"),
        }
        for push in &outcome.pushes {
            output::detail(&output::push_line(push));
        }
    }

    let failed = outcome.pushes.iter().filter(|p| !p.is_success()).count();
    if failed > 0 {
        bail!("push failed for {failed} remote(s); the local commit was kept");
    }
    Ok(())
}
