//! `gitstore log` command - Show commit history.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use gitstore_git::CommitInfo;
use serde::Serialize;

use super::utils::open_store;
use crate::output;

#[derive(Serialize)]
struct CommitJson<'a> {
    id: &'a str,
    author: &'a str,
    email: &'a str,
    date: DateTime<Utc>,
    message: &'a str,
    head: bool,
}

/// Run the log command.
pub fn run(
    repo: &Path,
    config: Option<&Path>,
    path: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let store = open_store(repo, config)?;
    let commits = store.log(path, limit)?;

    if json {
        print_json(&commits)?;
    } else if commits.is_empty() {
        output::warn("No commits yet");
    } else {
        print_commits(&commits);
    }
    Ok(())
}

/// Print commits in human-readable format.
fn print_commits(commits: &[CommitInfo]) {
    for commit in commits {
        let msg = format!(
            "{} {}  {:<25} {}",
            output::short_id(commit.id.as_str()),
            commit.date.format("%Y-%m-%d %H:%M"),
            commit.author_name,
            commit.summary()
        );
        output::essential(&msg);
    }
}

/// Print commits as JSON.
fn print_json(commits: &[CommitInfo]) -> Result<()> {
    let out: Vec<CommitJson<'_>> = commits
        .iter()
        .map(|c| CommitJson {
            id: c.id.as_str(),
            author: &c.author_name,
            email: &c.author_email,
            date: c.date,
            message: &c.message,
            head: c.is_head,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
