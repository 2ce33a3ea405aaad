//! `gitstore ls` command - List tracked files.

use std::path::Path;

use anyhow::Result;

use super::utils::{file_query, open_store};
use crate::output;

/// Run the ls command.
pub fn run(
    repo: &Path,
    config: Option<&Path>,
    filter: Option<&str>,
    recursive: bool,
    at: Option<&str>,
    json: bool,
) -> Result<()> {
    let store = open_store(repo, config)?;
    let files = store.list_files(file_query(filter, recursive, at)?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    if files.is_empty() {
        output::info("No matching files");
    }
    for file in &files {
        output::essential(file);
    }
    Ok(())
}
