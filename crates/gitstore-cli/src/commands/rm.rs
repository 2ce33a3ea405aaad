//! `gitstore rm` command - Delete files, commit and push.

use std::path::Path;

use anyhow::Result;

use super::utils::{open_store, report_outcome};

/// Run the rm command.
pub fn run(
    repo: &Path,
    config: Option<&Path>,
    pattern: &str,
    message: Option<&str>,
    json: bool,
) -> Result<()> {
    let store = open_store(repo, config)?;
    let outcome = store.delete_files(pattern, message)?;
    report_outcome(&outcome, json)
}
