//! `gitstore add` command - Commit and push files from the working tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::utils::{open_store, report_outcome};

/// Run the add command.
pub fn run(
    repo: &Path,
    config: Option<&Path>,
    files: &[String],
    message: Option<&str>,
    json: bool,
) -> Result<()> {
    let store = open_store(repo, config)?;
    let workdir = store
        .repository()
        .workdir()
        .context("Cannot add files in a bare repository")?;

    let mut contents = BTreeMap::new();
    for file in files {
        let bytes = fs::read(workdir.join(file))
            .with_context(|| format!("Cannot read {file}"))?;
        contents.insert(file.clone(), bytes);
    }

    let outcome = store.add_files(contents, message)?;
    report_outcome(&outcome, json)
}
