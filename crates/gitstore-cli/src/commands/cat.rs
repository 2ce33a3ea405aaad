//! `gitstore cat` command - Print one file.

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Result;

use super::utils::{open_store, parse_revision};

/// Run the cat command.
pub fn run(repo: &Path, config: Option<&Path>, path: &str, at: Option<&str>) -> Result<()> {
    let store = open_store(repo, config)?;
    let mut content = store.read_file(path, parse_revision(at)?)?;

    let mut bytes = Vec::with_capacity(content.len());
    content.read_to_end(&mut bytes)?;
    io::stdout().write_all(&bytes)?;
    Ok(())
}
