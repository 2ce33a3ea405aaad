//! `gitstore dump` command - Print every file a filter selects.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use base64::Engine;
use colored::Colorize;
use serde::Serialize;

use super::utils::{file_query, open_store};
use crate::output;

/// JSON form of one file: plain text when it is UTF-8, base64 otherwise.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
enum ContentJson {
    Text(String),
    Binary { base64: String },
}

impl ContentJson {
    fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(e) => Self::Binary {
                base64: base64::engine::general_purpose::STANDARD.encode(e.into_bytes()),
            },
        }
    }
}

/// Run the dump command.
pub fn run(
    repo: &Path,
    config: Option<&Path>,
    filter: Option<&str>,
    recursive: bool,
    at: Option<&str>,
    json: bool,
) -> Result<()> {
    let store = open_store(repo, config)?;
    let contents = store.read_files(file_query(filter, recursive, at)?)?;

    if json {
        let files: BTreeMap<String, ContentJson> = contents
            .into_iter()
            .map(|(path, content)| (path, ContentJson::from_bytes(content.into_bytes())))
            .collect();
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    if contents.is_empty() {
        output::info("No matching files");
    }
    for (path, content) in contents {
        output::essential(&format!("==> {} <==", path.as_str().bold()));
        match String::from_utf8(content.into_bytes()) {
            Ok(text) => output::essential(text.trim_end_matches('\n')),
            Err(e) => output::detail(&format!("binary file, {} bytes", e.as_bytes().len())),
        }
    }
    Ok(())
}
