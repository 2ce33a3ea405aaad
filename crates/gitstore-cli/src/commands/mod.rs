//! CLI definition and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

pub mod add;
pub mod cat;
pub mod completions;
pub mod dump;
pub mod log;
pub mod ls;
pub mod rm;
pub mod utils;

/// gitstore - read, delete and add files in a git repository.
///
/// Every change is committed on the current branch and pushed to the
/// configured remotes.
#[derive(Debug, Parser)]
#[command(name = "gitstore", version, about, long_about = None)]
pub struct Cli {
    /// Repository to operate on.
    #[arg(short = 'C', long = "repo", global = true, default_value = ".")]
    pub repo: PathBuf,

    /// Config file (defaults to .git/gitstore.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print essential output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List tracked files.
    Ls {
        /// Pathspec to filter by (e.g. `docs`, `*.md`).
        filter: Option<String>,

        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,

        /// Revision to list instead of HEAD.
        #[arg(long, value_name = "REV")]
        at: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print one file.
    Cat {
        /// Path relative to the repository root.
        path: String,

        /// Revision to read instead of HEAD.
        #[arg(long, value_name = "REV")]
        at: Option<String>,
    },

    /// Print every file a filter selects.
    Dump {
        /// Pathspec to filter by.
        filter: Option<String>,

        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,

        /// Revision to read instead of HEAD.
        #[arg(long, value_name = "REV")]
        at: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete files matching a pattern, commit and push.
    Rm {
        /// Pathspec of the files to delete.
        pattern: String,

        /// Commit message.
        #[arg(short, long)]
        message: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Commit and push files from the working tree.
    Add {
        /// Paths relative to the repository root.
        #[arg(required = true)]
        files: Vec<String>,

        /// Commit message.
        #[arg(short, long)]
        message: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show commit history.
    Log {
        /// Only show commits touching this path.
        path: Option<String>,

        /// Maximum number of commits.
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}
