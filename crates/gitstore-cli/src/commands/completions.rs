//! `gitstore completions` command - Print a shell completion script.

use std::io::{self, Write};

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};

use super::Cli;

/// Run the completions command.
pub fn run(shell: Shell) -> Result<()> {
    write_script(shell, &mut io::stdout().lock())
}

fn write_script(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin, out);
    out.flush()?;
    Ok(())
}
