//! gitstore CLI - files in a git repository, committed and pushed.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    output::set_quiet(cli.quiet);

    let repo = cli.repo.as_path();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Ls {
            filter,
            recursive,
            at,
            json,
        } => commands::ls::run(repo, config, filter.as_deref(), recursive, at.as_deref(), json),
        Commands::Cat { path, at } => commands::cat::run(repo, config, &path, at.as_deref()),
        Commands::Dump {
            filter,
            recursive,
            at,
            json,
        } => commands::dump::run(repo, config, filter.as_deref(), recursive, at.as_deref(), json),
        Commands::Rm {
            pattern,
            message,
            json,
        } => commands::rm::run(repo, config, &pattern, message.as_deref(), json),
        Commands::Add {
            files,
            message,
            json,
        } => commands::add::run(repo, config, &files, message.as_deref(), json),
        Commands::Log { path, limit, json } => {
            commands::log::run(repo, config, path.as_deref(), limit, json)
        }
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `-v` selects debug and the
/// default is warnings only.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
