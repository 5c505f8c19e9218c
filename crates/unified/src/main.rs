mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::fs::OpenOptions;
use std::path::Path;

use clap::{CommandFactory, Parser};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use unified_store::DocumentStore;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let guard = match init_tracing(cli.global.verbose, cli.global.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(code);
        }
    };

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        // Flush the log file before exit skips destructors.
        drop(guard);
        std::process::exit(code);
    }
}

/// Human-readable logs on stderr, plus JSON lines in `log_file` when given.
///
/// The returned guard must live until exit so buffered file writes land.
fn init_tracing(verbosity: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>, CliError> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(guard)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::Completions(ref args) = cli.command {
        clap_complete::generate(args.shell, &mut Cli::command(), "unified", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load()?;
    let render = config::render(&cli.global, &cfg);

    match cli.command {
        // Neither needs a controller connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global, render),
        Command::Db(args) => {
            let store = DocumentStore::open(config::store_dir(&cli.global, &cfg))?;
            commands::db::handle(&store, args, render, cli.global.yes)
        }

        cmd => commands::run_connected(cmd, &cli.global, &cfg, render).await,
    }
}
