use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wl_cli::commands::{cancel, edit, list, log, report, status};
use wl_cli::{Cli, Commands, Config, error_line, exit_code};
use wl_core::Scheduler;
use wl_db::SharedDatabase;

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(SharedDatabase, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = SharedDatabase::open(&config.database_path).with_context(|| {
        format!("failed to open {}", config.database_path.display())
    })?;
    Ok((db, config))
}

fn run(cli: &Cli) -> Result<()> {
    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (db, config) = open_database(cli.config.as_deref())?;
    let scheduler = Scheduler::new(db);
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Log(args) => log::run(&mut stdout, &scheduler, args),
        Commands::Edit(args) => edit::run(&mut stdout, &scheduler, args),
        Commands::Cancel(args) => cancel::run(&mut stdout, &scheduler, args),
        Commands::List(args) => list::run(&mut stdout, &scheduler, args),
        Commands::Report(args) => report::run(&mut stdout, &scheduler, args),
        Commands::Status => status::run(&mut stdout, scheduler.repository(), &config.database_path),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so command output stays parseable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{}", error_line(&err));
            ExitCode::from(exit_code(&err))
        }
    }
}
