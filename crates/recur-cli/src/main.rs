use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use recur_cli::commands::{check, infer, input};
use recur_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON output on stdout stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Infer {
            input: path,
            json,
            until,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let occurrences = input::read_occurrences(path)?;
            let mut stdout = io::stdout().lock();
            infer::run(&mut stdout, &occurrences, &config.inference, *json, *until)?;
            stdout.flush()?;
        }
        Some(Commands::Check { input: path }) => {
            let config = load_config(cli.config.as_deref())?;
            let occurrences = input::read_occurrences(path)?;
            let mut stdout = io::stdout().lock();
            check::run(&mut stdout, &occurrences, &config.inference)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
