mod check;
mod cli;
mod config;
mod document;
mod error;
mod excel;
mod translate;
mod utils;
mod workflow;

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use config::{Config, LoadedConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let explicit = cli.config.as_deref();
    match cli.command {
        Some(Commands::Translate(args)) => {
            workflow::print_banner();
            translate::run(&args, &load_config(explicit)?)?;
        }
        Some(Commands::Export(args)) => {
            excel::run_export(&args, &load_config(explicit)?)?;
        }
        Some(Commands::Import(args)) => {
            excel::run_import(&args, &load_config(explicit)?)?;
        }
        Some(Commands::Workflow(args)) => {
            workflow::print_banner();
            workflow::run(&args, &load_config(explicit)?)?;
        }
        Some(Commands::Check(args)) => {
            if !check::run(&args, &load_config(explicit)?)? {
                anyhow::bail!("Setup check failed");
            }
        }
        // Config commands read the file themselves so they can repair it.
        Some(Commands::Config(args)) => config::commands::run(args, explicit)?,
        Some(Commands::Interactive) | None => workflow::interactive(&load_config(explicit)?)?,
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let loaded = Config::load(explicit)?;
    tracing::debug!(
        "Using config {} (from file: {})",
        loaded.path.display(),
        loaded.from_file
    );
    Ok(loaded)
}
