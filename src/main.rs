//! wallpipe - wallpaper catalog pipeline
//!
//! # Commands
//!
//! - `encode`: obfuscate a file into a v1 payload
//! - `decode`: recover plain text (or JSON with `--parse`) from a payload
//! - `sort`: filter and sort a catalog, offloading large inputs to the worker
//! - `config show|path`: inspect configuration

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use wallpipe::cli::{Cli, Commands, ConfigCommands};
use wallpipe::{Config, Dispatcher};

mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode { input } => commands::codec::handle_encode(&input),
        Commands::Decode { input, parse } => {
            let dispatcher = dispatcher()?;
            commands::codec::handle_decode(&dispatcher, &input, parse).await
        }
        Commands::Sort(args) => {
            let dispatcher = dispatcher()?;
            commands::sort::handle_sort(&dispatcher, &args).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Path => commands::config::handle_path(),
        },
    }
}

fn dispatcher() -> Result<Dispatcher> {
    let config = Config::load().context("Failed to load configuration")?;
    Ok(Dispatcher::from_config(&config))
}
