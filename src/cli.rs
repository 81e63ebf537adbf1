//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// wallpipe - decode, filter and sort wallpaper catalogs
#[derive(Debug, Parser)]
#[command(name = "wallpipe")]
#[command(version)]
#[command(about = "Decode, filter and sort wallpaper catalogs")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Encode plain text into a v1 payload
    Encode {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Decode a v1 payload back to plain text
    Decode {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Parse the decoded text as JSON and pretty-print it
        #[arg(long)]
        parse: bool,
    },
    /// Filter and sort a wallpaper catalog
    Sort(SortArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Args)]
pub struct SortArgs {
    /// Catalog file: JSON array, `{"wallpapers": [...]}`, or a v1 payload of either
    pub catalog: PathBuf,

    /// Sort method (newest, oldest, popular, weekly-hot, monthly-hot,
    /// downloads, views, largest, smallest, name-asc, name-desc)
    #[arg(short, long, default_value = "newest")]
    pub method: String,

    /// Case-insensitive text matched against filename, category, subcategory and tags
    #[arg(short, long)]
    pub query: Option<String>,

    /// Only this file format
    #[arg(long)]
    pub format: Option<String>,

    /// Only this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only this subcategory
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Popularity statistics: JSON object or `[filename, entry]` pairs
    #[arg(long)]
    pub popularity: Option<PathBuf>,

    /// Print at most this many records
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    Show,
    /// Print the config file location
    Path,
}
