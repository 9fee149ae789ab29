//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::models::DEFAULT_RESULT_COUNT;

#[derive(Parser)]
#[command(name = "foodrag")]
#[command(about = "Food recommendations from a small dataset, explained by an LLM")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a TOML config file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset to index instead of the configured one
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Semantic search without generation
    Search {
        /// What you are in the mood for
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = DEFAULT_RESULT_COUNT)]
        limit: usize,
        /// Minimum similarity (0.0 - 1.0)
        #[arg(long, default_value_t = 0.0)]
        floor: f32,
        /// Only this cuisine (case-insensitive)
        #[arg(long)]
        cuisine: Option<String>,
        /// Only items at or under this many calories per serving
        #[arg(long)]
        max_calories: Option<u32>,
    },
    /// One recommendation with an explanation
    Ask {
        query: String,
    },
    /// Compare the best matches for two requests
    Compare {
        first: String,
        second: String,
    },
    /// Interactive recommendation chat
    Chat,
    /// Check the index and its collaborators are usable
    Health,
    /// Show the effective configuration
    Config,
}
