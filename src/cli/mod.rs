//! CLI interface using clap
//!
//! Provides the command-line interface for sidebyside

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};

/// sidebyside - compare two languages' solutions to the same task
#[derive(Parser, Debug)]
#[command(name = "sidebyside")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true, env = "SIDEBYSIDE_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, html)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show one task's code in two languages
    Extract(ExtractArgs),

    /// List tasks solved in both languages
    Overlap(OverlapArgs),

    /// List tasks solved in one language
    Tasks(TasksArgs),

    /// Inspect or empty the fragment cache
    Cache(CacheArgs),

    /// Show the effective configuration
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

/// Arguments for extract command
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Task page name, e.g. "100_doors"
    pub task: String,

    /// First language
    pub lang1: String,

    /// Second language
    pub lang2: String,
}

/// Arguments for overlap command
#[derive(Parser, Debug)]
pub struct OverlapArgs {
    /// First language
    pub lang1: String,

    /// Second language
    pub lang2: String,
}

/// Arguments for tasks command
#[derive(Parser, Debug)]
pub struct TasksArgs {
    /// Language whose index page to read
    pub language: String,
}

/// Arguments for cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache maintenance actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Count live and expired entries
    Stats,
    /// Remove every entry
    Clear,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
