//! CLI argument parsing for `tiered-search`.
//!
//! CLI flags override every other configuration source.

use clap::{Args, Parser, Subcommand};

/// Tiered search
///
/// Compiles free-text phrases into tiered full-text queries and runs them.
#[derive(Parser, Debug)]
#[command(name = "tiered-search")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/tiered-search/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Search commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a JSON corpus
    Query {
        /// JSON file holding an array of documents
        #[arg(long)]
        corpus: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Print the MySQL statement for a phrase
    Compile {
        #[command(flatten)]
        search: SearchArgs,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Phrase and scoping arguments shared by `query` and `compile`.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Phrase to search for
    pub phrase: String,

    /// Restrict to a stream (repeatable)
    #[arg(short, long = "stream")]
    pub streams: Vec<String>,

    /// Restrict to a locale (default from config)
    #[arg(long)]
    pub locale: Option<String>,

    /// Minimum score for the scored tiers (default from config)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Maximum results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}
