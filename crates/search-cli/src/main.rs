//! Tiered search CLI
//!
//! Compiles free-text phrases into tiered full-text queries.
//!
//! # Usage
//!
//! ```bash
//! tiered-search query "quick fox" --corpus corpus.json [--stream pages] [--locale en] [--json]
//! tiered-search compile "quick fox" [--stream pages] [--limit 20]
//! tiered-search config
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/tiered-search/config.toml)
//! 3. Environment variables (TIERED_SEARCH_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use search_cli::{run, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
