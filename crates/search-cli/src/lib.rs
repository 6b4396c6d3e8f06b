//! Tiered search CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (query, compile, config)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, SearchArgs};
pub use commands::{
    format_results, init_tracing, load_settings, run, run_compile, run_config, run_query,
};
