//! Command implementations for `tiered-search`.
//!
//! Handles:
//! - query: Load a JSON corpus and run a tiered search against it
//! - compile: Render the MySQL statement for a phrase
//! - config: Show the effective configuration

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use search_engine::{
    load_corpus, scoped_expression, FixedLocale, MemoryStore, StaticSchema, TieredSearcher,
};
use search_sql::MySqlRenderer;
use search_types::{CollectionScope, RankedResult, SearchOptions, Settings};

use crate::cli::{Cli, Commands, SearchArgs};

/// Load configuration and apply CLI overrides.
///
/// Precedence: defaults -> config file -> env -> CLI.
pub fn load_settings(config_path: Option<&str>, log_level: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    if let Some(log_level) = log_level {
        settings.log_level = log_level.to_string();
    }
    Ok(settings)
}

/// Initialize logging to stderr so command output stays clean on stdout.
pub fn init_tracing(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn search_options(args: &SearchArgs) -> SearchOptions {
    SearchOptions {
        locale: args.locale.clone(),
        threshold: args.threshold,
        limit: args.limit,
    }
}

/// Run a search over a corpus file and format the results.
pub fn run_query(settings: &Settings, corpus: &str, json: bool, args: &SearchArgs) -> Result<String> {
    let documents =
        load_corpus(corpus).with_context(|| format!("Failed to load corpus {}", corpus))?;
    let store = MemoryStore::new()
        .with_min_token_len(settings.min_token_len)
        .with_documents(documents)
        .context("Failed to index corpus")?;
    info!(corpus, documents = store.len(), "Loaded corpus");

    let searcher = TieredSearcher::new(
        Arc::new(store),
        Arc::new(StaticSchema::from_settings(settings)),
        Arc::new(FixedLocale::from_settings(settings)),
    )
    .with_settings(settings);

    let results = searcher
        .search(
            &args.phrase,
            &CollectionScope::streams(args.streams.clone()),
            &search_options(args),
        )
        .context("Search failed")?;

    if json {
        return serde_json::to_string_pretty(&results).context("Failed to serialize results");
    }
    Ok(format_results(&results))
}

/// One line per result: rank, document id and every score column.
pub fn format_results(results: &[RankedResult]) -> String {
    if results.is_empty() {
        return "No results".to_string();
    }

    let mut out = String::new();
    for (rank, result) in results.iter().enumerate() {
        let _ = write!(out, "{:>3}. {}", rank + 1, result.document_id);
        for score in &result.tier_scores {
            let _ = write!(out, "  {}={:.2}", score.column, score.score);
        }
        out.push('\n');
    }
    out
}

/// Render the MySQL statement for a phrase.
pub fn run_compile(settings: &Settings, args: &SearchArgs) -> Result<String> {
    let locale = args
        .locale
        .clone()
        .unwrap_or_else(|| settings.default_locale.clone());
    let threshold = args.threshold.unwrap_or(settings.threshold);

    let expr = scoped_expression(
        &StaticSchema::from_settings(settings),
        &args.phrase,
        &locale,
        &CollectionScope::streams(args.streams.clone()),
        threshold,
    )
    .context("Failed to compile phrase")?;

    let statement = MySqlRenderer::from_settings(settings).render(&expr, args.limit);
    debug!(params = statement.params.len(), "Compiled statement");

    let mut out = format!("{};\n", statement.sql);
    for (index, param) in statement.params.iter().enumerate() {
        let _ = writeln!(out, "-- ?{} = {}", index + 1, param);
    }
    Ok(out)
}

/// Show the effective configuration as TOML.
pub fn run_config(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings).context("Failed to serialize configuration")
}

/// Parse-independent entry point: load settings, set up logging, dispatch.
pub fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref())?;
    init_tracing(&settings)?;

    let output = match &cli.command {
        Commands::Query {
            corpus,
            json,
            search,
        } => run_query(&settings, corpus, *json, search)?,
        Commands::Compile { search } => run_compile(&settings, search)?,
        Commands::Config => run_config(&settings)?,
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
