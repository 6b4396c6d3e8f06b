//! Integration tests for the tiered-search CLI.
//!
//! These tests drive the command layer end to end: config file loading,
//! CLI overrides, corpus loading and output formatting.

use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;

use search_cli::{load_settings, run_compile, run_config, run_query, Cli, Commands};
use search_types::Settings;

/// Test harness holding a config file and a corpus file.
struct TestHarness {
    config: NamedTempFile,
    corpus: NamedTempFile,
}

impl TestHarness {
    fn new(config_toml: &str) -> Self {
        let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        config.write_all(config_toml.as_bytes()).unwrap();

        let mut corpus = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        corpus
            .write_all(
                br#"[
                    {"id": "p1", "locale": "en", "stream": "pages", "title": "The Quick Brown Fox", "description": "A pangram"},
                    {"id": "p2", "locale": "en", "stream": "pages", "title": "Go tutorial", "searchable": "learn go"},
                    {"id": "n1", "locale": "en", "stream": "news", "title": "Fox spotted downtown"},
                    {"id": "d1", "locale": "de", "stream": "pages", "title": "Der schnelle Fuchs"}
                ]"#,
            )
            .unwrap();

        Self { config, corpus }
    }

    fn config_path(&self) -> String {
        self.config.path().to_string_lossy().to_string()
    }

    fn corpus_path(&self) -> String {
        self.corpus.path().to_string_lossy().to_string()
    }

    fn parse(&self, args: &[&str]) -> Cli {
        let mut argv = vec!["tiered-search".to_string(), "--config".to_string(), self.config_path()];
        argv.extend(args.iter().map(|s| s.to_string()));
        Cli::parse_from(argv)
    }
}

#[test]
fn test_config_file_drives_compile() {
    let harness = TestHarness::new(
        r#"
table = "entries"
match_mode = "natural_language"
default_locale = "fr"
"#,
    );
    let settings = load_settings(Some(&harness.config_path()), None).unwrap();

    let cli = harness.parse(&["compile", "quick fox"]);
    let Commands::Compile { search } = cli.command else {
        panic!("Expected Compile command");
    };

    let out = run_compile(&settings, &search).unwrap();
    assert!(out.contains("FROM `entries`"));
    assert!(!out.contains("BOOLEAN MODE"));
    assert!(out.contains("= \"fr\""));
}

#[test]
fn test_log_level_override() {
    let harness = TestHarness::new("log_level = \"warn\"\n");

    let settings = load_settings(Some(&harness.config_path()), None).unwrap();
    assert_eq!(settings.log_level, "warn");

    let settings = load_settings(Some(&harness.config_path()), Some("trace")).unwrap();
    assert_eq!(settings.log_level, "trace");
}

#[test]
fn test_invalid_config_is_rejected() {
    let harness = TestHarness::new("threshold = -2.0\n");
    let err = load_settings(Some(&harness.config_path()), None).unwrap_err();
    assert!(err.to_string().contains("Failed to load configuration"));
}

#[test]
fn test_query_stream_scope() {
    let harness = TestHarness::new("");
    let settings = load_settings(Some(&harness.config_path()), None).unwrap();

    let cli = harness.parse(&["query", "fox", "--corpus", &harness.corpus_path(), "--stream", "news"]);
    let Commands::Query {
        corpus,
        json,
        search,
    } = cli.command
    else {
        panic!("Expected Query command");
    };

    let out = run_query(&settings, &corpus, json, &search).unwrap();
    assert!(out.starts_with("  1. n1  "));
    assert!(!out.contains("p1"));
}

#[test]
fn test_query_threshold_from_config() {
    // Unreachable threshold leaves only substring matches
    let harness = TestHarness::new("threshold = 1000.0\n");
    let settings = load_settings(Some(&harness.config_path()), None).unwrap();

    let cli = harness.parse(&["query", "brown fox", "--corpus", &harness.corpus_path()]);
    let Commands::Query {
        corpus,
        json,
        search,
    } = cli.command
    else {
        panic!("Expected Query command");
    };

    let out = run_query(&settings, &corpus, json, &search).unwrap();
    assert_eq!(out.lines().count(), 1);
    assert!(out.starts_with("  1. p1  "));
}

#[test]
fn test_query_min_token_len_from_config() {
    let harness = TestHarness::new("min_token_len = 2\n");
    let settings = load_settings(Some(&harness.config_path()), None).unwrap();

    let cli = harness.parse(&["query", "go", "--corpus", &harness.corpus_path()]);
    let Commands::Query {
        corpus,
        json,
        search,
    } = cli.command
    else {
        panic!("Expected Query command");
    };

    let out = run_query(&settings, &corpus, json, &search).unwrap();
    // Two-letter words are indexed, so "go" scores on the primary tier
    assert!(out.starts_with("  1. p2  primary_score="));
    assert!(!out.contains("primary_score=0.00"));
}

#[test]
fn test_config_output_reflects_file() {
    let harness = TestHarness::new("threshold = 4.5\n[fields]\nprimary = [\"title\"]\n");
    let settings = load_settings(Some(&harness.config_path()), None).unwrap();

    let out = run_config(&settings).unwrap();
    assert!(out.contains("threshold = 4.5"));

    let printed: Settings = toml::from_str(&out).unwrap();
    assert_eq!(printed.fields.primary, vec!["title"]);
    assert_eq!(printed.fields.secondary, vec!["searchable"]);
    assert_eq!(printed, settings);
}
