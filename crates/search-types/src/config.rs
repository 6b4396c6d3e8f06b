//! Configuration loading for tiered search.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/tiered-search/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::document::FieldSet;
use crate::error::SearchError;

/// How full-text match expressions are evaluated by the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Boolean mode: `+word*` means required prefix match (default)
    #[default]
    Boolean,
    /// Natural-language mode: operators are ignored and words are ranked
    NaturalLanguage,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Boolean => "boolean",
            MatchMode::NaturalLanguage => "natural_language",
        }
    }

    /// Parse from string, returning None for unknown modes.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "boolean" => Some(MatchMode::Boolean),
            "natural_language" => Some(MatchMode::NaturalLanguage),
            _ => None,
        }
    }
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown match mode: {}", s))
    }
}

/// Main search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Minimum full-text score for the scored tiers
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Locale used when neither the call nor the locale provider sets one
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Table holding the searchable items
    #[serde(default = "default_table")]
    pub table: String,

    /// Full-text match mode for rendered SQL
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Primary and secondary search fields
    #[serde(default)]
    pub fields: FieldSet,

    /// Column holding the document locale
    #[serde(default = "default_locale_column")]
    pub locale_column: String,

    /// Column holding the document stream (collection)
    #[serde(default = "default_collection_column")]
    pub collection_column: String,

    /// Shortest word the in-process store indexes
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Reject thresholds that are negative, infinite or NaN.
pub fn check_threshold(threshold: f64) -> Result<(), SearchError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(SearchError::Config(format!(
            "threshold must be a non-negative number, got {}",
            threshold
        )));
    }
    Ok(())
}

fn default_threshold() -> f64 {
    3.0
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_table() -> String {
    "search_items".to_string()
}

fn default_locale_column() -> String {
    "locale".to_string()
}

fn default_collection_column() -> String {
    "stream".to_string()
}

fn default_min_token_len() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            default_locale: default_locale(),
            table: default_table(),
            match_mode: MatchMode::default(),
            fields: FieldSet::default(),
            locale_column: default_locale_column(),
            collection_column: default_collection_column(),
            min_token_len: default_min_token_len(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/tiered-search/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (TIERED_SEARCH_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, SearchError> {
        let config_dir = ProjectDirs::from("", "", "tiered-search")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("threshold", default_threshold())
            .map_err(|e| SearchError::Config(e.to_string()))?
            .set_default("default_locale", default_locale())
            .map_err(|e| SearchError::Config(e.to_string()))?
            .set_default("table", default_table())
            .map_err(|e| SearchError::Config(e.to_string()))?
            .set_default("match_mode", MatchMode::default().as_str())
            .map_err(|e| SearchError::Config(e.to_string()))?
            .set_default("locale_column", default_locale_column())
            .map_err(|e| SearchError::Config(e.to_string()))?
            .set_default("collection_column", default_collection_column())
            .map_err(|e| SearchError::Config(e.to_string()))?
            .set_default("min_token_len", default_min_token_len() as i64)
            .map_err(|e| SearchError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| SearchError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: TIERED_SEARCH_THRESHOLD, TIERED_SEARCH_MATCH_MODE, etc.
        builder = builder.add_source(
            Environment::with_prefix("TIERED_SEARCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), SearchError> {
        check_threshold(self.threshold)?;
        if self.fields.primary.is_empty() {
            return Err(SearchError::Config(
                "fields.primary must name at least one field".to_string(),
            ));
        }
        if self.fields.secondary.is_empty() {
            return Err(SearchError::Config(
                "fields.secondary must name at least one field".to_string(),
            ));
        }
        if self.table.trim().is_empty() {
            return Err(SearchError::Config("table must not be empty".to_string()));
        }
        if self.min_token_len == 0 {
            return Err(SearchError::Config("min_token_len must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_check_threshold() {
        assert!(check_threshold(0.0).is_ok());
        assert!(check_threshold(3.0).is_ok());
        for bad in [f64::NAN, f64::INFINITY, -0.5] {
            let err = check_threshold(bad).unwrap_err();
            assert!(matches!(err, SearchError::Config(_)), "accepted {}", bad);
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.threshold, 3.0);
        assert_eq!(settings.default_locale, "en");
        assert_eq!(settings.table, "search_items");
        assert_eq!(settings.match_mode, MatchMode::Boolean);
        assert_eq!(settings.fields, FieldSet::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
threshold = 5.5
default_locale = "de"
match_mode = "natural_language"

[fields]
primary = ["title"]
secondary = ["searchable", "tags"]
"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.threshold, 5.5);
        assert_eq!(settings.default_locale, "de");
        assert_eq!(settings.match_mode, MatchMode::NaturalLanguage);
        assert_eq!(settings.fields.primary, vec!["title"]);
        assert_eq!(settings.fields.secondary, vec!["searchable", "tags"]);
        // Untouched keys keep their defaults
        assert_eq!(settings.table, "search_items");
        assert_eq!(settings.min_token_len, 3);
    }

    #[test]
    fn test_load_missing_cli_file_fails() {
        let result = Settings::load(Some("/nonexistent/tiered-search-config.toml"));
        assert!(matches!(result, Err(SearchError::Config(_))));
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        settings.threshold = -1.0;
        assert!(settings.validate().is_err());

        settings.threshold = f64::NAN;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.fields.primary.clear();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.table = "  ".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.min_token_len = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_match_mode_conversion() {
        assert_eq!(MatchMode::Boolean.as_str(), "boolean");
        assert_eq!(
            MatchMode::parse("natural_language"),
            Some(MatchMode::NaturalLanguage)
        );
        assert_eq!(MatchMode::parse("fuzzy"), None);
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }

    #[test]
    fn test_settings_toml_roundtrip() {
        let settings = Settings::default();
        let text = toml::to_string(&settings).unwrap();
        assert!(text.contains("match_mode = \"boolean\""));
        let decoded: Settings = toml::from_str(&text).unwrap();
        assert_eq!(decoded.fields, settings.fields);
        assert_eq!(decoded.threshold, settings.threshold);
    }
}
