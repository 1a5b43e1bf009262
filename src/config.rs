//! Session configuration
//!
//! Loaded from a JSON file; every field has a default, so `{}` is a valid
//! configuration.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{QueryEngine, DEFAULT_ADULT_AGE, DEFAULT_SEARCH_FIELDS};
use crate::observability::{Event, Logger, Severity};
use crate::session::{ScrollTrigger, DEFAULT_SCROLL_THRESHOLD};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors. All are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        "PAGEFLOW_CONFIGURATION_ERROR"
    }
}

/// Configuration of a page-load session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Rows per page (default: 20)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Quiet period before a search edit triggers a fetch (default: 300)
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Fields matched by free-text search
    #[serde(default = "default_search_fields")]
    pub search_fields: Vec<String>,

    /// Distance from the bottom that triggers load-more (default: 150)
    #[serde(default = "default_scroll_threshold_px")]
    pub scroll_threshold_px: u32,

    /// Minimum age for the ADULTS filter (default: 18)
    #[serde(default = "default_adult_age")]
    pub adult_age: i32,

    /// Minimum log severity (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_page_size() -> usize {
    20
}
fn default_search_debounce_ms() -> u64 {
    300
}
fn default_search_fields() -> Vec<String> {
    DEFAULT_SEARCH_FIELDS.iter().map(|f| f.to_string()).collect()
}
fn default_scroll_threshold_px() -> u32 {
    DEFAULT_SCROLL_THRESHOLD
}
fn default_adult_age() -> i32 {
    DEFAULT_ADULT_AGE
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            search_fields: default_search_fields(),
            scroll_threshold_px: default_scroll_threshold_px(),
            adult_age: default_adult_age(),
            log_level: default_log_level(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_json(&content)?;

        Logger::event(
            Event::ConfigLoaded,
            &[
                ("path", &path.display().to_string()),
                ("page_size", &config.page_size.to_string()),
            ],
        );

        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: SessionConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be > 0".into()));
        }

        if self.search_fields.is_empty() {
            return Err(ConfigError::Invalid(
                "search_fields must name at least one field".into(),
            ));
        }

        if self.adult_age < 0 {
            return Err(ConfigError::Invalid("adult_age must be >= 0".into()));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed log level
    pub fn severity(&self) -> ConfigResult<Severity> {
        Severity::from_str(&self.log_level).map_err(ConfigError::Invalid)
    }

    /// Sets the process-wide log level
    pub fn apply_log_level(&self) -> ConfigResult<()> {
        Logger::set_min_severity(self.severity()?);
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Query engine honouring the configured search fields and age rule
    pub fn engine(&self) -> QueryEngine {
        let engine = QueryEngine::new().search_fields(self.search_fields.iter().cloned());
        let year = engine.reference_year();
        engine.age_rule(year, self.adult_age)
    }

    pub fn scroll_trigger(&self) -> ScrollTrigger {
        ScrollTrigger::new(self.scroll_threshold_px)
    }
}
