//! Core runtime configuration.
//!
//! Configuration is resolved once at startup and handed to the core. Nothing in
//! this crate reads environment variables while serving a request; hosts pass
//! raw values (usually taken from their own environment) to
//! [`ClinicConfig::from_values`].

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default number of suggestion templates returned per section.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 50;

/// Default size of the "frequently prescribed" medicine list.
pub const DEFAULT_TOP_MEDICINES_LIMIT: usize = 10;

/// Default Jaro-Winkler similarity above which a new patient's name is
/// reported as a possible duplicate of an existing one.
pub const DEFAULT_LOOKALIKE_THRESHOLD: f64 = 0.92;

/// Special database value selecting an in-memory store.
pub const IN_MEMORY: &str = ":memory:";

/// Configuration errors.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid configuration value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where the SQLite store lives.
#[derive(Clone, Debug, PartialEq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct ClinicConfig {
    database: DatabaseLocation,
    suggestion_limit: usize,
    top_medicines_limit: usize,
    lookalike_threshold: f64,
}

impl ClinicConfig {
    /// Create a configuration backed by a database file, with default limits.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseLocation::File(database_path.into()),
            ..Self::in_memory()
        }
    }

    /// Create a configuration backed by an in-memory database.
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseLocation::InMemory,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            top_medicines_limit: DEFAULT_TOP_MEDICINES_LIMIT,
            lookalike_threshold: DEFAULT_LOOKALIKE_THRESHOLD,
        }
    }

    /// Build a configuration from optional raw string values.
    ///
    /// Missing or blank values fall back to defaults; a missing database
    /// path, or `":memory:"`, selects an in-memory store.
    pub fn from_values(
        database: Option<String>,
        suggestion_limit: Option<String>,
        top_medicines_limit: Option<String>,
        lookalike_threshold: Option<String>,
    ) -> ConfigResult<Self> {
        let mut config = match non_blank(database) {
            None => Self::in_memory(),
            Some(value) if value == IN_MEMORY => Self::in_memory(),
            Some(value) => Self::new(value),
        };

        if let Some(value) = non_blank(suggestion_limit) {
            config.suggestion_limit = parse_limit("suggestion_limit", &value)?;
        }
        if let Some(value) = non_blank(top_medicines_limit) {
            config.top_medicines_limit = parse_limit("top_medicines_limit", &value)?;
        }
        if let Some(value) = non_blank(lookalike_threshold) {
            let threshold = value
                .parse::<f64>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "lookalike_threshold",
                    reason: e.to_string(),
                })?;
            config = config.with_lookalike_threshold(threshold)?;
        }

        Ok(config)
    }

    /// Override the look-alike threshold; must lie in `(0, 1]`.
    pub fn with_lookalike_threshold(mut self, threshold: f64) -> ConfigResult<Self> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "lookalike_threshold",
                reason: format!("{threshold} is outside (0, 1]"),
            });
        }
        self.lookalike_threshold = threshold;
        Ok(self)
    }

    pub fn database(&self) -> &DatabaseLocation {
        &self.database
    }

    /// Path of the database file, if file-backed.
    pub fn database_path(&self) -> Option<&Path> {
        match &self.database {
            DatabaseLocation::File(path) => Some(path),
            DatabaseLocation::InMemory => None,
        }
    }

    pub fn suggestion_limit(&self) -> usize {
        self.suggestion_limit
    }

    pub fn top_medicines_limit(&self) -> usize {
        self.top_medicines_limit
    }

    pub fn lookalike_threshold(&self) -> f64 {
        self.lookalike_threshold
    }
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_limit(key: &'static str, value: &str) -> ConfigResult<usize> {
    match value.parse::<usize>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            key,
            reason: "must be at least 1".into(),
        }),
        Ok(limit) => Ok(limit),
        Err(e) => Err(ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
        }),
    }
}
