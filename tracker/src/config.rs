//! Configuration module for the Lineage Tracker.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `LINEAGE_EXTENSIONS` | No | `asm,inc` | Comma-separated recognized source extensions |
//! | `LINEAGE_INCLUDE_BEGIN` | No | `; BEGIN INCLUDE` | Token marking the start of inlined content |
//! | `LINEAGE_INCLUDE_END` | No | `; END INCLUDE` | Token marking the end of inlined content |
//! | `LINEAGE_LOG_FORMAT` | No | `pretty` | Log output format: `pretty` or `json` |
//!
//! # Example
//!
//! ```no_run
//! use lineage_tracker::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Extensions: {:?}", config.extensions);
//! ```

use std::env;

use thiserror::Error;

use crate::error::Result as TrackerResult;
use crate::inclusion::{InclusionMarkers, DEFAULT_BEGIN_MARKER, DEFAULT_END_MARKER};
use crate::logging::{self, LogFormat};
use crate::source::{SourceOptions, DEFAULT_EXTENSIONS};

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Configuration for the Lineage Tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Recognized source file extensions, without the leading dot.
    pub extensions: Vec<String>,

    /// Marker tokens used by the inclusion stage.
    pub markers: InclusionMarkers,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            markers: InclusionMarkers::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - `LINEAGE_EXTENSIONS` is set but names no extension
    /// - `LINEAGE_INCLUDE_BEGIN` or `LINEAGE_INCLUDE_END` is set but empty
    /// - the begin and end tokens are identical
    /// - `LINEAGE_LOG_FORMAT` is neither `pretty` nor `json`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        // Optional: LINEAGE_EXTENSIONS (default: asm,inc)
        let extensions = match env::var("LINEAGE_EXTENSIONS") {
            Ok(val) => {
                let extensions: Vec<String> = val
                    .split(',')
                    .map(|s| s.trim().trim_start_matches('.').to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if extensions.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "LINEAGE_EXTENSIONS".to_string(),
                        message: "at least one extension is required".to_string(),
                    });
                }
                extensions
            }
            Err(_) => defaults.extensions,
        };

        let begin = marker_token("LINEAGE_INCLUDE_BEGIN", DEFAULT_BEGIN_MARKER)?;
        let end = marker_token("LINEAGE_INCLUDE_END", DEFAULT_END_MARKER)?;
        if begin == end {
            return Err(ConfigError::InvalidValue {
                key: "LINEAGE_INCLUDE_END".to_string(),
                message: "end marker must differ from begin marker".to_string(),
            });
        }

        // Optional: LINEAGE_LOG_FORMAT (default: pretty)
        let log_format = match env::var("LINEAGE_LOG_FORMAT") {
            Ok(val) => LogFormat::parse(&val).ok_or_else(|| ConfigError::InvalidValue {
                key: "LINEAGE_LOG_FORMAT".to_string(),
                message: format!("expected 'pretty' or 'json', got '{val}'"),
            })?,
            Err(_) => defaults.log_format,
        };

        Ok(Self {
            extensions,
            markers: InclusionMarkers::new(begin, end),
            log_format,
        })
    }

    /// Loader options derived from this configuration.
    #[must_use]
    pub fn source_options(&self) -> SourceOptions {
        SourceOptions {
            extensions: self.extensions.clone(),
        }
    }

    /// Installs the global tracing subscriber in the configured format.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::TrackerError::Logging`] if a global subscriber
    /// is already set.
    pub fn init_logging(&self) -> TrackerResult<()> {
        logging::init(self.log_format)
    }
}

/// Reads a marker token, rejecting empty values.
fn marker_token(key: &str, default: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(val) => {
            let token = val.trim();
            if token.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "marker token cannot be empty".to_string(),
                });
            }
            Ok(token.to_string())
        }
        Err(_) => Ok(default.to_string()),
    }
}
