//! Error types for the Lineage Tracker.
//!
//! Fallibility is confined to the construction boundary: loading a
//! [`Source`](crate::source::Source) and reading configuration. Once a
//! [`Tracker`](crate::tracker::Tracker) exists, snapshotting and tracing return
//! plain values. The only later fallible operation is the optional JSON export.

use thiserror::Error;

use crate::config::ConfigError;
use crate::source::SourceError;

/// Errors that can occur during tracker operations.
///
/// This is the umbrella error type for the crate. Individual constructors
/// return their narrower error ([`SourceError`], [`ConfigError`]), which
/// convert into this type with `?`.
///
/// # Examples
///
/// ```no_run
/// use lineage_tracker::config::Config;
/// use lineage_tracker::error::Result;
/// use lineage_tracker::tracker::Tracker;
///
/// fn load() -> Result<Tracker> {
///     let config = Config::from_env()?;
///     let tracker = Tracker::track_with_config("boot.asm", &config)?;
///     Ok(tracker)
/// }
/// ```
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The source file could not be loaded.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization error while exporting history.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The global tracing subscriber could not be installed.
    #[error("logging error: {0}")]
    Logging(String),
}

/// A specialized `Result` type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn source_error_conversion() {
        let source_err = SourceError::NotFound(PathBuf::from("missing.asm"));
        let err: TrackerError = source_err.into();
        assert!(matches!(err, TrackerError::Source(SourceError::NotFound(_))));
        assert_eq!(err.to_string(), "source error: file not found: missing.asm");
    }

    #[test]
    fn config_error_display() {
        let err = TrackerError::Config(ConfigError::InvalidValue {
            key: "LINEAGE_EXTENSIONS".to_string(),
            message: "at least one extension is required".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "configuration error: invalid value for LINEAGE_EXTENSIONS: at least one extension is required"
        );
    }

    #[test]
    fn json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: TrackerError = json_err.into();
        assert!(matches!(err, TrackerError::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn logging_error_display() {
        let err = TrackerError::Logging("subscriber already set".to_string());
        assert_eq!(err.to_string(), "logging error: subscriber already set");
    }

    #[test]
    fn error_source_chain() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad utf-8");
        let err: TrackerError = SourceError::ReadFailure {
            path: PathBuf::from("bad.asm"),
            source: io_err,
        }
        .into();

        // TrackerError -> SourceError -> io::Error
        let source = err.source().expect("source error should be chained");
        assert!(source.source().is_some());
    }

    #[test]
    fn result_type_alias_works() {
        fn ok_function() -> Result<usize> {
            Ok(3)
        }

        fn err_function() -> Result<usize> {
            Err(TrackerError::Logging("test".to_string()))
        }

        assert!(ok_function().is_ok());
        assert!(err_function().is_err());
    }
}
