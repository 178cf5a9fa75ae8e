//! Lineage Tracker - source-line provenance across preprocessor passes.
//!
//! This crate records how an assembly source file's text evolves while the
//! preprocessor includes files, expands macros and strips conditional blocks,
//! and maps any line of the final text back to the line of the original file
//! it descended from.
//!
//! # Overview
//!
//! The preprocessor driver loads a file through a [`Tracker`], hands it each
//! intermediate text version it produces, and asks provenance questions at any
//! point. Every version is stored as an immutable snapshot together with a
//! line diff against the previous one, computed from the longest common
//! subsequence of the two line sequences.
//!
//! Loading is the only fallible step. Once a [`Tracker`] exists, recording
//! snapshots and tracing lines cannot fail.
//!
//! # Modules
//!
//! - [`tracker`]: Façade used by the preprocessor driver
//! - [`instance`]: A tracked document, its history and line tracing
//! - [`history`]: Append-only snapshot arena
//! - [`snapshot`]: Immutable text snapshots and content hashes
//! - [`diff`]: LCS line diff and change classification
//! - [`change`]: Per-line change records
//! - [`inclusion`]: Inclusion marker scanning
//! - [`source`]: Validated source file loading
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Error types for tracker operations
//! - [`logging`]: Tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use lineage_tracker::Tracker;
//!
//! let mut tracker = Tracker::track("boot.asm")?;
//! tracker.snapshot("; expanded by the macro stage\nstart:\n    hlt");
//!
//! for change in tracker.history(1) {
//!     println!("{change}");
//! }
//! # Ok::<(), lineage_tracker::SourceError>(())
//! ```

pub mod change;
pub mod config;
pub mod diff;
pub mod error;
pub mod history;
pub mod inclusion;
pub mod instance;
pub mod logging;
pub mod snapshot;
pub mod source;
pub mod tracker;

pub use change::{ChangeKind, LineChange};
pub use config::{Config, ConfigError};
pub use diff::{diff_lines, DiffStats, LineDiff};
pub use error::{Result, TrackerError};
pub use history::History;
pub use inclusion::{InclusionMarkers, InclusionRegion};
pub use instance::Instance;
pub use logging::LogFormat;
pub use snapshot::{ContentHash, LinesSnapshot, SnapshotKind};
pub use source::{Source, SourceError, SourceOptions};
pub use tracker::Tracker;
