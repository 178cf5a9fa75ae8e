//! Tracker façade.
//!
//! [`Tracker`] is the entry point used by the preprocessor driver: it loads the
//! source file, records every intermediate text the preprocessing stages
//! produce, and answers provenance queries about the current text.
//!
//! # Example
//!
//! ```no_run
//! use lineage_tracker::tracker::Tracker;
//!
//! let mut tracker = Tracker::track("boot.asm")?;
//!
//! // Text produced by the inclusion stage
//! let expanded = "start:\n; BEGIN INCLUDE \"io.inc\"\nout 1\n; END INCLUDE \"io.inc\"\nhlt";
//! tracker.snapshot_with_inclusions(expanded, &["io.inc"]);
//!
//! match tracker.origin(4) {
//!     Some(line) => println!("line 4 comes from line {line} of boot.asm"),
//!     None => println!("line 4 was inserted by the preprocessor"),
//! }
//! # Ok::<(), lineage_tracker::source::SourceError>(())
//! ```

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::change::LineChange;
use crate::config::Config;
use crate::error::Result;
use crate::history::History;
use crate::inclusion::{annotate, InclusionMarkers};
use crate::instance::Instance;
use crate::snapshot::LinesSnapshot;
use crate::source::{Source, SourceError};

/// Provenance tracker for one source file.
#[derive(Debug, Clone)]
pub struct Tracker {
    instance: Instance,
    markers: InclusionMarkers,
}

/// Serialized form of a tracker's state.
#[derive(Serialize)]
struct Export<'a> {
    path: &'a Path,
    snapshots: &'a History,
}

impl Tracker {
    /// Loads `path` with the default configuration and starts tracking it.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the file cannot be loaded.
    pub fn track(path: impl AsRef<Path>) -> std::result::Result<Self, SourceError> {
        Self::track_with_config(path, &Config::default())
    }

    /// Loads `path` using the extensions and marker tokens from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the file cannot be loaded.
    pub fn track_with_config(
        path: impl AsRef<Path>,
        config: &Config,
    ) -> std::result::Result<Self, SourceError> {
        let source = Source::load_with(path, &config.source_options())?;
        debug!(
            path = %source.path().display(),
            lines = source.content().lines().count(),
            "Tracking source"
        );

        Ok(Self {
            instance: Instance::from_source(source),
            markers: config.markers.clone(),
        })
    }

    /// Records the next version of the text.
    pub fn snapshot(&mut self, text: impl Into<String>) -> &LinesSnapshot {
        self.instance.update(text)
    }

    /// Records the next version of the text and attributes inlined lines.
    ///
    /// Every inserted line that sits between the begin and end markers of
    /// one of `inclusions` is annotated with that file's path. Lines outside
    /// any marker pair stay unannotated, and text without recognizable markers
    /// is recorded exactly like [`Tracker::snapshot`].
    pub fn snapshot_with_inclusions<P>(
        &mut self,
        text: impl Into<String>,
        inclusions: &[P],
    ) -> &LinesSnapshot
    where
        P: AsRef<Path>,
    {
        let markers = &self.markers;
        self.instance.update_with(text, |snapshot| {
            let regions = markers.scan(snapshot.lines(), inclusions);
            let annotated = annotate(snapshot, &regions);
            debug!(regions = regions.len(), annotated, "Annotated included lines");
        })
    }

    /// Index in the original file that `line` of the current text descends
    /// from, or `None` if the line was inserted.
    #[must_use]
    pub fn origin(&self, line: usize) -> Option<usize> {
        self.instance.line_origin(line)
    }

    /// Chronological changes of `line` of the current text, oldest first.
    #[must_use]
    pub fn history(&self, line: usize) -> Vec<LineChange> {
        self.instance.line_history(line)
    }

    #[must_use]
    pub fn source(&self) -> &Source {
        self.instance.source()
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        self.instance.lines()
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        self.instance.source().path()
    }

    #[must_use]
    pub fn snapshot_count(&self) -> usize {
        self.instance.snapshot_count()
    }

    #[must_use]
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    #[must_use]
    pub fn markers(&self) -> &InclusionMarkers {
        &self.markers
    }

    /// Serializes the file path and every snapshot as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::TrackerError::Json`] if serialization fails,
    /// e.g. for a path that is not valid UTF-8.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.export())?)
    }

    /// Serializes the file path and every snapshot as indented JSON.
    ///
    /// # Errors
    ///
    /// See [`Tracker::to_json`].
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    fn export(&self) -> Export<'_> {
        Export {
            path: self.file_path(),
            snapshots: self.instance.history(),
        }
    }
}
