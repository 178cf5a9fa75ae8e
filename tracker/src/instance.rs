//! A tracked document and its transformation history.
//!
//! An [`Instance`] owns one document's [`Source`] and [`History`]. It is built
//! with its initial snapshot, so it is never in an uninitialized state, and
//! every operation after construction is infallible.
//!
//! # Tracing Lines
//!
//! [`Instance::line_origin`] follows a line of the current text backwards
//! through every snapshot to its index in the initial text.
//! [`Instance::line_history`] returns the per-snapshot record of that walk.
//! Both stop at the snapshot where the line was inserted: an inserted line has
//! no ancestor, whatever its anchor says.
//!
//! Line numbers are zero-based.

use tracing::trace;

use crate::change::LineChange;
use crate::history::History;
use crate::snapshot::LinesSnapshot;
use crate::source::Source;

/// One document being tracked through the preprocessor.
#[derive(Debug, Clone)]
pub struct Instance {
    source: Source,
    history: History,
}

impl Instance {
    /// Creates an instance whose initial snapshot is `value`.
    #[must_use]
    pub fn new(value: impl Into<String>, source: Source) -> Self {
        Self {
            history: History::new(value),
            source,
        }
    }

    /// Creates an instance whose initial snapshot is the source's content.
    #[must_use]
    pub fn from_source(source: Source) -> Self {
        let value = source.content().to_string();
        Self::new(value, source)
    }

    /// Records the next version of the text.
    ///
    /// Identical text is recorded as a no-change snapshot without diffing.
    pub fn update(&mut self, new_value: impl Into<String>) -> &LinesSnapshot {
        self.history.record(new_value)
    }

    /// Like [`Instance::update`], with a hook that adjusts the new snapshot
    /// before it is appended.
    pub(crate) fn update_with<F>(
        &mut self,
        new_value: impl Into<String>,
        finalize: F,
    ) -> &LinesSnapshot
    where
        F: FnOnce(&mut LinesSnapshot),
    {
        self.history.record_with(new_value, finalize)
    }

    /// Current text, exactly as last recorded.
    #[must_use]
    pub fn value(&self) -> &str {
        self.history.latest().text()
    }

    #[must_use]
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Lines of the current text.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        self.history.latest().lines()
    }

    #[must_use]
    pub fn snapshot_count(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn latest(&self) -> &LinesSnapshot {
        self.history.latest()
    }

    #[must_use]
    pub fn snapshot(&self, index: usize) -> Option<&LinesSnapshot> {
        self.history.get(index)
    }

    /// Index in the initial text that `line` of the current text descends from.
    ///
    /// Returns `None` if the line was inserted by some transformation, or if
    /// `line` is past the end of the current text.
    #[must_use]
    pub fn line_origin(&self, line: usize) -> Option<usize> {
        if line >= self.lines().len() {
            return None;
        }

        let mut current = line;
        for (index, snapshot) in self.history.iter().enumerate().skip(1).rev() {
            match snapshot.changes().and_then(|changes| changes.get(&current)) {
                // No-change snapshot: positions map 1:1.
                None => {}
                Some(LineChange::Unchanged { origin, .. }) => current = *origin,
                Some(LineChange::Expanding { .. } | LineChange::Contracting { .. }) => {
                    trace!(line, snapshot = index, "Line inserted, no origin");
                    return None;
                }
            }
        }

        trace!(line, origin = current, "Traced line origin");
        Some(current)
    }

    /// Chronological record of how `line` of the current text came to be.
    ///
    /// Holds one entry per snapshot after the initial one, oldest first, and
    /// starts at the snapshot where the line was inserted if there was one.
    /// Snapshots that did not change the text contribute a synthesized
    /// unchanged entry. Empty if `line` is past the end of the current text.
    #[must_use]
    pub fn line_history(&self, line: usize) -> Vec<LineChange> {
        let mut trail = Vec::new();
        if line >= self.lines().len() {
            return trail;
        }

        let mut current = line;
        for snapshot in self.history.iter().skip(1).rev() {
            let step = match snapshot.changes().and_then(|changes| changes.get(&current)) {
                Some(change) => change.clone(),
                None => LineChange::unchanged(
                    current,
                    current,
                    snapshot.lines().get(current).cloned().unwrap_or_default(),
                ),
            };

            let inserted = !step.is_unchanged();
            current = step.origin();
            trail.push(step);
            if inserted {
                break;
            }
        }

        trace!(line, steps = trail.len(), "Traced line history");
        trail.reverse();
        trail
    }
}
