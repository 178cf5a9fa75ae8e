//! Append-only snapshot history.
//!
//! [`History`] is an index-addressed arena of [`LinesSnapshot`]s. It is created
//! with its initial snapshot and only ever grows by appending; snapshots are
//! never edited or removed once appended. Index `0` is always the
//! [`SnapshotKind::Initial`] snapshot and no other index carries that kind.

use std::slice;

use serde::Serialize;
use tracing::debug;

use crate::snapshot::{LinesSnapshot, SnapshotKind};

/// Ordered snapshots of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct History {
    items: Vec<LinesSnapshot>,
}

impl History {
    /// Starts a history from the document's initial text.
    #[must_use]
    pub fn new(initial_text: impl Into<String>) -> Self {
        Self {
            items: vec![LinesSnapshot::initial(initial_text)],
        }
    }

    /// Appends the snapshot for `text` and returns it.
    pub fn record(&mut self, text: impl Into<String>) -> &LinesSnapshot {
        self.record_with(text, |_| {})
    }

    /// Appends the snapshot for `text`, letting `finalize` adjust it first.
    ///
    /// `finalize` runs before the snapshot becomes part of the history.
    pub(crate) fn record_with<F>(&mut self, text: impl Into<String>, finalize: F) -> &LinesSnapshot
    where
        F: FnOnce(&mut LinesSnapshot),
    {
        let mut snapshot = LinesSnapshot::following(self.latest(), text);
        finalize(&mut snapshot);

        let stats = snapshot.stats();
        debug!(
            index = self.items.len(),
            kind = %snapshot.kind(),
            lines = snapshot.lines().len(),
            added = stats.lines_added,
            removed = stats.lines_removed,
            "Recorded snapshot"
        );

        self.items.push(snapshot);
        self.latest()
    }

    /// Number of snapshots, including the initial one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`: a history holds its initial snapshot from creation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn initial(&self) -> &LinesSnapshot {
        &self.items[0]
    }

    #[must_use]
    pub fn latest(&self) -> &LinesSnapshot {
        // Never empty, see `History::new`.
        &self.items[self.items.len() - 1]
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LinesSnapshot> {
        self.items.get(index)
    }

    /// Snapshots oldest first.
    pub fn iter(&self) -> slice::Iter<'_, LinesSnapshot> {
        self.items.iter()
    }

    /// Number of snapshots whose text actually changed.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.items
            .iter()
            .filter(|s| s.kind() == SnapshotKind::Change)
            .count()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a LinesSnapshot;
    type IntoIter = slice::Iter<'a, LinesSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
