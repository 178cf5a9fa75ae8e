//! Immutable text snapshots.
//!
//! A [`LinesSnapshot`] records a document's text at one point of its
//! transformation sequence. Every snapshot except the initial one also carries
//! the [`LineDiff`] against its predecessor, unless the text did not change.
//!
//! The three constructors map one-to-one onto [`SnapshotKind`], so a snapshot
//! carries a diff exactly when its kind is [`SnapshotKind::Change`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::change::LineChange;
use crate::diff::{diff_lines, DiffStats, LineDiff};

/// How a snapshot relates to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    /// First snapshot of a history, taken from the loaded file.
    Initial,
    /// Text differs from the previous snapshot.
    Change,
    /// Text is identical to the previous snapshot.
    NoChange,
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SnapshotKind::Initial => "initial",
            SnapshotKind::Change => "change",
            SnapshotKind::NoChange => "no_change",
        })
    }
}

/// SHA-256 digest of a snapshot's text.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hashes `text`.
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self(Sha256::digest(text.as_bytes()).into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({self})")
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The text of a document at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinesSnapshot {
    kind: SnapshotKind,
    content_hash: ContentHash,
    text: String,
    lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diff: Option<LineDiff>,
}

impl LinesSnapshot {
    /// Builds the first snapshot of a history.
    #[must_use]
    pub fn initial(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: SnapshotKind::Initial,
            content_hash: ContentHash::of(&text),
            lines: split_lines(&text),
            text,
            diff: None,
        }
    }

    /// Builds the snapshot that follows `previous` with the given text.
    ///
    /// Identical text (by content hash) yields a [`SnapshotKind::NoChange`]
    /// snapshot without running the diff.
    #[must_use]
    pub fn following(previous: &LinesSnapshot, text: impl Into<String>) -> Self {
        let text = text.into();
        let content_hash = ContentHash::of(&text);
        let lines = split_lines(&text);

        if content_hash == previous.content_hash {
            return Self {
                kind: SnapshotKind::NoChange,
                content_hash,
                text,
                lines,
                diff: None,
            };
        }

        let diff = diff_lines(&previous.lines, &lines);
        Self {
            kind: SnapshotKind::Change,
            content_hash,
            text,
            lines,
            diff: Some(diff),
        }
    }

    #[must_use]
    pub fn kind(&self) -> SnapshotKind {
        self.kind
    }

    #[must_use]
    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    /// Full text, exactly as recorded.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Per-line entries keyed by index in this snapshot's text.
    ///
    /// `None` unless the kind is [`SnapshotKind::Change`].
    #[must_use]
    pub fn changes(&self) -> Option<&BTreeMap<usize, LineChange>> {
        self.diff.as_ref().map(LineDiff::changes)
    }

    /// Lines of the previous snapshot that did not survive into this one.
    #[must_use]
    pub fn removals(&self) -> &[LineChange] {
        match &self.diff {
            Some(diff) => diff.removals(),
            None => &[],
        }
    }

    #[must_use]
    pub fn diff(&self) -> Option<&LineDiff> {
        self.diff.as_ref()
    }

    /// Diff statistics; all zero unless lines changed.
    #[must_use]
    pub fn stats(&self) -> DiffStats {
        match &self.diff {
            Some(diff) => diff.stats(),
            None => DiffStats {
                lines_unchanged: self.lines.len(),
                ..DiffStats::default()
            },
        }
    }

    pub(crate) fn changes_mut(&mut self) -> Option<&mut BTreeMap<usize, LineChange>> {
        self.diff.as_mut().map(LineDiff::changes_mut)
    }
}

/// Splits text on `\n` or `\r\n`; a trailing line ending adds no empty line.
fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
