//! Per-line change records.
//!
//! A [`LineChange`] describes what happened to a single line between two
//! consecutive snapshots. Each variant carries only the fields meaningful for
//! it: a removed line has no position in the new text, so
//! [`LineChange::Contracting`] has no `new_index`.
//!
//! # Variants
//!
//! - **Unchanged**: the line exists in both versions. `origin` is its index in
//!   the older version.
//! - **Expanding**: the line was inserted. `origin` is only the nearest
//!   surviving line in the older version, never a real ancestor.
//! - **Contracting**: the line was removed. `origin` is its index in the older
//!   version.
//!
//! # Example
//!
//! ```
//! use lineage_tracker::change::{ChangeKind, LineChange};
//!
//! let change = LineChange::expanding(2, 3, "ld a, 1");
//! assert_eq!(change.kind(), ChangeKind::Expanding);
//! assert_eq!(change.new_index(), Some(3));
//! assert!(change.included_from().is_none());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Discriminant of a [`LineChange`], useful for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Unchanged,
    Expanding,
    Contracting,
}

impl ChangeKind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Unchanged => "unchanged",
            ChangeKind::Expanding => "expanding",
            ChangeKind::Contracting => "contracting",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one line between two consecutive snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineChange {
    /// Present in both the older and the newer version.
    Unchanged {
        origin: usize,
        new_index: usize,
        content: String,
    },

    /// Inserted in the newer version.
    Expanding {
        /// Nearest surviving line in the older version.
        origin: usize,
        new_index: usize,
        content: String,
        /// File whose inlined content produced this line, when known.
        #[serde(skip_serializing_if = "Option::is_none")]
        included_from: Option<PathBuf>,
    },

    /// Removed from the older version.
    Contracting { origin: usize, content: String },
}

impl LineChange {
    /// Creates a record for a line present in both versions.
    #[must_use]
    pub fn unchanged(origin: usize, new_index: usize, content: impl Into<String>) -> Self {
        Self::Unchanged {
            origin,
            new_index,
            content: content.into(),
        }
    }

    /// Creates a record for an inserted line anchored at `origin`.
    #[must_use]
    pub fn expanding(origin: usize, new_index: usize, content: impl Into<String>) -> Self {
        Self::Expanding {
            origin,
            new_index,
            content: content.into(),
            included_from: None,
        }
    }

    /// Creates a record for a removed line.
    #[must_use]
    pub fn contracting(origin: usize, content: impl Into<String>) -> Self {
        Self::Contracting {
            origin,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Unchanged { .. } => ChangeKind::Unchanged,
            Self::Expanding { .. } => ChangeKind::Expanding,
            Self::Contracting { .. } => ChangeKind::Contracting,
        }
    }

    /// Index in the older version (an anchor only for expanding lines).
    #[must_use]
    pub fn origin(&self) -> usize {
        match self {
            Self::Unchanged { origin, .. }
            | Self::Expanding { origin, .. }
            | Self::Contracting { origin, .. } => *origin,
        }
    }

    /// Index in the newer version, `None` for removed lines.
    #[must_use]
    pub fn new_index(&self) -> Option<usize> {
        match self {
            Self::Unchanged { new_index, .. } | Self::Expanding { new_index, .. } => {
                Some(*new_index)
            }
            Self::Contracting { .. } => None,
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Unchanged { content, .. }
            | Self::Expanding { content, .. }
            | Self::Contracting { content, .. } => content,
        }
    }

    /// Included file this line was inlined from, if it has been annotated.
    #[must_use]
    pub fn included_from(&self) -> Option<&Path> {
        match self {
            Self::Expanding { included_from, .. } => included_from.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged { .. })
    }

    #[must_use]
    pub fn is_expanding(&self) -> bool {
        matches!(self, Self::Expanding { .. })
    }

    #[must_use]
    pub fn is_contracting(&self) -> bool {
        matches!(self, Self::Contracting { .. })
    }

    /// Records the included file an expanding line came from.
    ///
    /// Has no effect on other variants. Returns `true` if the annotation was
    /// applied.
    pub(crate) fn annotate_inclusion(&mut self, path: &Path) -> bool {
        match self {
            Self::Expanding { included_from, .. } => {
                *included_from = Some(path.to_path_buf());
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for LineChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged {
                origin,
                new_index,
                content,
            } => write!(f, "  {origin} -> {new_index}: {content}"),
            Self::Expanding {
                origin,
                new_index,
                content,
                included_from,
            } => {
                write!(f, "+ ~{origin} -> {new_index}: {content}")?;
                if let Some(path) = included_from {
                    write!(f, " (from {})", path.display())?;
                }
                Ok(())
            }
            Self::Contracting { origin, content } => write!(f, "- {origin}: {content}"),
        }
    }
}
