//! Line-level diff between two text versions.
//!
//! The diff is built on the longest common subsequence (LCS) of the two line
//! sequences, computed with the classic `O(m×n)` dynamic programme. Every line
//! of both inputs is then classified exactly once:
//!
//! - a line of the old text that is not part of the subsequence is
//!   **contracting** and goes to [`LineDiff::removals`];
//! - a line of the new text that is not part of the subsequence is
//!   **expanding** and goes to [`LineDiff::changes`];
//! - a line on the subsequence is **unchanged** and goes to
//!   [`LineDiff::changes`].
//!
//! `changes` is keyed by the line's index in the new text, so it holds exactly
//! one entry per new line.
//!
//! # Tie-breaking
//!
//! When backtracking through the table and both neighbours carry the same
//! length, the walk moves towards the previous old line. The choice is
//! deterministic for a given input pair; it does not try to produce the most
//! readable diff.
//!
//! # Example
//!
//! ```
//! use lineage_tracker::diff::diff_lines;
//!
//! let diff = diff_lines(&["ld a, 0", "ret"], &["ld a, 0", "inc a", "ret"]);
//! let stats = diff.stats();
//! assert_eq!(stats.lines_added, 1);
//! assert_eq!(stats.lines_removed, 0);
//! assert!(diff.changes()[&1].is_expanding());
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::change::LineChange;

/// Result of diffing two line sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineDiff {
    changes: BTreeMap<usize, LineChange>,
    removals: Vec<LineChange>,
}

/// Aggregate line counts for a [`LineDiff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DiffStats {
    /// Lines present in the new text but not the old one.
    pub lines_added: usize,

    /// Lines present in the old text but not the new one.
    pub lines_removed: usize,

    /// Lines carried over unchanged.
    pub lines_unchanged: usize,
}

impl DiffStats {
    /// Returns the total number of changed lines (added + removed).
    #[must_use]
    pub fn total_changes(&self) -> usize {
        self.lines_added + self.lines_removed
    }

    /// Returns true if there are no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }
}

impl LineDiff {
    /// Unchanged and expanding entries keyed by index in the new text.
    #[must_use]
    pub fn changes(&self) -> &BTreeMap<usize, LineChange> {
        &self.changes
    }

    /// Contracting entries in old-text order.
    #[must_use]
    pub fn removals(&self) -> &[LineChange] {
        &self.removals
    }

    /// Counts the entries by kind.
    #[must_use]
    pub fn stats(&self) -> DiffStats {
        let lines_added = self.changes.values().filter(|c| c.is_expanding()).count();
        DiffStats {
            lines_added,
            lines_removed: self.removals.len(),
            lines_unchanged: self.changes.len() - lines_added,
        }
    }

    pub(crate) fn changes_mut(&mut self) -> &mut BTreeMap<usize, LineChange> {
        &mut self.changes
    }
}

/// Diffs `old` against `new` and classifies every line.
#[must_use]
pub fn diff_lines<A, B>(old: &[A], new: &[B]) -> LineDiff
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let common = longest_common_subsequence(old, new);
    classify(old, new, &common)
}

/// Computes the LCS of two line sequences and returns its lines in order.
#[must_use]
pub fn longest_common_subsequence<'a, A, B>(old: &'a [A], new: &[B]) -> Vec<&'a str>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let m = old.len();
    let n = new.len();
    if m == 0 || n == 0 {
        return Vec::new();
    }

    // Row-major (m + 1) x (n + 1) table; row 0 and column 0 stay zero.
    let width = n + 1;
    let mut table = vec![0usize; (m + 1) * width];
    for i in 1..=m {
        for j in 1..=n {
            table[i * width + j] = if old[i - 1].as_ref() == new[j - 1].as_ref() {
                table[(i - 1) * width + (j - 1)] + 1
            } else {
                table[(i - 1) * width + j].max(table[i * width + (j - 1)])
            };
        }
    }

    let mut common = Vec::with_capacity(table[m * width + n]);
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if old[i - 1].as_ref() == new[j - 1].as_ref() {
            common.push(old[i - 1].as_ref());
            i -= 1;
            j -= 1;
        } else if table[(i - 1) * width + j] >= table[i * width + (j - 1)] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    common.reverse();
    common
}

/// Walks both sequences in lock-step against the common subsequence.
fn classify<A, B>(old: &[A], new: &[B], common: &[&str]) -> LineDiff
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut diff = LineDiff::default();
    let last_old = old.len().saturating_sub(1);
    let (mut old_cursor, mut new_cursor) = (0, 0);

    for &line in common {
        while old_cursor < old.len() && old[old_cursor].as_ref() != line {
            diff.removals.push(LineChange::contracting(old_cursor, old[old_cursor].as_ref()));
            old_cursor += 1;
        }

        let anchor = old_cursor.min(last_old);
        while new_cursor < new.len() && new[new_cursor].as_ref() != line {
            diff.changes.insert(
                new_cursor,
                LineChange::expanding(anchor, new_cursor, new[new_cursor].as_ref()),
            );
            new_cursor += 1;
        }

        // The subsequence guarantees both cursors now sit on `line`.
        if old_cursor < old.len() && new_cursor < new.len() {
            diff.changes.insert(
                new_cursor,
                LineChange::unchanged(old_cursor, new_cursor, line),
            );
            old_cursor += 1;
            new_cursor += 1;
        }
    }

    for (index, line) in old.iter().enumerate().skip(old_cursor) {
        diff.removals.push(LineChange::contracting(index, line.as_ref()));
    }
    for (index, line) in new.iter().enumerate().skip(new_cursor) {
        diff.changes.insert(index, LineChange::expanding(last_old, index, line.as_ref()));
    }

    diff
}
