//! Inclusion marker scanning.
//!
//! The preprocessor's inclusion stage inlines each included file between two
//! marker lines, both of which contain the included file's path:
//!
//! ```text
//! start:
//! ; BEGIN INCLUDE "lib/io.inc"
//!     out 0x10, a
//! ; END INCLUDE "lib/io.inc"
//!     hlt
//! ```
//!
//! [`InclusionMarkers::scan`] recovers those brackets as [`InclusionRegion`]s so
//! inserted lines can be attributed to the file they were inlined from. The
//! marker tokens are configurable (see [`crate::config`]); text that does not
//! follow the format is simply not recognized. That is never an error.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::snapshot::LinesSnapshot;

/// Default token identifying a begin marker line.
pub const DEFAULT_BEGIN_MARKER: &str = "; BEGIN INCLUDE";

/// Default token identifying an end marker line.
pub const DEFAULT_END_MARKER: &str = "; END INCLUDE";

/// Tokens identifying inclusion marker lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InclusionMarkers {
    pub begin: String,
    pub end: String,
}

impl Default for InclusionMarkers {
    fn default() -> Self {
        Self {
            begin: DEFAULT_BEGIN_MARKER.to_string(),
            end: DEFAULT_END_MARKER.to_string(),
        }
    }
}

/// Lines strictly between a begin marker and its matching end marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InclusionRegion {
    /// Included file, as listed by the caller.
    pub path: PathBuf,
    /// Index of the begin marker line.
    pub begin: usize,
    /// Index of the end marker line.
    pub end: usize,
}

impl InclusionRegion {
    /// Returns `true` if `line` lies inside the brackets (markers excluded).
    #[must_use]
    pub fn contains(&self, line: usize) -> bool {
        line > self.begin && line < self.end
    }
}

impl InclusionMarkers {
    #[must_use]
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
        }
    }

    /// Renders the begin marker line for `path`.
    #[must_use]
    pub fn format_begin(&self, path: &Path) -> String {
        format!("{} \"{}\"", self.begin, path.display())
    }

    /// Renders the end marker line for `path`.
    #[must_use]
    pub fn format_end(&self, path: &Path) -> String {
        format!("{} \"{}\"", self.end, path.display())
    }

    /// Finds the bracketed regions for the listed inclusions.
    ///
    /// A marker line is a token followed by whitespace and exactly one of the
    /// listed paths, bare or in double quotes, as written by
    /// [`InclusionMarkers::format_begin`]. Lines naming any other path are not
    /// markers.
    ///
    /// Regions may nest. An end marker closes the most recent open region for
    /// the same path; regions opened after it and still unclosed are dropped,
    /// as are regions never closed. Results are ordered by `begin`.
    #[must_use]
    pub fn scan<L, P>(&self, lines: &[L], inclusions: &[P]) -> Vec<InclusionRegion>
    where
        L: AsRef<str>,
        P: AsRef<Path>,
    {
        let names: Vec<(&Path, String)> = inclusions
            .iter()
            .map(|p| (p.as_ref(), p.as_ref().to_string_lossy().into_owned()))
            .collect();

        let mut open: Vec<(usize, usize)> = Vec::new();
        let mut regions = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            match self.classify(line.as_ref(), &names) {
                Some(Marker::Begin(which)) => open.push((which, index)),
                Some(Marker::End(which)) => match open.iter().rposition(|&(w, _)| w == which) {
                    Some(position) => {
                        for (w, begin) in open.drain(position + 1..) {
                            debug!(
                                path = %names[w].1,
                                begin,
                                "Dropping unterminated inclusion region"
                            );
                        }
                        if let Some((_, begin)) = open.pop() {
                            regions.push(InclusionRegion {
                                path: names[which].0.to_path_buf(),
                                begin,
                                end: index,
                            });
                        }
                    }
                    None => {
                        debug!(
                            path = %names[which].1,
                            line = index,
                            "End marker without begin marker"
                        );
                    }
                },
                None => {}
            }
        }

        for (w, begin) in open {
            debug!(path = %names[w].1, begin, "Dropping unterminated inclusion region");
        }

        regions.sort_by_key(|r| r.begin);
        regions
    }

    /// Recognizes `line` as a marker for one of `names`.
    ///
    /// The longer token is tried first, so a token that is a prefix of the
    /// other cannot shadow it.
    fn classify(&self, line: &str, names: &[(&Path, String)]) -> Option<Marker> {
        let begin = || {
            marker_target(line, &self.begin)
                .and_then(|target| lookup(target, names))
                .map(Marker::Begin)
        };
        let end = || {
            marker_target(line, &self.end)
                .and_then(|target| lookup(target, names))
                .map(Marker::End)
        };

        if self.end.len() > self.begin.len() {
            end().or_else(begin)
        } else {
            begin().or_else(end)
        }
    }
}

/// Kind of marker line, with the index of the listed path it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Begin(usize),
    End(usize),
}

/// Path written after `token` on a marker line, with surrounding quotes removed.
fn marker_target<'l>(line: &'l str, token: &str) -> Option<&'l str> {
    let rest = line.trim().strip_prefix(token)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim();
    Some(
        rest.strip_prefix('"')
            .and_then(|r| r.strip_suffix('"'))
            .unwrap_or(rest),
    )
}

/// Index of the listed path equal to `target`.
fn lookup(target: &str, names: &[(&Path, String)]) -> Option<usize> {
    if target.is_empty() {
        return None;
    }
    names.iter().position(|(_, name)| name == target)
}

/// Innermost region containing `line`.
#[must_use]
pub fn region_at(regions: &[InclusionRegion], line: usize) -> Option<&InclusionRegion> {
    // Regions nest properly, so the containing region that starts last is innermost.
    regions
        .iter()
        .filter(|r| r.contains(line))
        .max_by_key(|r| r.begin)
}

/// Attributes every expanding line of `snapshot` inside a region to its file.
///
/// Returns the number of annotated lines.
pub(crate) fn annotate(snapshot: &mut LinesSnapshot, regions: &[InclusionRegion]) -> usize {
    let Some(changes) = snapshot.changes_mut() else {
        return 0;
    };

    let mut annotated = 0;
    for (index, change) in changes.iter_mut() {
        if let Some(region) = region_at(regions, *index) {
            if change.annotate_inclusion(&region.path) {
                annotated += 1;
            }
        }
    }
    annotated
}
