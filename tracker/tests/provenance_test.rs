//! Integration tests for line provenance tracking.
//!
//! These tests drive a [`Tracker`] the way the preprocessor driver does:
//! load a file, feed successive text versions back, and query where lines of
//! the current text came from.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use lineage_tracker::{ChangeKind, LineChange, SnapshotKind, Tracker};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Writes `content` to `<dir>/<name>` and returns the path.
fn create_test_source(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).expect("Failed to create source file");
    file.write_all(content.as_bytes())
        .expect("Failed to write source file");
    file.flush().expect("Failed to flush");
    path
}

/// Starts tracking a fresh `main.asm` with the given content.
fn track(content: &str) -> (TempDir, Tracker) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = create_test_source(dir.path(), "main.asm", content);
    let tracker = Tracker::track(&path).expect("Failed to track source");
    (dir, tracker)
}

/// Contents of the latest snapshot's removals.
fn removed_lines(tracker: &Tracker) -> Vec<String> {
    tracker
        .instance()
        .latest()
        .removals()
        .iter()
        .map(|c| c.content().to_string())
        .collect()
}

// ============================================================================
// Structural Properties
// ============================================================================

mod property_tests {
    use super::*;

    #[test]
    fn snapshot_count_is_one_plus_updates() {
        let (_dir, mut tracker) = track("org 0\nnop");
        let versions = ["org 0\nnop", "org 0\nnop\nnop", "", "hlt", "hlt"];

        for (updates, text) in versions.iter().enumerate() {
            tracker.snapshot(*text);
            assert_eq!(tracker.snapshot_count(), updates + 2);
        }

        let history = tracker.instance().history();
        assert_eq!(history.initial().kind(), SnapshotKind::Initial);
        assert!(history
            .iter()
            .skip(1)
            .all(|s| s.kind() != SnapshotKind::Initial));
    }

    #[test]
    fn value_is_exactly_the_last_update() {
        let (_dir, mut tracker) = track("a");
        let text = "  mov a, b  \r\n\tjmp  loop\n\n";
        tracker.snapshot(text);
        assert_eq!(tracker.instance().value(), text);
    }

    #[test]
    fn origin_is_pure() {
        let (_dir, mut tracker) = track("a\nb\nc");
        tracker.snapshot("c\na\nx\nb");

        let first: Vec<Option<usize>> = (0..4).map(|n| tracker.origin(n)).collect();
        for _ in 0..3 {
            let again: Vec<Option<usize>> = (0..4).map(|n| tracker.origin(n)).collect();
            assert_eq!(again, first);
        }
        assert_eq!(tracker.snapshot_count(), 2);
    }

    #[test]
    fn identical_update_is_no_change() {
        let (_dir, mut tracker) = track("ld a, 1\nret");
        let lines_before = tracker.lines().to_vec();

        tracker.snapshot("ld a, 1\nret");

        let latest = tracker.instance().latest();
        assert_eq!(latest.kind(), SnapshotKind::NoChange);
        assert!(latest.changes().is_none());
        assert!(latest.removals().is_empty());
        assert_eq!(tracker.lines(), lines_before.as_slice());
    }

    #[test]
    fn appended_line_has_no_origin() {
        let (_dir, mut tracker) = track("a\nb");
        let count = tracker.snapshot_count();

        tracker.snapshot("a\nb\nc");

        assert_eq!(tracker.snapshot_count(), count + 1);
        assert_eq!(tracker.origin(2), None);
    }

    #[test]
    fn removed_line_only_in_removals() {
        let (_dir, mut tracker) = track("a\nb\nc");
        tracker.snapshot("a\nc");

        assert_eq!(tracker.lines().len(), 2);
        assert_eq!(removed_lines(&tracker), vec!["b".to_string()]);

        let changes = tracker.instance().latest().changes().expect("changed");
        assert!(changes.values().all(|c| c.content() != "b"));
        assert!(changes.values().all(|c| !c.is_contracting()));
    }
}

// ============================================================================
// Scenarios
// ============================================================================

mod scenario_tests {
    use super::*;

    #[test]
    fn scenario_append_line() {
        let (_dir, mut tracker) = track("line1\nline2\nline3");
        tracker.snapshot("line1\nline2\nline3\nline4");

        assert_eq!(tracker.snapshot_count(), 2);
        assert_eq!(tracker.lines().len(), 4);

        let changes = tracker.instance().latest().changes().expect("changed");
        assert_eq!(changes[&3].kind(), ChangeKind::Expanding);
        assert_eq!(changes[&3].content(), "line4");
    }

    #[test]
    fn scenario_remove_middle_lines() {
        let (_dir, mut tracker) = track("line1\nline2\nline3\nline4");
        tracker.snapshot("line1\nline4");

        assert_eq!(tracker.lines().len(), 2);
        assert_eq!(
            removed_lines(&tracker),
            vec!["line2".to_string(), "line3".to_string()]
        );
    }

    #[test]
    fn scenario_prepend_line() {
        let (_dir, mut tracker) = track("line1\nline2");
        tracker.snapshot("new_line\nline1\nline2");

        assert_eq!(tracker.origin(1), Some(0));
        assert_eq!(tracker.origin(2), Some(1));
    }

    #[test]
    fn scenario_insert_line() {
        let (_dir, mut tracker) = track("line1\nline2");
        tracker.snapshot("line1\ninserted\nline2");

        assert_eq!(tracker.origin(1), None);
    }

    #[test]
    fn scenario_insert_then_extend() {
        let (_dir, mut tracker) = track("start:\nhlt");
        tracker.snapshot("start:\n    call init\nhlt");
        tracker.snapshot("start:\n    call init\nhlt\ninit:\n    ret");

        assert_eq!(tracker.snapshot_count(), 3);

        let trail = tracker.history(1);
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].kind(), ChangeKind::Expanding);
        assert_eq!(trail[0].new_index(), Some(1));
        assert_eq!(trail[1], LineChange::unchanged(1, 1, "    call init"));

        // The extension itself has a one-step history.
        let tail = tracker.history(4);
        assert_eq!(tail.len(), 1);
        assert!(tail[0].is_expanding());

        // An original line is unchanged at every step.
        let hlt = tracker.history(2);
        assert_eq!(
            hlt,
            vec![
                LineChange::unchanged(1, 2, "hlt"),
                LineChange::unchanged(2, 2, "hlt"),
            ]
        );
        assert_eq!(tracker.origin(2), Some(1));
    }
}

// ============================================================================
// Preprocessor Pipeline
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[test]
    fn include_then_macro_then_conditional() {
        let original = "\
.include \"io.inc\"
start:
    PRINT 'A'
.if DEBUG
    brk
.endif
    hlt";
        let (_dir, mut tracker) = track(original);
        let markers = tracker.markers().clone();
        let io = Path::new("io.inc");

        // Inclusion stage: the directive is replaced by bracketed content.
        let included = [
            markers.format_begin(io).as_str(),
            "PRINT .macro ch",
            "    ld a, ch",
            "    out PORT, a",
            ".endm",
            markers.format_end(io).as_str(),
            "start:",
            "    PRINT 'A'",
            ".if DEBUG",
            "    brk",
            ".endif",
            "    hlt",
        ]
        .join("\n");
        tracker.snapshot_with_inclusions(included.as_str(), &[io]);

        {
            let changes = tracker.instance().latest().changes().expect("changed");
            for index in 1..=4 {
                assert_eq!(changes[&index].included_from(), Some(io));
            }
            assert_eq!(changes[&0].included_from(), None);
            assert_eq!(changes[&6].kind(), ChangeKind::Unchanged);
        }

        // Macro stage: definition dropped, invocation expanded.
        let expanded = "\
start:
    ld a, 'A'
    out 1, a
.if DEBUG
    brk
.endif
    hlt";
        tracker.snapshot(expanded);

        // Conditional stage: DEBUG is off.
        let final_text = "start:\n    ld a, 'A'\n    out 1, a\n    hlt";
        tracker.snapshot(final_text);

        assert_eq!(tracker.snapshot_count(), 4);
        assert_eq!(tracker.instance().value(), final_text);
        assert_eq!(tracker.origin(0), Some(1));
        assert_eq!(tracker.origin(1), None);
        assert_eq!(tracker.origin(2), None);
        assert_eq!(tracker.origin(3), Some(6));

        let out = tracker.history(2);
        assert_eq!(out.first().map(LineChange::kind), Some(ChangeKind::Expanding));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn many_noop_passes() {
        let (_dir, mut tracker) = track("a\nb\nc");
        for _ in 0..10 {
            tracker.snapshot("a\nb\nc");
        }

        assert_eq!(tracker.snapshot_count(), 11);
        assert_eq!(tracker.instance().history().change_count(), 0);
        assert_eq!(tracker.origin(2), Some(2));
        assert_eq!(tracker.history(2).len(), 10);
    }

    #[test]
    fn empty_source_file() {
        let (_dir, mut tracker) = track("");
        assert!(tracker.lines().is_empty());
        assert_eq!(tracker.origin(0), None);

        tracker.snapshot("nop");
        assert_eq!(tracker.origin(0), None);
        assert_eq!(tracker.history(0).len(), 1);
    }

    #[test]
    fn newline_only_source_file() {
        let (_dir, tracker) = track("\n");
        assert_eq!(tracker.lines(), &[String::new()]);
        assert_eq!(tracker.origin(0), Some(0));
    }
}
