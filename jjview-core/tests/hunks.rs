//! Section segmentation of diff and file-status output.

use jjview_core::{segment, Hunk, HunkKind};
use proptest::prelude::*;

#[test]
fn three_file_headers_make_three_sections() {
    let blob = "\
Added regular file a.txt:
        1: hello
Added regular file b.txt:
        1: world
        2: !
Added regular file c.txt:
        1: x
";
    let hunks = segment(blob);
    assert_eq!(hunks.len(), 3);
    assert_eq!((hunks[0].start, hunks[0].end), (0, 1));
    assert_eq!((hunks[1].start, hunks[1].end), (2, 4));
    assert_eq!((hunks[2].start, hunks[2].end), (5, 6));
    assert_eq!(hunks[1].path(), Some("b.txt"));
}

#[test]
fn diff_markers_and_file_headers_share_one_pass() {
    let blob = "\
Commit ID: 9a2c1e3b
Change ID: qpvuntsmqpvuntsm

    Fix the parser

Modified regular file src/lib.rs:
\x1b[38;5;6m@@ -1,3 +1,4 @@\x1b[39m
 use std::fmt;
+use std::io;
@@ -20,2 +21,2 @@ fn main() {
-    old();
+    new();
Removed executable file run.sh:
        1     : #!/bin/sh";
    let hunks = segment(blob);
    let starts: Vec<usize> = hunks.iter().map(|h| h.start).collect();
    assert_eq!(starts, vec![5, 6, 9, 12]);
    assert_eq!(hunks[0].kind, HunkKind::FileHeader { path: "src/lib.rs".to_owned() });
    assert_eq!(hunks[1].kind, HunkKind::DiffMarker);
    assert_eq!(hunks[1].end, 8);
    assert_eq!(hunks[3].path(), Some("run.sh"));
    assert_eq!(hunks[3].end, 13);
}

#[test]
fn blobs_without_headers_have_no_sections() {
    assert!(segment("").is_empty());
    assert!(segment("just\nsome text\n@@ not closed\n").is_empty());
    assert!(segment("Added regular file missing-colon").is_empty());
}

#[test]
fn header_on_the_last_line_is_a_one_line_section() {
    let hunks = segment("context\n@@ -1 +1 @@");
    assert_eq!(hunks, vec![Hunk { start: 1, end: 1, kind: HunkKind::DiffMarker }]);
}

fn diff_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("@@ -1,2 +1,2 @@".to_owned()),
        Just("\x1b[36m@@ -5 +5 @@ fn x()\x1b[0m".to_owned()),
        "(Added|Modified|Removed) regular file [a-z/]{1,10}\\.rs:",
        "[ +-][a-z ]{0,20}",
        Just(String::new()),
    ]
}

proptest! {
    #[test]
    fn sections_never_overlap_and_cover_to_the_end(
        lines in prop::collection::vec(diff_line(), 0..60),
    ) {
        let blob = lines.join("\n");
        let hunks = segment(&blob);
        for pair in hunks.windows(2) {
            prop_assert!(pair[0].start <= pair[0].end);
            prop_assert!(pair[0].end < pair[1].start);
            prop_assert_eq!(pair[0].end + 1, pair[1].start);
        }
        if let Some(last) = hunks.last() {
            prop_assert_eq!(last.end, blob.lines().count() - 1);
        }
        // Re-running from scratch gives the same answer.
        prop_assert_eq!(segment(&blob), hunks);
    }
}
