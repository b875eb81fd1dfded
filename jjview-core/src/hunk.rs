//! Section boundaries in diff and file-status output.
//!
//! Two header forms open a section: the unified-diff `@@ ... @@` marker, and
//! the `<Added|Modified|Removed> regular file <path>:` header jj prints in its
//! default colour-words format. A section runs until the line above the next
//! header, and the last one runs to the end of the blob.

use std::sync::LazyLock;

use regex::Regex;

use crate::ansi::strip;

// Constant patterns: the `expect`s below can only fire on a typo, never on input.
static DIFF_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@@ .*@@").expect("diff marker pattern is valid"));

static FILE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:Added|Modified|Removed) (?:regular file|executable file|symlink) (?P<path>.+):$",
    )
    .expect("file header pattern is valid")
});

/// What opened a [`Hunk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkKind {
    /// A unified-diff `@@` marker.
    DiffMarker,
    /// A per-file header naming the file.
    FileHeader { path: String },
}

/// An inclusive line range `[start, end]` of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub start: usize,
    pub end: usize,
    pub kind: HunkKind,
}

impl Hunk {
    /// Path of the file this section belongs to, for file headers.
    pub fn path(&self) -> Option<&str> {
        match &self.kind {
            HunkKind::FileHeader { path } => Some(path),
            HunkKind::DiffMarker => None,
        }
    }
}

/// Recognises a section header in an already-stripped line.
pub fn header_kind(line: &str) -> Option<HunkKind> {
    if DIFF_MARKER.is_match(line) {
        return Some(HunkKind::DiffMarker);
    }
    FILE_HEADER
        .captures(line)
        .map(|caps| HunkKind::FileHeader { path: caps["path"].to_owned() })
}

/// Splits `blob` into non-overlapping sections in ascending line order.
///
/// Returns an empty list when no line is a section header.
pub fn segment(blob: &str) -> Vec<Hunk> {
    let mut hunks: Vec<Hunk> = Vec::new();
    let mut line_count = 0;

    for (lineno, line) in blob.lines().enumerate() {
        line_count = lineno + 1;
        let Some(kind) = header_kind(&strip(line)) else {
            continue;
        };
        if let Some(prev) = hunks.last_mut() {
            prev.end = lineno - 1;
        }
        hunks.push(Hunk { start: lineno, end: lineno, kind });
    }

    if let Some(last) = hunks.last_mut() {
        last.end = line_count - 1;
    }
    hunks
}
