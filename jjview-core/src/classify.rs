//! Entry-start detection for jj's log-style listings.
//!
//! A listing is a graph: each entry begins on a line holding a node glyph
//! followed by the entry's identity token, and every other line is a
//! continuation (description, `args:`, graph connectors). The line-start
//! grammars are anchored regular expressions compiled once per process.
//!
//! Classification works on stripped text. Callers holding decorated lines use
//! [`classify_decorated`], which strips first, so the result never depends on
//! where jj placed its colour codes.

use std::sync::LazyLock;

use regex::Regex;

use crate::ansi::strip;
use crate::entity::Marker;

/// Graph connector characters that may precede a node glyph, plus spaces.
pub(crate) const CONNECTORS: &[char] = &[
    '│', '├', '┤', '┬', '┴', '┼', '─', '╭', '╮', '╯', '╰', '╷', '╵', '|', '/', '\\',
];

// Constant patterns: the `expect`s below can only fire on a typo, never on input.
static OPERATION_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[ \t│├┤┬┴┼─╭╮╯╰╷╵|/\\]*(?P<marker>[@○◉●◆◇×◌]) +(?P<id>[0-9a-f]{12}) ",
    )
    .expect("operation entry pattern is valid")
});

static CHANGE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[ \t│├┤┬┴┼─╭╮╯╰╷╵|/\\]*(?P<marker>[@○◉●◆◇×◌]) +(?P<id>[k-z]{8,})(?:/(?P<version>[0-9]+))? ",
    )
    .expect("change entry pattern is valid")
});

/// Line grammar of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// `jj op log`: 12 lowercase hex digit operation ids.
    OperationLog,
    /// `jj log` and `jj evolog`: reverse-hex change ids, optionally with a
    /// `/<n>` version suffix.
    ChangeLog,
}

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Continuation, connector-only, or blank line.
    None,
    Operation {
        id: String,
        current: bool,
    },
    Change {
        id: String,
        /// The id as printed, including any `/<n>` suffix.
        token: String,
        /// The parsed suffix; `None` when absent or out of range.
        version: Option<u32>,
        marker: Marker,
    },
}

impl EntryKind {
    pub fn is_entry(&self) -> bool {
        !matches!(self, EntryKind::None)
    }

    /// Identity key of the entry, if this is one.
    pub fn id(&self) -> Option<&str> {
        match self {
            EntryKind::None => None,
            EntryKind::Operation { id, .. } | EntryKind::Change { id, .. } => Some(id),
        }
    }
}

/// Classifies an already-stripped line.
pub fn classify(line: &str, grammar: Grammar) -> EntryKind {
    match grammar {
        Grammar::OperationLog => {
            let Some(caps) = OPERATION_ENTRY.captures(line) else {
                return EntryKind::None;
            };
            EntryKind::Operation {
                id: caps["id"].to_owned(),
                current: marker_glyph(&caps["marker"]) == '@',
            }
        }
        Grammar::ChangeLog => {
            let Some(caps) = CHANGE_ENTRY.captures(line) else {
                return EntryKind::None;
            };
            // An out-of-range suffix is still an entry; the printed token
            // stays the key so it cannot collide with the unversioned id.
            let version = caps.name("version").and_then(|v| v.as_str().parse::<u32>().ok());
            let token = match caps.name("version") {
                Some(v) => format!("{}/{}", &caps["id"], v.as_str()),
                None => caps["id"].to_owned(),
            };
            EntryKind::Change {
                id: caps["id"].to_owned(),
                token,
                version,
                marker: Marker::from_glyph(marker_glyph(&caps["marker"])),
            }
        }
    }
}

/// Strips decoration from `line`, then classifies it.
pub fn classify_decorated(line: &str, grammar: Grammar) -> EntryKind {
    classify(&strip(line), grammar)
}

fn marker_glyph(marker: &str) -> char {
    marker.chars().next().unwrap_or(' ')
}
