//! Parser for `jj diff --summary` listings.

use std::sync::LazyLock;

use regex::Regex;

use crate::ansi::strip;
use crate::selection::Keyed;

// Constant patterns: the `expect`s below can only fire on a typo, never on input.
static SUMMARY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<status>[MADRC]) (?P<path>.+)$").expect("summary pattern is valid")
});

static RENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>[^{]*)\{(?P<old>[^}]*) => (?P<new>[^}]*)\}(?P<suffix>.*)$")
        .expect("rename pattern is valid")
});

/// Change status letter of a summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
}

impl FileStatus {
    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "M" => Some(FileStatus::Modified),
            "A" => Some(FileStatus::Added),
            "D" => Some(FileStatus::Deleted),
            "R" => Some(FileStatus::Renamed),
            "C" => Some(FileStatus::Copied),
            _ => None,
        }
    }

    /// The letter jj prints for this status.
    pub fn letter(self) -> char {
        match self {
            FileStatus::Modified => 'M',
            FileStatus::Added => 'A',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
            FileStatus::Copied => 'C',
        }
    }
}

/// One file touched by a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub status: FileStatus,
    /// Repository-relative path after the change.
    pub path: String,
    /// Source path of a rename or copy.
    pub old_path: Option<String>,
}

impl Keyed for FileChange {
    fn key(&self) -> &str {
        &self.path
    }
}

/// Parses a summary listing. Lines that are not `<status> <path>` are skipped.
pub fn parse_summary(blob: &str) -> Vec<FileChange> {
    blob.lines()
        .filter_map(|line| {
            let plain = strip(line);
            let caps = SUMMARY_LINE.captures(plain.trim_end())?;
            let status = FileStatus::from_letter(&caps["status"])?;
            let (path, old_path) = split_rename(&caps["path"]);
            Some(FileChange { status, path, old_path })
        })
        .collect()
}

/// Resolves jj's `dir/{old => new}.ext` rename notation to `(new, Some(old))`.
fn split_rename(path: &str) -> (String, Option<String>) {
    let Some(caps) = RENAME.captures(path) else {
        return (path.to_owned(), None);
    };
    let join = |middle: &str| {
        let joined = format!("{}{}{}", &caps["prefix"], middle, &caps["suffix"]);
        joined.replace("//", "/").trim_start_matches('/').to_owned()
    };
    (join(&caps["new"]), Some(join(&caps["old"])))
}
