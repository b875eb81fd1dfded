//! Decoration stripping, entry classification, and entity assembly.
//!
//! Exercises: ansi::strip, ansi::tokenize, classify, classify_decorated,
//! assemble, parse_summary.

use jjview_core::ansi::{self, Token};
use jjview_core::{
    assemble, classify, classify_decorated, parse_summary, EntityDetail, EntryKind, FileStatus,
    Grammar, Marker,
};
use proptest::prelude::*;

const OP_LOG: &str = "@  aaaaaaaaaaaa user@host now\n│  snapshot\n│  args: tool log\n○  bbbbbbbbbbbb user@host 1h ago\n│  push";

/// The same operation log as jj prints it with `--color=always`.
const OP_LOG_COLOURED: &str = "\x1b[1m\x1b[38;5;2m@\x1b[0m  \x1b[1m\x1b[38;5;12maaaaaaaaaaaa\x1b[0m \x1b[38;5;3muser@host\x1b[39m \x1b[38;5;14mnow\x1b[39m\n│  \x1b[1msnapshot\x1b[0m\n│  \x1b[38;5;8margs: tool log\x1b[39m\n○  \x1b[38;5;4mbbbbbbbbbbbb\x1b[39m user@host 1h ago\n│  push";

const CHANGE_LOG: &str = "\
@  \x1b[1m\x1b[38;5;13mq\x1b[38;5;8mpvuntsm\x1b[39m \x1b[38;5;3mdev@example.com\x1b[39m 2024-05-01 10:00:00 \x1b[38;5;12m9a\x1b[38;5;8m2c1e3b\x1b[39m\x1b[0m
│  \x1b[1m(no description set)\x1b[0m
○  zsuskuls dev@example.com 2024-04-30 09:00:00 main 3f1b2c4d
│  Add parser for the op log
│
│  Handles args lines too.
~  (elided revisions)
│ ○  rlvkpnrz dev@example.com 2024-04-29 08:00:00 e0f1a2b3
├─╯  feature work
◆  zzzzzzzz root() 00000000
";

#[test]
fn strip_removes_sgr_and_keeps_text() {
    assert_eq!(ansi::strip("\x1b[1m\x1b[38;5;2m@\x1b[0m  abc"), "@  abc");
    assert_eq!(ansi::strip("plain │ text"), "plain │ text");
    assert_eq!(ansi::strip(""), "");
}

#[test]
fn strip_drops_truncated_sequences() {
    assert_eq!(ansi::strip("abc\x1b[38;5"), "abc");
    assert_eq!(ansi::strip("abc\x1b"), "abc");
    assert_eq!(ansi::strip("\x1b]8;;https://x\x07link\x1b]8;;\x07"), "link");
    assert_eq!(ansi::strip("a\x1b[1é"), "aé");
}

#[test]
fn tokenize_reports_sgr_parameters() {
    let tokens: Vec<Token<'_>> = ansi::tokenize("\x1b[1;31mred\x1b[m").collect();
    assert_eq!(
        tokens,
        vec![Token::Sgr("1;31"), Token::Text("red"), Token::Sgr("")]
    );
}

#[test]
fn operation_grammar_extracts_id_and_marker() {
    assert_eq!(
        classify("@  aaaaaaaaaaaa user@host now", Grammar::OperationLog),
        EntryKind::Operation { id: "aaaaaaaaaaaa".to_owned(), current: true }
    );
    assert_eq!(
        classify("│ ○  0123456789ab user@host 1h ago", Grammar::OperationLog),
        EntryKind::Operation { id: "0123456789ab".to_owned(), current: false }
    );
    // Too short, uppercase, or not followed by a space.
    assert_eq!(classify("○  0123456789a user", Grammar::OperationLog), EntryKind::None);
    assert_eq!(classify("○  0123456789AB user", Grammar::OperationLog), EntryKind::None);
    assert_eq!(classify("○  0123456789ab", Grammar::OperationLog), EntryKind::None);
}

#[test]
fn change_grammar_accepts_versions_and_rejects_hex() {
    assert_eq!(
        classify("◆  zzzzzzzz root() 00000000", Grammar::ChangeLog),
        EntryKind::Change {
            id: "zzzzzzzz".to_owned(),
            token: "zzzzzzzz".to_owned(),
            version: None,
            marker: Marker::Immutable,
        }
    );
    assert_eq!(
        classify("○  qpvuntsm/2 dev@example.com", Grammar::ChangeLog),
        EntryKind::Change {
            id: "qpvuntsm".to_owned(),
            token: "qpvuntsm/2".to_owned(),
            version: Some(2),
            marker: Marker::Normal,
        }
    );
    assert_eq!(
        classify("×  qpvuntsmqq dev", Grammar::ChangeLog),
        EntryKind::Change {
            id: "qpvuntsmqq".to_owned(),
            token: "qpvuntsmqq".to_owned(),
            version: None,
            marker: Marker::Conflicted,
        }
    );
    // Hex digits are outside the change-id alphabet.
    assert_eq!(classify("○  aaaaaaaaaaaa user", Grammar::ChangeLog), EntryKind::None);
    assert_eq!(classify("○  qpvunts dev", Grammar::ChangeLog), EntryKind::None);
}

#[test]
fn connector_blank_and_branch_lines_are_not_entries() {
    for line in ["│", "│ │", "├─╮", "├─╯", "~", "", "   ", "│  (no description set)"] {
        assert_eq!(classify(line, Grammar::ChangeLog), EntryKind::None, "line {line:?}");
        assert_eq!(classify(line, Grammar::OperationLog), EntryKind::None, "line {line:?}");
    }
}

#[test]
fn operation_log_scenario_yields_two_entities() {
    let assembled = assemble(OP_LOG, Grammar::OperationLog);
    assert_eq!(assembled.entities.len(), 2);
    assert_eq!(assembled.starts, vec![0, 3]);
    assert_eq!(assembled.line_count, 5);

    let first = &assembled.entities[0];
    assert_eq!(first.id, "aaaaaaaaaaaa");
    assert_eq!(first.args(), Some("tool log"));
    assert_eq!(first.description, "snapshot");
    assert!(first.is_current());
    assert_eq!(
        first.raw,
        "@  aaaaaaaaaaaa user@host now\n│  snapshot\n│  args: tool log"
    );

    let second = &assembled.entities[1];
    assert_eq!(second.id, "bbbbbbbbbbbb");
    assert_eq!(second.description, "push");
    assert_eq!(second.args(), Some(""));
    assert!(!second.is_current());
}

#[test]
fn coloured_operation_log_matches_plain_one() {
    let plain = assemble(OP_LOG, Grammar::OperationLog);
    let coloured = assemble(OP_LOG_COLOURED, Grammar::OperationLog);

    let summary = |a: &jjview_core::Assembled| {
        a.entities
            .iter()
            .map(|e| (e.id.clone(), e.description.clone(), e.args().map(str::to_owned)))
            .collect::<Vec<_>>()
    };
    assert_eq!(summary(&plain), summary(&coloured));
    assert_eq!(plain.starts, coloured.starts);
    // Raw text keeps the colour codes for display.
    assert!(coloured.entities[0].raw.contains("\x1b[1m"));
}

#[test]
fn change_log_groups_descriptions_and_skips_graph_lines() {
    let assembled = assemble(CHANGE_LOG, Grammar::ChangeLog);
    let ids: Vec<&str> = assembled.entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["qpvuntsm", "zsuskuls", "rlvkpnrz", "zzzzzzzz"]);
    assert_eq!(assembled.starts, vec![0, 2, 7, 9]);

    assert_eq!(assembled.entities[0].description, "(no description set)");
    assert!(assembled.entities[0].is_current());
    assert_eq!(
        assembled.entities[1].description,
        "Add parser for the op log Handles args lines too."
    );
    assert_eq!(assembled.entities[2].description, "feature work");
    assert_eq!(
        assembled.entities[3].detail,
        EntityDetail::Change { version: None, marker: Marker::Immutable }
    );
    assert_eq!(assembled.span(1), Some(2..7));
    assert_eq!(assembled.span(3), Some(9..10));
}

#[test]
fn evolution_versions_become_distinct_tokens() {
    let blob = "@  qpvuntsm dev 10:02 1111aaaa\n│  second\n○  qpvuntsm/1 dev 10:01 2222bbbb\n│  first\n";
    let assembled = assemble(blob, Grammar::ChangeLog);
    assert_eq!(assembled.entities.len(), 2);
    assert_eq!(assembled.entities[0].revision(), "qpvuntsm");
    assert_eq!(assembled.entities[1].revision(), "qpvuntsm/1");
    assert_eq!(assembled.entities[1].version(), Some(1));
}

#[test]
fn oversized_version_suffix_still_starts_an_entry() {
    let blob = "@  qpvuntsm dev 2\n│  first\n○  qpvuntsm/99999999999 dev 1\n│  second\n";
    let assembled = assemble(blob, Grammar::ChangeLog);
    assert_eq!(assembled.entities.len(), 2);
    assert_eq!(assembled.entities[0].description, "first");
    assert_eq!(assembled.entities[1].revision(), "qpvuntsm/99999999999");
    assert_eq!(assembled.entities[1].version(), None);
    assert_eq!(assembled.entities[1].description, "second");
}

#[test]
fn text_before_the_first_entry_is_dropped() {
    let blob = "Warning: something\n│  orphan\n○  bbbbbbbbbbbb user 1h\n│  push\n";
    let assembled = assemble(blob, Grammar::OperationLog);
    assert_eq!(assembled.entities.len(), 1);
    assert_eq!(assembled.starts, vec![2]);
    assert_eq!(assembled.entities[0].description, "push");
}

#[test]
fn empty_blob_assembles_to_nothing() {
    let assembled = assemble("", Grammar::ChangeLog);
    assert!(assembled.is_empty());
    assert_eq!(assembled.line_count, 0);
    assert_eq!(assembled.span(0), None);
}

#[test]
fn summary_listing_resolves_renames() {
    let blob = "M src/lib.rs\nA \x1b[38;5;2mdocs/new.md\x1b[0m\nD old.txt\nR src/{parse.rs => parser.rs}\nR {a => b}/mod.rs\nnot a summary line\n";
    let files = parse_summary(blob);
    assert_eq!(files.len(), 5);
    assert_eq!(files[0].status, FileStatus::Modified);
    assert_eq!(files[1].path, "docs/new.md");
    assert_eq!(files[2].status.letter(), 'D');
    assert_eq!(files[3].path, "src/parser.rs");
    assert_eq!(files[3].old_path.as_deref(), Some("src/parse.rs"));
    assert_eq!(files[4].path, "b/mod.rs");
    assert_eq!(files[4].old_path.as_deref(), Some("a/mod.rs"));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn sgr_code() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("\x1b[0m".to_owned()),
        Just("\x1b[m".to_owned()),
        Just("\x1b[1m\x1b[38;5;13m".to_owned()),
        (0u8..108).prop_map(|n| format!("\x1b[{n}m")),
        (0u8..=255).prop_map(|n| format!("\x1b[38;5;{n}m")),
    ]
}

/// Pieces of a log line: graph prefix, glyph, gap, token, suffix, tail.
fn line_pieces() -> impl Strategy<Value = Vec<String>> {
    (
        "[│ ]{0,4}",
        prop::sample::select(vec!["@", "○", "◆", "×", "◌", "│", "~", ""]),
        " {0,3}",
        prop_oneof!["[k-z]{6,12}", "[0-9a-f]{11,13}", "[a-z0-9]{1,14}"],
        prop_oneof![Just(String::new()), "/[0-9]{1,3}"],
        "( [a-z@.]{0,8}){0,3}",
    )
        .prop_map(|(prefix, glyph, gap, token, suffix, tail)| {
            vec![prefix, glyph.to_owned(), gap, token, suffix, tail]
        })
}

fn decorate(pieces: &[String], codes: &[String]) -> String {
    pieces
        .iter()
        .zip(codes.iter().cycle())
        .map(|(piece, code)| format!("{code}{piece}\x1b[0m"))
        .collect()
}

fn escape_heavy_string() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[\x1b\\[\\];0-9mAHKa-z\x07\\\\ │é]{0,40}",
    ]
}

proptest! {
    #[test]
    fn classification_ignores_decoration(
        pieces in line_pieces(),
        codes in prop::collection::vec(sgr_code(), 6),
    ) {
        let plain: String = pieces.concat();
        let decorated = decorate(&pieces, &codes);
        prop_assert_eq!(ansi::strip(&decorated), plain.as_str());
        for grammar in [Grammar::ChangeLog, Grammar::OperationLog] {
            prop_assert_eq!(
                classify_decorated(&decorated, grammar),
                classify(&plain, grammar)
            );
        }
    }

    #[test]
    fn strip_is_idempotent_and_never_grows(s in escape_heavy_string()) {
        let once = ansi::strip(&s).into_owned();
        prop_assert!(once.len() <= s.len());
        prop_assert!(!once.contains('\x1b'));
        prop_assert_eq!(ansi::strip(&once), once.as_str());
    }

    #[test]
    fn tokens_reassemble_the_input(s in escape_heavy_string()) {
        let mut rebuilt = String::new();
        for token in ansi::tokenize(&s) {
            match token {
                Token::Text(t) | Token::Control(t) => rebuilt.push_str(t),
                Token::Sgr(p) => {
                    rebuilt.push_str("\x1b[");
                    rebuilt.push_str(p);
                    rebuilt.push('m');
                }
            }
        }
        prop_assert_eq!(rebuilt, s);
    }

    #[test]
    fn entity_count_matches_entry_starts(
        lines in prop::collection::vec(
            prop_oneof![
                line_pieces().prop_map(|p| p.concat()),
                Just("│  some description".to_owned()),
                Just("│  args: jj describe -m x".to_owned()),
                Just(String::new()),
                Just("├─╯".to_owned()),
            ],
            0..40,
        ),
    ) {
        let blob = lines.join("\n");
        for grammar in [Grammar::ChangeLog, Grammar::OperationLog] {
            let expected = blob
                .lines()
                .filter(|l| classify_decorated(l, grammar).is_entry())
                .count();
            let assembled = assemble(&blob, grammar);
            prop_assert_eq!(assembled.entities.len(), expected);
            prop_assert_eq!(assembled.starts.len(), expected);
            prop_assert!(assembled.starts.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
