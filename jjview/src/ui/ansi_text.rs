//! Converts jj's coloured output lines into ratatui `Line`s.
//!
//! Only SGR sequences reach `ansi-to-tui`; any other escape sequence is
//! dropped first so it can never move the cursor inside a panel. jj emits
//! every line self-contained, so each raw line is converted on its own.

use ansi_to_tui::IntoText;
use jjview_core::ansi::{strip, tokenize, Token};
use ratatui::text::Line;

/// Builds an owned, styled line from one raw output line.
///
/// Tabs become four spaces. A line `ansi-to-tui` cannot parse is shown
/// without colour.
pub fn to_line(raw: &str) -> Line<'static> {
    let mut cleaned = String::with_capacity(raw.len());
    for token in tokenize(raw) {
        match token {
            Token::Text(text) => push_expanded(&mut cleaned, text),
            Token::Sgr(params) => {
                cleaned.push_str("\x1b[");
                cleaned.push_str(params);
                cleaned.push('m');
            }
            Token::Control(_) => {}
        }
    }

    match cleaned.into_text() {
        Ok(text) => text.lines.into_iter().next().unwrap_or_default(),
        Err(err) => {
            tracing::debug!(error = %err, "uncoloured fallback for jj output line");
            let mut plain = String::with_capacity(raw.len());
            push_expanded(&mut plain, &strip(raw));
            Line::raw(plain)
        }
    }
}

fn push_expanded(out: &mut String, text: &str) {
    for (i, part) in text.split('\t').enumerate() {
        if i > 0 {
            out.push_str("    ");
        }
        out.push_str(part);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Modifier, Style, Stylize};

    use super::*;

    fn content(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn plain_text_keeps_its_content() {
        let line = to_line("hello");
        assert_eq!(content(&line), "hello");
    }

    #[test]
    fn sgr_colours_become_span_styles() {
        let line = to_line("\x1b[1;31mred\x1b[0m plain");
        assert_eq!(content(&line), "red plain");
        assert_eq!(line.spans[0].content, "red");
        assert_eq!(line.spans[0].style, Style::new().red().bold());
        assert!(!line.spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn indexed_colours_from_jj_are_kept() {
        let line = to_line("\x1b[1m\x1b[38;5;5mqp\x1b[0m\x1b[38;5;8mvuntsm\x1b[39m rest");
        assert_eq!(content(&line), "qpvuntsm rest");
        let first = &line.spans[0];
        assert_eq!(first.content, "qp");
        assert_eq!(first.style.fg, Some(Color::Indexed(5)));
        assert!(first.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn non_sgr_escapes_are_dropped_and_tabs_expanded() {
        let line = to_line("a\x1b[2Kb\x1b]8;;http://x\x07c\td");
        assert_eq!(content(&line), "abc    d");
    }
}
