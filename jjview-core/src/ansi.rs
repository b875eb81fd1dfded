//! Terminal escape sequence handling.
//!
//! jj is always invoked with `--color=always` because the same text is shown
//! verbatim in the panels. Every line the parsers see therefore carries SGR
//! colour codes interleaved with the characters that matter (often between
//! the graph marker glyph and the change id). This module splits a line into
//! text runs and escape sequences so callers can either drop every escape
//! ([`strip`]) or keep only the colour ones (the renderer).

use std::borrow::Cow;

const ESC: u8 = 0x1b;
const BEL: u8 = 0x07;

/// One lexical piece of a decorated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Plain text. Never contains an escape character.
    Text(&'a str),
    /// Parameters of a Select Graphic Rendition sequence (`ESC [ <params> m`),
    /// without the leading `ESC [` and the trailing `m`.
    Sgr(&'a str),
    /// Any other escape sequence, including truncated ones. Carries the full
    /// sequence text.
    Control(&'a str),
}

/// Iterator over the [`Token`]s of a line. Created by [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

/// Splits `line` into text runs and escape sequences.
///
/// Concatenating the text of every token (text runs plus the raw text of each
/// escape) reproduces `line` exactly.
pub fn tokenize(line: &str) -> Tokens<'_> {
    Tokens { rest: line }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.bytes().position(|b| b == ESC) {
            None => {
                let text = self.rest;
                self.rest = "";
                return Some(Token::Text(text));
            }
            Some(pos) if pos > 0 => {
                let (text, rest) = self.rest.split_at(pos);
                self.rest = rest;
                return Some(Token::Text(text));
            }
            Some(_) => {}
        }

        let len = escape_len(self.rest.as_bytes());
        let (seq, rest) = self.rest.split_at(len);
        self.rest = rest;

        let bytes = seq.as_bytes();
        if bytes.len() >= 3 && bytes[1] == b'[' && bytes[bytes.len() - 1] == b'm' {
            Some(Token::Sgr(&seq[2..seq.len() - 1]))
        } else {
            Some(Token::Control(seq))
        }
    }
}

/// Returns the byte length of the escape sequence at the start of `bytes`.
///
/// `bytes[0]` must be `ESC`. Truncated or malformed sequences end before the
/// first byte that cannot belong to them, so the returned length always lands
/// on a char boundary and the rest of the line is preserved.
fn escape_len(bytes: &[u8]) -> usize {
    debug_assert_eq!(bytes.first(), Some(&ESC));
    let Some(&kind) = bytes.get(1) else {
        return 1;
    };

    match kind {
        // CSI: parameter bytes, intermediate bytes, one final byte.
        b'[' => {
            let mut i = 2;
            while let Some(&b) = bytes.get(i) {
                match b {
                    0x30..=0x3f | 0x20..=0x2f => i += 1,
                    0x40..=0x7e => return i + 1,
                    _ => return i,
                }
            }
            i
        }
        // OSC: terminated by BEL or ST (`ESC \`).
        b']' => {
            let mut i = 2;
            while let Some(&b) = bytes.get(i) {
                match b {
                    BEL => return i + 1,
                    ESC if bytes.get(i + 1) == Some(&b'\\') => return i + 2,
                    ESC => return i,
                    _ => i += 1,
                }
            }
            i
        }
        // nF escapes such as charset selection (`ESC ( B`).
        0x20..=0x2f => {
            let mut i = 2;
            while let Some(&b) = bytes.get(i) {
                match b {
                    0x20..=0x2f => i += 1,
                    0x30..=0x7e => return i + 1,
                    _ => return i,
                }
            }
            i
        }
        0x30..=0x7e => 2,
        _ => 1,
    }
}

/// Removes every terminal escape sequence from `line`.
///
/// Text and whitespace are left untouched. Borrows when `line` holds no
/// escapes, which makes `strip(strip(s))` free as well as equal to `strip(s)`.
pub fn strip(line: &str) -> Cow<'_, str> {
    if !line.as_bytes().contains(&ESC) {
        return Cow::Borrowed(line);
    }
    let mut out = String::with_capacity(line.len());
    for token in tokenize(line) {
        if let Token::Text(text) = token {
            out.push_str(text);
        }
    }
    Cow::Owned(out)
}
