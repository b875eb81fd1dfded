//! Groups the lines of a listing into [`Entity`] records.
//!
//! One linear pass: every entry-start line opens a new entity, and every
//! non-blank line after it is folded into that entity until the next entry
//! start. Lines before the first entry start have nowhere to go and are
//! dropped.

use std::ops::Range;

use crate::ansi::strip;
use crate::classify::{classify, EntryKind, Grammar, CONNECTORS};
use crate::entity::{Entity, EntityDetail};

/// Entities of one listing plus the line numbers they start on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembled {
    pub entities: Vec<Entity>,
    /// `starts[i]` is the zero-based line of `entities[i]`'s entry-start line.
    pub starts: Vec<usize>,
    /// Number of lines in the source blob.
    pub line_count: usize,
}

impl Assembled {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Lines covered by entity `index`: from its start line up to the next
    /// entity's start (or the end of the blob).
    pub fn span(&self, index: usize) -> Option<Range<usize>> {
        let start = *self.starts.get(index)?;
        let end = self.starts.get(index + 1).copied().unwrap_or(self.line_count);
        Some(start..end)
    }
}

/// Splits `blob` into entities using `grammar` for entry-start detection.
pub fn assemble(blob: &str, grammar: Grammar) -> Assembled {
    let mut out = Assembled::default();
    let mut current: Option<EntityBuilder> = None;

    for (lineno, line) in blob.lines().enumerate() {
        out.line_count = lineno + 1;
        let plain = strip(line);

        match classify(&plain, grammar) {
            EntryKind::None => {
                if plain.trim().is_empty() {
                    continue;
                }
                if let Some(builder) = current.as_mut() {
                    builder.push_continuation(line, &plain);
                }
            }
            kind => {
                if let Some(builder) = current.take() {
                    out.entities.push(builder.finish());
                }
                out.starts.push(lineno);
                current = EntityBuilder::start(kind, line);
            }
        }
    }

    if let Some(builder) = current.take() {
        out.entities.push(builder.finish());
    }
    out
}

/// Entity under construction.
struct EntityBuilder {
    id: String,
    token: String,
    detail: EntityDetail,
    raw: Vec<String>,
    description: Vec<String>,
}

impl EntityBuilder {
    fn start(kind: EntryKind, header: &str) -> Option<Self> {
        let (id, token, detail) = match kind {
            EntryKind::None => return None,
            EntryKind::Operation { id, current } => {
                let token = id.clone();
                (id, token, EntityDetail::Operation { args: String::new(), current })
            }
            EntryKind::Change { id, token, version, marker } => {
                (id, token, EntityDetail::Change { version, marker })
            }
        };
        Some(Self {
            id,
            token,
            detail,
            raw: vec![header.to_owned()],
            description: Vec::new(),
        })
    }

    /// Folds one continuation line in. `raw` keeps its decoration; `plain`
    /// is the stripped form used for field extraction.
    fn push_continuation(&mut self, raw: &str, plain: &str) {
        self.raw.push(raw.to_owned());

        let text = plain
            .trim_start_matches(|c: char| c.is_whitespace() || CONNECTORS.contains(&c))
            .trim_end();
        if is_graph_only(text) {
            return;
        }

        if let EntityDetail::Operation { args, .. } = &mut self.detail {
            if let Some(rest) = text.strip_prefix("args:") {
                *args = rest.trim().to_owned();
                return;
            }
        }

        self.description.push(text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    fn finish(self) -> Entity {
        Entity {
            id: self.id,
            token: self.token,
            description: self.description.join(" "),
            raw: self.raw.join("\n"),
            detail: self.detail,
        }
    }
}

/// Connector residue and jj's elision marker carry no description text.
fn is_graph_only(text: &str) -> bool {
    text.is_empty() || text == "~" || text.trim_start_matches('~').trim() == "(elided revisions)"
}
