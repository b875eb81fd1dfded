//! State of one list panel: the items, the cursor, and the scroll offset.
//!
//! The panel is replaced wholesale on every refresh. [`ListPanel::refresh`]
//! is the only way new content enters, and it runs the identity-keyed
//! reconciliation before anything else looks at the cursor.

use std::ops::Range;

use crate::assemble::Assembled;
use crate::entity::Entity;
use crate::selection::{Keyed, Reconciled, Selection};
use crate::viewport::ListViewport;

/// A list of keyed items rendered over a block of text lines, where item `i`
/// begins on line `starts[i]`.
#[derive(Debug, Clone)]
pub struct ListPanel<T> {
    selection: Selection<T>,
    starts: Vec<usize>,
    line_count: usize,
    viewport: ListViewport,
}

impl<T> Default for ListPanel<T> {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            starts: Vec::new(),
            line_count: 0,
            viewport: ListViewport::default(),
        }
    }
}

impl<T: Keyed> ListPanel<T> {
    /// Replaces the content and carries the selection over by key.
    ///
    /// `starts` must hold one start line per item, in ascending order.
    pub fn refresh(
        &mut self,
        items: Vec<T>,
        starts: Vec<usize>,
        line_count: usize,
        height: usize,
    ) -> Reconciled {
        debug_assert_eq!(items.len(), starts.len());
        let outcome = self.selection.replace(items);
        self.starts = starts;
        self.line_count = line_count;
        self.follow_cursor(height);
        outcome
    }

    /// Replaces the content with one item per line.
    pub fn refresh_lines(&mut self, items: Vec<T>, height: usize) -> Reconciled {
        let count = items.len();
        self.refresh(items, (0..count).collect(), count, height)
    }

    pub fn items(&self) -> &[T] {
        self.selection.items()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.selection.cursor()
    }

    pub fn selected(&self) -> Option<&T> {
        self.selection.selected()
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selection.selected_key()
    }

    pub fn scroll(&self) -> usize {
        self.viewport.scroll
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Lines covered by item `index`.
    pub fn span(&self, index: usize) -> Option<Range<usize>> {
        let start = *self.starts.get(index)?;
        let end = self.starts.get(index + 1).copied().unwrap_or(self.line_count);
        Some(start..end)
    }

    pub fn selected_span(&self) -> Option<Range<usize>> {
        self.span(self.cursor())
    }

    pub fn cursor_up(&mut self, height: usize) {
        self.move_cursor(-1, height);
    }

    pub fn cursor_down(&mut self, height: usize) {
        self.move_cursor(1, height);
    }

    /// Moves the cursor by `delta` items, clamped, and scrolls to follow it.
    pub fn move_cursor(&mut self, delta: isize, height: usize) {
        self.selection.move_by(delta);
        self.follow_cursor(height);
    }

    pub fn goto_top(&mut self) {
        self.selection.select_first();
        self.viewport = ListViewport::default();
    }

    pub fn goto_bottom(&mut self, height: usize) {
        self.selection.select_last();
        self.follow_cursor(height);
    }

    /// Selects the item with `key`, if present.
    pub fn select_key(&mut self, key: &str, height: usize) -> bool {
        let found = self.selection.select_key(key);
        if found {
            self.follow_cursor(height);
        }
        found
    }

    /// Selects the item whose span contains `line`, e.g. from a mouse click.
    pub fn select_line(&mut self, line: usize, height: usize) {
        if self.starts.is_empty() {
            return;
        }
        let index = self.starts.partition_point(|&start| start <= line).saturating_sub(1);
        self.selection.select(index);
        self.follow_cursor(height);
    }

    fn follow_cursor(&mut self, height: usize) {
        let line = self.starts.get(self.cursor()).copied().unwrap_or(0);
        self.viewport = self.viewport.keep_visible(line, height);
    }
}

impl ListPanel<Entity> {
    /// Replaces the content with a freshly assembled listing.
    pub fn refresh_assembled(&mut self, assembled: Assembled, height: usize) -> Reconciled {
        self.refresh(assembled.entities, assembled.starts, assembled.line_count, height)
    }
}
