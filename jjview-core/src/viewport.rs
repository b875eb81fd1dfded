//! Scroll state for list panels and hunk-aware diff panels.
//!
//! Both viewports are small `Copy` values and every operation returns the
//! next value instead of mutating, so navigation sequences can be replayed
//! and checked without a terminal.

use crate::hunk::Hunk;

/// Lines below the cursor's first line that must stay on screen after a
/// downward move, so the entry's description line is not cut off.
pub const TRAILING_CONTEXT: usize = 2;

/// Scroll offset of a list panel whose rows are the raw listing lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListViewport {
    pub scroll: usize,
}

impl ListViewport {
    /// Scrolls the minimum needed for `line` to be visible in a window of
    /// `height` rows, keeping [`TRAILING_CONTEXT`] lines below it when
    /// scrolling down.
    pub fn keep_visible(self, line: usize, height: usize) -> Self {
        if line < self.scroll {
            return Self { scroll: line };
        }
        if line + TRAILING_CONTEXT >= self.scroll + height {
            let scroll = (line + TRAILING_CONTEXT + 1).saturating_sub(height).min(line);
            return Self { scroll };
        }
        self
    }
}

/// Geometry of a diff panel: the sections of the body and the number of
/// lines the panel shows above the body.
#[derive(Debug, Clone, Copy)]
pub struct DiffLayout<'a> {
    pub hunks: &'a [Hunk],
    /// Lines in the diff body.
    pub total_lines: usize,
    /// Constant lines the panel prepends above the body.
    pub header_lines: usize,
}

impl<'a> DiffLayout<'a> {
    pub fn new(hunks: &'a [Hunk], total_lines: usize, header_lines: usize) -> Self {
        Self { hunks, total_lines, header_lines }
    }

    /// Largest scroll offset: the last line sits at the top of the panel.
    pub fn max_scroll(&self) -> usize {
        (self.header_lines + self.total_lines).saturating_sub(1)
    }

    /// Index of the last hunk starting at or above `scroll`, if any.
    pub fn hunk_at(&self, scroll: usize) -> Option<usize> {
        let line = scroll.checked_sub(self.header_lines)?;
        self.hunks.iter().rposition(|h| h.start <= line)
    }

    /// Scroll offset that puts hunk `index` at the top of the panel.
    fn hunk_top(&self, index: usize) -> usize {
        self.hunks[index].start + self.header_lines
    }
}

/// Scroll position of a diff panel and the hunk it is in.
///
/// `current_hunk` always equals [`DiffLayout::hunk_at`] of `scroll`; `None`
/// means the view is above the first hunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub scroll: usize,
    pub current_hunk: Option<usize>,
}

impl Viewport {
    /// Viewport at `scroll`, clamped to the layout.
    pub fn at(scroll: usize, layout: &DiffLayout<'_>) -> Self {
        let scroll = scroll.min(layout.max_scroll());
        Self { scroll, current_hunk: layout.hunk_at(scroll) }
    }

    /// Re-derives the viewport after the content changed underneath it.
    pub fn resync(self, layout: &DiffLayout<'_>) -> Self {
        Self::at(self.scroll, layout)
    }

    /// Scroll offset 0.
    ///
    /// `current_hunk` is `None` unless a hunk starts at line 0 with no
    /// header lines above it; scroll 0 is then inside that hunk and `top`
    /// reports `Some(0)`.
    pub fn top(layout: &DiffLayout<'_>) -> Self {
        Self::at(0, layout)
    }

    pub fn bottom(layout: &DiffLayout<'_>) -> Self {
        Self::at(layout.max_scroll(), layout)
    }

    /// Moves to the start of the next hunk. No-op on the last hunk.
    pub fn next_hunk(self, layout: &DiffLayout<'_>) -> Self {
        if layout.hunks.is_empty() {
            return self;
        }
        let target = match self.current_hunk {
            None => 0,
            Some(i) if i >= layout.hunks.len() => return self.resync(layout),
            Some(i) if i + 1 < layout.hunks.len() => i + 1,
            Some(_) => return self,
        };
        Self { scroll: layout.hunk_top(target), current_hunk: Some(target) }
    }

    /// Moves back to the start of the current hunk, or to the previous hunk
    /// when already at the start. From the first hunk this goes to the top,
    /// which stays on hunk 0 when that hunk starts the panel (see [`Viewport::top`]).
    pub fn prev_hunk(self, layout: &DiffLayout<'_>) -> Self {
        let Some(current) = self.current_hunk else {
            return Self::top(layout);
        };
        if current >= layout.hunks.len() {
            return self.resync(layout);
        }
        let top = layout.hunk_top(current);
        if self.scroll > top {
            return Self { scroll: top, current_hunk: Some(current) };
        }
        match current {
            0 => Self::top(layout),
            i => Self { scroll: layout.hunk_top(i - 1), current_hunk: Some(i - 1) },
        }
    }

    /// Scrolls by `delta` lines, clamped to `[0, max_scroll]`.
    pub fn scroll_by(self, delta: isize, layout: &DiffLayout<'_>) -> Self {
        Self::at(self.scroll.saturating_add_signed(delta), layout)
    }
}
