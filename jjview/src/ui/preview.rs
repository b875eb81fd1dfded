//! Preview panel renderer for jjview.
//!
//! Renders the centre panel using a List widget with manual virtual
//! scrolling. Row 0 is the header line jjview draws itself
//! (`PREVIEW_HEADER_LINES`); rows below it are the jj output. Only the rows
//! in `[scroll, scroll + height)` are materialized per frame, so long diffs
//! cost O(viewport) to draw.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use crate::app::{AppState, PanelFocus, Preview, PREVIEW_HEADER_LINES};
use crate::jj::types::PreviewTarget;
use crate::theme::Theme;
use crate::ui::ansi_text::to_line;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the preview centre panel.
///
/// # Arguments
///
/// * `frame` - current render frame
/// * `area` - the `Rect` for the centre panel (includes borders)
/// * `state` - read-only app state supplying the preview
/// * `theme` - active color theme
pub fn render_preview(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let preview = &state.preview;
    let block = panel_block("Preview", state.focus == PanelFocus::Preview, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if preview.shown.is_none() {
        let msg = if preview.loading { "Loading…" } else { "Nothing selected" };
        let placeholder = Line::styled(msg, Style::default().fg(theme.placeholder));
        frame.render_widget(List::new([ListItem::new(placeholder)]), inner);
        return;
    }

    let total = PREVIEW_HEADER_LINES + preview.lines.len();
    let start = preview.viewport.scroll.min(total.saturating_sub(1));
    let end = (start + inner.height as usize).min(total);

    let items: Vec<ListItem> = (start..end)
        .map(|row| match row.checked_sub(PREVIEW_HEADER_LINES) {
            None => ListItem::new(header_line(preview, theme)),
            Some(i) => ListItem::new(to_line(&preview.lines[i])),
        })
        .collect();
    frame.render_widget(List::new(items), inner);
}

/// The line above the jj output: what is shown, and the section position.
fn header_line(preview: &Preview, theme: &Theme) -> Line<'static> {
    let style = Style::default().fg(theme.preview_header).add_modifier(Modifier::BOLD);
    let what = match &preview.shown {
        Some(PreviewTarget::Change(rev)) => format!("change {rev}"),
        Some(PreviewTarget::Operation(id)) => format!("operation {id}"),
        None => String::new(),
    };
    let mut spans = vec![Span::styled(what, style)];

    if !preview.hunks.is_empty() {
        let position = match preview.viewport.current_hunk {
            Some(i) => format!("  section {}/{}", i + 1, preview.hunks.len()),
            None => format!("  {} sections", preview.hunks.len()),
        };
        spans.push(Span::styled(position, Style::default().fg(theme.placeholder)));
    }
    if preview.loading {
        spans.push(Span::styled("  (updating)", Style::default().fg(theme.placeholder)));
    }
    Line::from(spans)
}
