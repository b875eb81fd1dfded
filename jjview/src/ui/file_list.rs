//! Files panel renderer for jjview.
//!
//! One row per file from `jj diff --summary`: a coloured status letter and
//! the path, with the rename source for renames and copies.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
};

use jjview_core::FileChange;

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the files right panel.
///
/// # Arguments
///
/// * `frame` - current render frame
/// * `area` - the `Rect` for the right panel (includes borders)
/// * `state` - read-only app state supplying the file list
/// * `theme` - active color theme
pub fn render_file_list(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let files = &state.files;
    let count = files.panel.items().len();
    let title = if count > 0 { format!("Files ({count})") } else { "Files".to_owned() };
    let block = panel_block(title, state.focus == PanelFocus::Files, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if files.panel.is_empty() {
        let msg = match (&files.revision, files.loading) {
            (None, _) => "No change selected",
            (Some(_), true) => "Loading…",
            (Some(_), false) => "No files changed",
        };
        let placeholder = Line::styled(msg, Style::default().fg(theme.placeholder));
        frame.render_widget(List::new([ListItem::new(placeholder)]), inner);
        return;
    }

    let start = files.panel.scroll().min(count - 1);
    let end = (start + inner.height as usize).min(count);
    let cursor = files.panel.cursor();
    let items: Vec<ListItem> = files.panel.items()[start..end]
        .iter()
        .enumerate()
        .map(|(offset, file)| {
            let line = file_line(file, theme);
            let line = if start + offset == cursor {
                line.style(Style::default().bg(theme.selection_bg))
            } else {
                line
            };
            ListItem::new(line)
        })
        .collect();
    frame.render_widget(List::new(items), inner);
}

/// Format: `M src/main.rs`, or `R new/path.rs ← old/path.rs` for renames.
fn file_line(file: &FileChange, theme: &Theme) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("{} ", file.status.letter()),
            Style::default().fg(theme.file_status(file.status)),
        ),
        Span::raw(file.path.clone()),
    ];
    if let Some(old) = &file.old_path {
        spans.push(Span::styled(format!(" ← {old}"), Style::default().fg(theme.placeholder)));
    }
    Line::from(spans)
}
