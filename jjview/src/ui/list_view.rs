//! Left panel renderer: the revisions, operations or evolution listing.
//!
//! jj's own coloured lines are shown as they are. Only the window
//! `[scroll, scroll + height)` is converted per frame, and the lines of the
//! selected entity get the theme's selection background.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{List, ListItem},
};

use crate::app::{AppState, PanelFocus};
use crate::jj::types::ListSource;
use crate::theme::Theme;
use crate::ui::ansi_text::to_line;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the listing panel.
///
/// # Arguments
///
/// * `frame` - current render frame
/// * `area` - the `Rect` for the left panel (includes borders)
/// * `state` - read-only app state supplying the active listing
/// * `theme` - active color theme
pub fn render_list(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let listing = state.listing();
    let count = listing.panel.items().len();
    let title = match (state.source, state.evolog_of.as_deref()) {
        (ListSource::Evolution, Some(change)) => format!("Evolution of {change} ({count})"),
        (source, _) if count > 0 => format!("{} ({count})", source.title()),
        (source, _) => source.title().to_owned(),
    };
    let block = panel_block(title, state.focus == PanelFocus::List, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if listing.lines.is_empty() {
        let msg = if state.is_refreshing() || !listing.loaded {
            "Loading…"
        } else {
            "Nothing to show"
        };
        let placeholder = Line::styled(msg, Style::default().fg(theme.placeholder));
        frame.render_widget(List::new([ListItem::new(placeholder)]), inner);
        return;
    }

    let selected = listing.panel.selected_span().unwrap_or(0..0);
    let start = listing.panel.scroll().min(listing.lines.len().saturating_sub(1));
    let end = (start + inner.height as usize).min(listing.lines.len());

    let items: Vec<ListItem> = (start..end)
        .map(|i| {
            let line = to_line(&listing.lines[i]);
            let line = if selected.contains(&i) {
                line.style(Style::default().bg(theme.selection_bg))
            } else {
                line
            };
            ListItem::new(line)
        })
        .collect();
    frame.render_widget(List::new(items), inner);
}
