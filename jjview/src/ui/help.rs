//! Help overlay renderer for jjview.
//!
//! Draws a centred modal over the panels inside the same `terminal.draw()`
//! closure, erasing the background with ratatui's `Clear` widget first.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal on top of the panels.
///
/// The keybinding list scrolls by `help_scroll` rows so it stays reachable on
/// short terminals. Skipped below 40 columns, where the modal would be too
/// narrow to read.
///
/// # Arguments
///
/// * `frame` - current render frame provided by `terminal.draw()`
/// * `theme` - active color theme (supplies `border_active` for the modal border)
/// * `help_scroll` - vertical scroll offset, driven by j/k while the overlay is open
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help: j/k scroll, ? or Esc to dismiss ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    let help_text = build_help_text();

    frame.render_widget(
        Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

/// Keybinding reference, grouped by panel.
fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Navigation"),
        Line::from("  j / k         Move down / up in the focused panel"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll the preview half a page down / up"),
        Line::from("  Tab / L       Focus the next panel"),
        Line::from("  Shift-Tab / H Focus the previous panel"),
        Line::from(""),
        Line::from("Listing"),
        Line::from("  1             Revisions (jj log)"),
        Line::from("  2             Operations (jj op log)"),
        Line::from("  3             Evolution of the selected revision (jj evolog)"),
        Line::from("  R             Refresh now"),
        Line::from(""),
        Line::from("Preview"),
        Line::from("  [ / ]         Start of this or previous section / next section"),
        Line::from("  < / >         Shrink / grow the preview panel"),
        Line::from(""),
        Line::from("Files"),
        Line::from("  Enter         Show the selected file in the preview"),
        Line::from(""),
        Line::from("General"),
        Line::from("  mouse         Click to focus and select, wheel to scroll"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit"),
    ])
}
