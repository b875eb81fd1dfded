//! UI rendering module for jjview.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each
//! panel has its own renderer module.

pub mod ansi_text;
pub mod file_list;
pub mod help;
pub mod keybindings;
pub mod layout;
pub mod list_view;
pub mod preview;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: the three panels, the status bar and, when
/// open, the help overlay.
///
/// Viewport heights and panel rects are written back into `state` so that
/// scroll and click handling for the *next* event use the current geometry.
///
/// # Arguments
///
/// * `frame` - current render frame provided by `terminal.draw()`
/// * `state` - mutable reference to app state (geometry is cached here)
/// * `theme` - active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [left, center, right, status_bar] = compute_layout(frame, state);

    state.list_viewport_height = inner_rect(left).height;
    state.preview_viewport_height = inner_rect(center).height;
    state.files_viewport_height = inner_rect(right).height;
    state.panel_rects = [left, center, right];

    if left.width > 0 {
        list_view::render_list(frame, left, state, theme);
    }
    if center.width > 0 {
        preview::render_preview(frame, center, state, theme);
    }
    if right.width > 0 {
        file_list::render_file_list(frame, right, state, theme);
    }

    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}

#[cfg(test)]
mod tests {
    use jjview_core::assemble;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::jj::types::{JjPayload, ListSource};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_listing_and_caches_geometry() {
        let blob = "@  qpvuntsm alice 2024-05-01 3f1c2a9e\n│  \x1b[1mfix the parser\x1b[0m";
        let mut state = AppState::default();
        state.apply_jj_result(JjPayload::List {
            source: ListSource::Revisions,
            revision: None,
            lines: blob.lines().map(str::to_owned).collect(),
            assembled: assemble(blob, ListSource::Revisions.grammar()),
        });

        let mut terminal = Terminal::new(TestBackend::new(140, 20)).expect("test terminal");
        let theme = Theme::dark();
        terminal.draw(|frame| render(frame, &mut state, &theme)).expect("draw");

        let text = screen(&terminal);
        assert!(text.contains("Revisions (1)"));
        assert!(text.contains("qpvuntsm alice"));
        assert!(text.contains("fix the parser"));
        assert!(!text.contains("\u{1b}"));
        assert!(text.contains("1 Revisions"));
        assert_eq!(state.list_viewport_height, 17);
        assert!(state.panel_rects[2].width > 0);
    }

    #[test]
    fn narrow_terminal_shows_only_the_focused_panel() {
        let mut state = AppState::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).expect("test terminal");
        let theme = Theme::dark();
        terminal.draw(|frame| render(frame, &mut state, &theme)).expect("draw");
        assert_eq!(state.panel_rects[1].width, 0);
        assert_eq!(state.panel_rects[2].width, 0);
        assert!(screen(&terminal).contains("Revisions"));
    }
}
