//! Responsive 3-panel layout engine for jjview.
//!
//! Pure layout arithmetic plus the shared panel chrome; no mutable
//! application state lives here. Called inside `terminal.draw()` on every
//! render so every frame reflects the current terminal size.
//!
//! # Panel geometry
//!
//! At `>= 120` columns all three panels are visible with widths driven by
//! `AppState.left_pct / center_pct / right_pct`. Between 80 and 119 columns
//! the files panel collapses. Below 80 columns only the focused one of list
//! and preview is shown.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single column.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::jj::types::ListSource;
use crate::theme::Theme;

/// Returns `[left, center, right, status_bar]` panel `Rect`s for the current frame.
///
/// # Responsive behaviour
///
/// | Terminal width | Layout |
/// |----------------|--------|
/// | `< 80` cols    | List or preview alone, whichever has focus |
/// | `80..120` cols | List and preview; files collapsed |
/// | `>= 120` cols  | 3-panel split using the state's percentages |
///
/// # Arguments
///
/// * `frame` - current render frame (provides `frame.area()` with live terminal size)
/// * `state` - read-only app state supplying panel width percentages and focus
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 4] {
    let term_width = frame.area().width;

    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let constraints = if term_width >= 120 {
        [
            Constraint::Percentage(state.left_pct),
            Constraint::Percentage(state.center_pct),
            Constraint::Percentage(state.right_pct),
        ]
    } else if term_width >= 80 {
        [
            Constraint::Percentage(state.left_pct + state.right_pct / 2),
            Constraint::Fill(1),
            Constraint::Length(0),
        ]
    } else if state.focus == PanelFocus::List {
        [Constraint::Fill(1), Constraint::Length(0), Constraint::Length(0)]
    } else {
        [Constraint::Length(0), Constraint::Fill(1), Constraint::Length(0)]
    };

    let spacing = if term_width >= 80 { Spacing::Overlap(1) } else { Spacing::Space(0) };
    let horizontal = Layout::horizontal(constraints).spacing(spacing);
    let [left, center, right] = main_area.layout(&horizontal);

    [left, center, right, status_bar]
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on each side.
///
/// # Arguments
///
/// * `area` - the outer `Rect` of the panel (including borders)
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// Focused panels get `BorderType::Thick`, others `BorderType::Plain`.
/// `MergeStrategy::Fuzzy` is required because `Exact` produces incorrect
/// junctions when mixing `Thick` and `Plain` borders.
///
/// # Arguments
///
/// * `title` - panel title shown in the top border
/// * `is_focused` - `true` when this panel has keyboard focus
/// * `theme` - active color theme (supplies `border_active` / `border_inactive`)
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Left to right: list source tabs, refresh and watch indicators, then the
/// current status message if any. Never renders blank.
///
/// # Arguments
///
/// * `frame` - current render frame
/// * `area` - the 1-row `Rect` returned by `compute_layout` (index 3)
/// * `state` - read-only app state
/// * `theme` - active color theme
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let mut spans: Vec<Span> = Vec::new();

    for (n, source) in ListSource::ALL.into_iter().enumerate() {
        let label = format!(" {} {} ", n + 1, source.title());
        let style = if source == state.source {
            Style::default().fg(theme.status_tab_active).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(label, style));
    }

    spans.push(Span::raw(" │ "));
    if state.is_refreshing() {
        spans.push(Span::raw("refreshing… "));
    }
    spans.push(Span::raw(if state.watching { "watching" } else { "manual refresh (R)" }));
    if state.mode == Mode::HelpOverlay {
        spans.push(Span::raw(" │ help"));
    }

    if let Some(status) = &state.status {
        spans.push(Span::raw(" │ "));
        let style = if status.is_error {
            Style::default().fg(theme.status_warning).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(status.text.clone(), style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
