//! Keybinding dispatcher for jjview.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` telling the event loop whether to continue or quit. The
//! dispatcher branches first on `state.mode` so the help overlay and Normal
//! mode have isolated handler functions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};
use crate::jj::types::ListSource;
use crate::ui::layout::inner_rect;

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// # Arguments
///
/// * `key` - the raw crossterm key event (code + modifiers)
/// * `state` - mutable reference to all UI state
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

/// Handles a key event while in Normal mode.
///
/// Movement keys go through `handle_movement_key`; focus, list source,
/// section navigation and mode transitions are handled inline.
fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_movement_key(key, state) {
        return action;
    }

    match key.code {
        // Panel focus
        KeyCode::Tab | KeyCode::Char('L') => state.focus = state.focus.next(),
        KeyCode::BackTab | KeyCode::Char('H') => state.focus = state.focus.prev(),

        // List source
        KeyCode::Char('1') => state.switch_source(ListSource::Revisions),
        KeyCode::Char('2') => state.switch_source(ListSource::Operations),
        KeyCode::Char('3') => state.switch_source(ListSource::Evolution),
        KeyCode::Char('R') => state.request_refresh(),

        // Preview sections
        KeyCode::Char('[') => state.prev_hunk(),
        KeyCode::Char(']') => state.next_hunk(),
        KeyCode::Enter if state.focus == PanelFocus::Files => state.jump_to_selected_file(),

        // Preview panel width
        KeyCode::Char('<') => state.shrink_preview_panel(),
        KeyCode::Char('>') => state.grow_preview_panel(),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit;
        }

        _ => {}
    }
    KeyAction::Continue
}

/// Handles j / k / g / G / arrows and the Ctrl half-page keys.
///
/// Returns `Some(KeyAction)` when the key was consumed, `None` when it
/// should fall through to the rest of the Normal handler.
fn handle_movement_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.move_by(1),
        KeyCode::Char('k') | KeyCode::Up => state.move_by(-1),
        KeyCode::Char('g') | KeyCode::Home => state.goto_top(),
        KeyCode::Char('G') | KeyCode::End => state.goto_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page(true),
        KeyCode::Char('u') if ctrl => state.half_page(false),
        KeyCode::PageDown => state.half_page(true),
        KeyCode::PageUp => state.half_page(false),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// Handles a key event while the help overlay is visible.
///
/// j/k/g/G scroll the overlay; `?`, `Esc` or `q` dismiss it. Everything
/// else is ignored.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: click-to-focus-and-select and scroll-wheel.
///
/// A left click focuses the panel under the pointer and, in the list and
/// file panels, selects the row under it. The wheel scrolls the focused
/// panel by `state.scroll_lines`, or the help overlay while it is open.
///
/// # Arguments
///
/// * `mouse` - the crossterm mouse event
/// * `state` - mutable reference to all UI state
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if state.mode == Mode::Normal => {
            handle_mouse_click(mouse.column, mouse.row, state);
        }
        MouseEventKind::ScrollUp => handle_wheel(state, false),
        MouseEventKind::ScrollDown => handle_wheel(state, true),
        _ => {}
    }
    KeyAction::Continue
}

/// Focuses the panel at the clicked position and selects the clicked row.
///
/// Panels with zero width are skipped so collapsed panels cannot receive
/// focus via click.
fn handle_mouse_click(col: u16, row: u16, state: &mut AppState) {
    let pos = Position { x: col, y: row };
    let [left, center, right] = state.panel_rects;

    if left.width > 0 && left.contains(pos) {
        state.focus = PanelFocus::List;
        if let Some(offset) = row_in(left, pos) {
            state.click_list_row(offset);
        }
    } else if center.contains(pos) {
        state.focus = PanelFocus::Preview;
    } else if right.width > 0 && right.contains(pos) {
        state.focus = PanelFocus::Files;
        if let Some(offset) = row_in(right, pos) {
            state.click_file_row(offset);
        }
    }
}

/// Row offset of `pos` inside the bordered `area`, if it hit the content.
fn row_in(area: ratatui::layout::Rect, pos: Position) -> Option<usize> {
    let inner = inner_rect(area);
    inner.contains(pos).then(|| (pos.y - inner.y) as usize)
}

fn handle_wheel(state: &mut AppState, down: bool) {
    if state.mode == Mode::HelpOverlay {
        let step = state.scroll_lines;
        state.help_scroll = if down {
            state.help_scroll.saturating_add(step)
        } else {
            state.help_scroll.saturating_sub(step)
        };
    } else {
        state.wheel(down);
    }
}
