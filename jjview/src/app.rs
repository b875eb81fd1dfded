//! Central application state for jjview.
//!
//! This module owns all mutable UI state: the mode, which panel has focus,
//! the three listings, the preview and its hunk viewport, the file list, the
//! refresh bookkeeping and the status line. No ratatui rendering logic lives
//! here; the render module reads it and the keybinding dispatcher and jj
//! results mutate it, always on the event loop task.

use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use jjview_core::{DiffLayout, Entity, FileChange, Hunk, ListPanel, Viewport};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::jj::types::{JjPayload, JjRequest, ListSource, PreviewTarget, RequestKind};

/// Lines the preview panel draws above the jj output.
pub const PREVIEW_HEADER_LINES: usize = 1;

const STATUS_TTL: Duration = Duration::from_secs(5);
const ERROR_TTL: Duration = Duration::from_secs(10);

/// Mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
}

/// Which panel currently has keyboard focus.
///
/// Navigation cycles List → Preview → Files → List via `next()` and in
/// reverse via `prev()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel: revisions, operations or evolution.
    #[default]
    List,
    /// Centre panel: the preview of the selected entity.
    Preview,
    /// Right panel: files touched by the selected change.
    Files,
}

impl PanelFocus {
    pub fn prev(self) -> Self {
        match self {
            PanelFocus::List => PanelFocus::Files,
            PanelFocus::Preview => PanelFocus::List,
            PanelFocus::Files => PanelFocus::Preview,
        }
    }

    pub fn next(self) -> Self {
        match self {
            PanelFocus::List => PanelFocus::Preview,
            PanelFocus::Preview => PanelFocus::Files,
            PanelFocus::Files => PanelFocus::List,
        }
    }
}

/// One left-panel listing and the raw lines it was parsed from.
#[derive(Debug, Default)]
pub struct Listing {
    pub panel: ListPanel<Entity>,
    pub lines: Vec<String>,
    /// Set once the first successful load has been applied.
    pub loaded: bool,
}

/// Centre panel content.
#[derive(Debug, Default)]
pub struct Preview {
    /// What the current selection wants previewed.
    pub target: Option<PreviewTarget>,
    /// What `lines` actually belong to.
    pub shown: Option<PreviewTarget>,
    pub lines: Vec<String>,
    pub hunks: Vec<Hunk>,
    pub viewport: Viewport,
    pub loading: bool,
}

impl Preview {
    pub fn layout(&self) -> DiffLayout<'_> {
        DiffLayout::new(&self.hunks, self.lines.len(), PREVIEW_HEADER_LINES)
    }

    fn clear(&mut self) {
        *self = Preview::default();
    }
}

/// Right panel content.
#[derive(Debug, Default)]
pub struct FilePanel {
    /// Revision the current selection wants listed.
    pub revision: Option<String>,
    /// Revision the panel content belongs to.
    pub shown: Option<String>,
    pub panel: ListPanel<FileChange>,
    pub loading: bool,
}

/// A transient line in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    /// `None` keeps the message until it is replaced.
    pub expires: Option<Instant>,
}

/// Serializes listing refreshes: at most one in flight, at most one queued.
#[derive(Debug, Default, Clone, Copy)]
struct RefreshState {
    in_flight: bool,
    pending: bool,
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    pub mode: Mode,
    pub focus: PanelFocus,
    pub source: ListSource,
    /// Indexed by [`ListSource::index`].
    pub listings: [Listing; 3],
    /// Change whose evolution the Evolution listing shows.
    pub evolog_of: Option<String>,
    pub preview: Preview,
    pub files: FilePanel,

    /// Inner heights of the panels after borders, cached after each render.
    pub list_viewport_height: u16,
    pub preview_viewport_height: u16,
    pub files_viewport_height: u16,
    /// Outer rects of the three panels from the last render, for mouse hits.
    pub panel_rects: [Rect; 3],

    /// Width percentages of the left / centre / right panels.
    pub left_pct: u16,
    pub center_pct: u16,
    pub right_pct: u16,

    pub help_scroll: u16,
    pub status: Option<StatusMessage>,
    /// Whether the filesystem watcher is running.
    pub watching: bool,
    pub revset: Option<String>,
    /// Lines or items moved per mouse wheel tick.
    pub scroll_lines: u16,

    /// Request channel to the jj worker thread.
    pub jj_tx: Option<Sender<JjRequest>>,
    refresh: RefreshState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(None, 3, None)
    }
}

impl AppState {
    pub fn new(revset: Option<String>, scroll_lines: u16, jj_tx: Option<Sender<JjRequest>>) -> Self {
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            source: ListSource::default(),
            listings: Default::default(),
            evolog_of: None,
            preview: Preview::default(),
            files: FilePanel::default(),
            list_viewport_height: 0,
            preview_viewport_height: 0,
            files_viewport_height: 0,
            panel_rects: [Rect::default(); 3],
            left_pct: 30,
            center_pct: 50,
            right_pct: 20,
            help_scroll: 0,
            status: None,
            watching: false,
            revset,
            scroll_lines,
            jj_tx,
            refresh: RefreshState::default(),
        }
    }

    /// The listing shown in the left panel.
    pub fn listing(&self) -> &Listing {
        &self.listings[self.source.index()]
    }

    fn listing_mut(&mut self) -> &mut Listing {
        &mut self.listings[self.source.index()]
    }

    /// True while a listing refresh is waiting on jj.
    pub fn is_refreshing(&self) -> bool {
        self.refresh.in_flight
    }

    // -----------------------------------------------------------------------
    // Requests and results
    // -----------------------------------------------------------------------

    fn send(&self, request: JjRequest) -> bool {
        let Some(tx) = &self.jj_tx else {
            return false;
        };
        match tx.send(request) {
            Ok(()) => true,
            Err(err) => {
                warn!(request = ?err.0, "jj worker is gone");
                false
            }
        }
    }

    /// Reloads the current listing, or queues one reload if a refresh is
    /// already running.
    pub fn request_refresh(&mut self) {
        if self.refresh.in_flight {
            self.refresh.pending = true;
            return;
        }
        let request =
            JjRequest::for_list(self.source, self.revset.as_deref(), self.evolog_of.as_deref());
        let Some(request) = request else {
            return;
        };
        if self.send(request) {
            self.refresh.in_flight = true;
        }
    }

    fn finish_refresh(&mut self) {
        self.refresh.in_flight = false;
        if std::mem::take(&mut self.refresh.pending) {
            self.request_refresh();
        }
    }

    /// Applies a result from the jj worker.
    ///
    /// Listings are reconciled by entity identity; an evolution listing for
    /// a change other than `evolog_of`, and preview and file results for a
    /// target that is no longer selected, are dropped. A failure keeps
    /// the previous content and shows the error in the status bar.
    pub fn apply_jj_result(&mut self, payload: JjPayload) {
        match payload {
            JjPayload::List { source, revision, lines, assembled } => {
                if source == ListSource::Evolution && revision != self.evolog_of {
                    debug!(?revision, "discarding stale evolution listing");
                    self.finish_refresh();
                    return;
                }
                let height = self.list_viewport_height as usize;
                let listing = &mut self.listings[source.index()];
                let outcome = listing.panel.refresh_assembled(assembled, height);
                listing.lines = lines;
                listing.loaded = true;
                debug!(?source, entities = listing.panel.items().len(), ?outcome, "listing refreshed");
                if source == self.source {
                    self.sync_detail(true);
                }
                self.finish_refresh();
            }
            JjPayload::Preview { target, lines, hunks } => {
                if self.preview.target.as_ref() != Some(&target) {
                    debug!(target = target.label(), "discarding stale preview");
                    return;
                }
                let same_target = self.preview.shown.as_ref() == Some(&target);
                self.preview.lines = lines;
                self.preview.hunks = hunks;
                self.preview.loading = false;
                let layout = self.preview.layout();
                self.preview.viewport = if same_target {
                    self.preview.viewport.resync(&layout)
                } else {
                    Viewport::top(&layout)
                };
                self.preview.shown = Some(target);
            }
            JjPayload::Files { revision, files } => {
                if self.files.revision.as_deref() != Some(revision.as_str()) {
                    debug!(%revision, "discarding stale file list");
                    return;
                }
                let height = self.files_viewport_height as usize;
                self.files.panel.refresh_lines(files, height);
                self.files.loading = false;
                self.files.shown = Some(revision);
            }
            JjPayload::Failed { kind, message } => {
                match kind {
                    RequestKind::List(_) => self.finish_refresh(),
                    RequestKind::Preview => self.preview.loading = false,
                    RequestKind::Files => self.files.loading = false,
                }
                let first_line = message.lines().next().unwrap_or("jj failed").to_owned();
                self.set_error(first_line);
            }
        }
    }

    /// Points the preview and file panels at the selected entity, requesting
    /// fresh content when the target changed or `force` is set.
    fn sync_detail(&mut self, force: bool) {
        let (target, revision) = match self.listing().panel.selected() {
            None => (None, None),
            Some(entity) if entity.is_operation() => {
                (Some(PreviewTarget::Operation(entity.id.clone())), None)
            }
            Some(entity) => {
                let revision = entity.revision().to_owned();
                (Some(PreviewTarget::Change(revision.clone())), Some(revision))
            }
        };

        if force || target != self.preview.target {
            match target {
                Some(target) => {
                    self.preview.target = Some(target.clone());
                    self.preview.loading = self.send(JjRequest::LoadPreview(target));
                }
                None => self.preview.clear(),
            }
        }

        if force || revision != self.files.revision {
            match revision {
                Some(revision) => {
                    self.files.revision = Some(revision.clone());
                    self.files.loading = self.send(JjRequest::LoadFiles { revision });
                }
                None => self.files = FilePanel::default(),
            }
        }
    }

    /// Switches the left panel to `source` and reloads it.
    ///
    /// Evolution lists the history of the change selected under Revisions.
    pub fn switch_source(&mut self, source: ListSource) {
        if source == ListSource::Evolution {
            let change = self.listings[ListSource::Revisions.index()]
                .panel
                .selected()
                .filter(|entity| !entity.is_operation())
                .map(|entity| entity.id.clone());
            let Some(change) = change else {
                self.set_error("select a revision to see its evolution".to_owned());
                return;
            };
            if self.evolog_of.as_deref() != Some(change.as_str()) {
                self.listings[ListSource::Evolution.index()] = Listing::default();
            }
            self.evolog_of = Some(change);
        }
        self.source = source;
        self.focus = PanelFocus::List;
        self.sync_detail(false);
        self.request_refresh();
    }

    // -----------------------------------------------------------------------
    // Status line
    // -----------------------------------------------------------------------

    pub fn set_status(&mut self, text: String) {
        self.status =
            Some(StatusMessage { text, is_error: false, expires: Some(Instant::now() + STATUS_TTL) });
    }

    pub fn set_error(&mut self, text: String) {
        self.status =
            Some(StatusMessage { text, is_error: true, expires: Some(Instant::now() + ERROR_TTL) });
    }

    /// Shows `text` as an error until something replaces it.
    pub fn set_sticky_error(&mut self, text: String) {
        self.status = Some(StatusMessage { text, is_error: true, expires: None });
    }

    /// Logic tick: drops an expired status message.
    pub fn on_tick(&mut self, now: Instant) {
        if self.status.as_ref().and_then(|s| s.expires).is_some_and(|at| at <= now) {
            self.status = None;
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Moves the focused panel by `delta` items (lists) or lines (preview).
    pub fn move_by(&mut self, delta: isize) {
        match self.focus {
            PanelFocus::List => {
                let height = self.list_viewport_height as usize;
                self.listing_mut().panel.move_cursor(delta, height);
                self.sync_detail(false);
            }
            PanelFocus::Preview => self.scroll_preview(delta),
            PanelFocus::Files => {
                let height = self.files_viewport_height as usize;
                self.files.panel.move_cursor(delta, height);
            }
        }
    }

    pub fn goto_top(&mut self) {
        match self.focus {
            PanelFocus::List => {
                self.listing_mut().panel.goto_top();
                self.sync_detail(false);
            }
            PanelFocus::Preview => {
                self.preview.viewport = Viewport::top(&self.preview.layout());
            }
            PanelFocus::Files => self.files.panel.goto_top(),
        }
    }

    pub fn goto_bottom(&mut self) {
        match self.focus {
            PanelFocus::List => {
                let height = self.list_viewport_height as usize;
                self.listing_mut().panel.goto_bottom(height);
                self.sync_detail(false);
            }
            PanelFocus::Preview => {
                self.preview.viewport = Viewport::bottom(&self.preview.layout());
            }
            PanelFocus::Files => {
                let height = self.files_viewport_height as usize;
                self.files.panel.goto_bottom(height);
            }
        }
    }

    /// Scrolls the preview by `delta` lines regardless of focus.
    pub fn scroll_preview(&mut self, delta: isize) {
        self.preview.viewport = self.preview.viewport.scroll_by(delta, &self.preview.layout());
    }

    /// Scrolls the preview by half its visible height.
    ///
    /// Uses the height cached from the previous render and moves at least
    /// one line on the first frame.
    pub fn half_page(&mut self, down: bool) {
        let half = (self.preview_viewport_height / 2).max(1) as isize;
        self.scroll_preview(if down { half } else { -half });
    }

    /// Jumps the preview to the next section ([`Viewport::next_hunk`]).
    pub fn next_hunk(&mut self) {
        self.preview.viewport = self.preview.viewport.next_hunk(&self.preview.layout());
    }

    /// Jumps the preview to the start of this or the previous section.
    pub fn prev_hunk(&mut self) {
        self.preview.viewport = self.preview.viewport.prev_hunk(&self.preview.layout());
    }

    /// One mouse wheel tick on the focused panel.
    pub fn wheel(&mut self, down: bool) {
        let step = self.scroll_lines.max(1) as isize;
        self.move_by(if down { step } else { -step });
    }

    /// Selects the listing row at `row` lines below the top of the list
    /// panel's content area, e.g. from a mouse click.
    pub fn click_list_row(&mut self, row: usize) {
        let height = self.list_viewport_height as usize;
        let panel = &mut self.listing_mut().panel;
        let line = panel.scroll() + row;
        if line < panel.line_count() {
            panel.select_line(line, height);
            self.sync_detail(false);
        }
    }

    /// Selects the file at `row` rows below the top of the files panel.
    pub fn click_file_row(&mut self, row: usize) {
        let height = self.files_viewport_height as usize;
        let panel = &mut self.files.panel;
        let line = panel.scroll() + row;
        if line < panel.line_count() {
            panel.select_line(line, height);
        }
    }

    /// Scrolls the preview to the section of the selected file and focuses it.
    pub fn jump_to_selected_file(&mut self) {
        let Some(path) = self.files.panel.selected().map(|f| f.path.clone()) else {
            return;
        };
        if self.files.shown.is_none()
            || self.preview.shown.as_ref().map(PreviewTarget::label) != self.files.shown.as_deref()
        {
            self.set_status("preview is still loading".to_owned());
            return;
        }
        let hunks = &self.preview.hunks;
        let found = hunks
            .iter()
            .position(|h| h.path() == Some(path.as_str()))
            .or_else(|| hunks.iter().position(|h| h.path().is_some_and(|p| p.contains(&path))));
        match found {
            Some(index) => {
                let scroll = hunks[index].start + PREVIEW_HEADER_LINES;
                self.preview.viewport = Viewport::at(scroll, &self.preview.layout());
                self.focus = PanelFocus::Preview;
            }
            None => self.set_status(format!("no section for {path} in the preview")),
        }
    }

    // -----------------------------------------------------------------------
    // Panel geometry
    // -----------------------------------------------------------------------

    /// Shrinks the preview panel by transferring 5% to the side panels.
    ///
    /// The centre panel will not shrink below 20%.
    pub fn shrink_preview_panel(&mut self) {
        const MIN_CENTER: u16 = 20;
        const STEP: u16 = 5;
        if self.center_pct <= MIN_CENTER {
            return;
        }
        let transfer = STEP.min(self.center_pct - MIN_CENTER);
        self.center_pct -= transfer;
        let left_gain = transfer / 2;
        let right_gain = transfer - left_gain;
        self.left_pct = self.left_pct.saturating_add(left_gain);
        self.right_pct = self.right_pct.saturating_add(right_gain);
    }

    /// Grows the preview panel by pulling up to 5% from the side panels.
    ///
    /// The centre panel will not grow above 80% and side panels keep 5%.
    pub fn grow_preview_panel(&mut self) {
        const MAX_CENTER: u16 = 80;
        const MIN_SIDE: u16 = 5;
        const STEP: u16 = 5;
        if self.center_pct >= MAX_CENTER {
            return;
        }
        let transfer = STEP.min(MAX_CENTER - self.center_pct);
        let left_give = (transfer / 2).min(self.left_pct.saturating_sub(MIN_SIDE));
        let right_give = (transfer - transfer / 2).min(self.right_pct.saturating_sub(MIN_SIDE));
        self.left_pct -= left_give;
        self.right_pct -= right_give;
        self.center_pct += left_give + right_give;
    }
}
