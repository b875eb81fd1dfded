//! Owned request and result types exchanged with the jj worker thread.
//!
//! Everything here is fully owned and `Send` so it can move between the
//! worker thread and the UI loop without borrowing from either side.

use jjview_core::{Assembled, FileChange, Grammar, Hunk};

/// The listing shown in the left panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListSource {
    /// `jj log`, one entity per change.
    #[default]
    Revisions,
    /// `jj op log`, one entity per operation.
    Operations,
    /// `jj evolog`, the recorded versions of a single change.
    Evolution,
}

impl ListSource {
    pub const ALL: [ListSource; 3] =
        [ListSource::Revisions, ListSource::Operations, ListSource::Evolution];

    /// Position of this source in [`ListSource::ALL`].
    pub fn index(self) -> usize {
        match self {
            ListSource::Revisions => 0,
            ListSource::Operations => 1,
            ListSource::Evolution => 2,
        }
    }

    /// The entry grammar the listing is parsed with.
    pub fn grammar(self) -> Grammar {
        match self {
            ListSource::Revisions | ListSource::Evolution => Grammar::ChangeLog,
            ListSource::Operations => Grammar::OperationLog,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ListSource::Revisions => "Revisions",
            ListSource::Operations => "Operations",
            ListSource::Evolution => "Evolution",
        }
    }
}

/// What the centre panel is previewing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewTarget {
    /// A change or one recorded version of it, by revision string.
    Change(String),
    /// An operation, by operation id.
    Operation(String),
}

impl PreviewTarget {
    /// The id or revision the preview was requested for.
    pub fn label(&self) -> &str {
        match self {
            PreviewTarget::Change(rev) | PreviewTarget::Operation(rev) => rev,
        }
    }
}

/// Commands sent from the UI loop to the jj worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JjRequest {
    /// Load `jj log`, optionally restricted to a revset.
    LoadLog { revset: Option<String> },
    /// Load `jj op log`.
    LoadOpLog,
    /// Load `jj evolog` for one change.
    LoadEvolog { revision: String },
    /// Load the full preview of a change or operation.
    LoadPreview(PreviewTarget),
    /// Load `jj diff --summary` for one revision.
    LoadFiles { revision: String },
}

impl JjRequest {
    /// The listing request for `source`. `Evolution` needs the change whose
    /// history should be listed; `None` when there is no such change.
    pub fn for_list(
        source: ListSource,
        revset: Option<&str>,
        change: Option<&str>,
    ) -> Option<Self> {
        match source {
            ListSource::Revisions => {
                Some(JjRequest::LoadLog { revset: revset.map(str::to_owned) })
            }
            ListSource::Operations => Some(JjRequest::LoadOpLog),
            ListSource::Evolution => {
                change.map(|revision| JjRequest::LoadEvolog { revision: revision.to_owned() })
            }
        }
    }

    /// The kind of result this request produces.
    pub fn kind(&self) -> RequestKind {
        match self {
            JjRequest::LoadLog { .. } => RequestKind::List(ListSource::Revisions),
            JjRequest::LoadOpLog => RequestKind::List(ListSource::Operations),
            JjRequest::LoadEvolog { .. } => RequestKind::List(ListSource::Evolution),
            JjRequest::LoadPreview(_) => RequestKind::Preview,
            JjRequest::LoadFiles { .. } => RequestKind::Files,
        }
    }
}

/// Coarse classification of a request, used to route failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    List(ListSource),
    Preview,
    Files,
}

/// Results sent from the worker thread back to the UI loop via
/// `AppEvent::JjResult`.
#[derive(Debug)]
pub enum JjPayload {
    /// A freshly assembled listing for the left panel.
    List {
        source: ListSource,
        /// The change an `Evolution` listing belongs to; `None` otherwise.
        revision: Option<String>,
        /// Raw coloured lines, indexed by `assembled.starts`.
        lines: Vec<String>,
        assembled: Assembled,
    },
    /// Preview text for the centre panel plus its section boundaries.
    Preview { target: PreviewTarget, lines: Vec<String>, hunks: Vec<Hunk> },
    /// The changed-file summary of one revision.
    Files { revision: String, files: Vec<FileChange> },
    /// A jj invocation failed; the UI keeps whatever it showed before.
    Failed { kind: RequestKind, message: String },
}
