//! Parsing and navigation core for jjview.
//!
//! jj exposes no structured API to a front-end, only coloured text. This
//! crate turns that text into entities and diff sections, and keeps the
//! cursor and scroll position meaningful while the text is regenerated
//! underneath them. Everything here is synchronous and free of I/O.

pub mod ansi;
pub mod assemble;
pub mod classify;
pub mod entity;
pub mod files;
pub mod hunk;
pub mod panel;
pub mod selection;
pub mod viewport;

pub use assemble::{assemble, Assembled};
pub use classify::{classify, classify_decorated, EntryKind, Grammar};
pub use entity::{Entity, EntityDetail, Marker};
pub use files::{parse_summary, FileChange, FileStatus};
pub use hunk::{segment, Hunk, HunkKind};
pub use panel::ListPanel;
pub use selection::{reconcile, Keyed, Reconciled, Selection};
pub use viewport::{DiffLayout, ListViewport, Viewport};
