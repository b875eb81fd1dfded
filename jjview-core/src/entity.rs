//! Structured records recovered from jj's log-style listings.

/// Graph node glyph printed in front of a change or operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    /// `@`: the working-copy commit, or the current operation.
    WorkingCopy,
    /// `◆`: an immutable commit.
    Immutable,
    /// `×`: a commit with conflicts.
    Conflicted,
    /// `◌`: a hidden commit (evolution log predecessors).
    Hidden,
    /// `○` and anything else.
    #[default]
    Normal,
}

impl Marker {
    /// Maps a graph glyph to its marker.
    pub fn from_glyph(glyph: char) -> Self {
        match glyph {
            '@' => Marker::WorkingCopy,
            '◆' | '◇' => Marker::Immutable,
            '×' => Marker::Conflicted,
            '◌' => Marker::Hidden,
            _ => Marker::Normal,
        }
    }
}

/// Kind-specific fields of an [`Entity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityDetail {
    /// A change in `jj log` or `jj evolog` output.
    Change {
        /// Historical version from a `<id>/<n>` suffix.
        version: Option<u32>,
        marker: Marker,
    },
    /// An operation in `jj op log` output.
    Operation {
        /// The command line that created the operation, from its `args:` line.
        args: String,
        /// True for the operation the repo currently points at.
        current: bool,
    },
}

/// One entry-start line plus its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Short change id (reverse-hex alphabet) or 12-digit operation id.
    pub id: String,
    /// The identity token as printed: `id`, or `id/version` for historical
    /// versions. This is the selection key, since an evolution log lists
    /// the same change id once per version.
    pub token: String,
    /// Continuation text, whitespace-normalized and joined with single spaces.
    pub description: String,
    /// The original lines, colour codes intact, joined with `\n`.
    pub raw: String,
    pub detail: EntityDetail,
}

impl Entity {
    /// Operation command line, `None` for changes.
    pub fn args(&self) -> Option<&str> {
        match &self.detail {
            EntityDetail::Operation { args, .. } => Some(args),
            EntityDetail::Change { .. } => None,
        }
    }

    /// Evolution version, `None` for operations and current changes.
    pub fn version(&self) -> Option<u32> {
        match self.detail {
            EntityDetail::Change { version, .. } => version,
            EntityDetail::Operation { .. } => None,
        }
    }

    pub fn is_operation(&self) -> bool {
        matches!(self.detail, EntityDetail::Operation { .. })
    }

    /// True for the working-copy change or the current operation.
    pub fn is_current(&self) -> bool {
        match self.detail {
            EntityDetail::Change { marker, .. } => marker == Marker::WorkingCopy,
            EntityDetail::Operation { current, .. } => current,
        }
    }

    /// Revision argument that names exactly this entity for follow-up jj
    /// commands.
    pub fn revision(&self) -> &str {
        &self.token
    }
}
