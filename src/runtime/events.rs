//! Runtime event stream payloads.

use crate::{
    op::{CartChange, CartSnapshot},
    types::Revision,
};

/// Events emitted from the single-writer cart loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A mutation was applied; views re-render from `snapshot`.
    Changed {
        /// Revision after the mutation.
        revision: Revision,
        /// What changed.
        change: CartChange,
        /// Full cart contents after the mutation.
        snapshot: CartSnapshot,
    },
    /// The write-through for `revision` failed; in-memory state is unaffected.
    PersistFailed {
        /// Revision whose record could not be stored.
        revision: Revision,
        /// Backend error text.
        reason: String,
    },
}

impl CartEvent {
    /// Revision the event refers to.
    pub fn revision(&self) -> Revision {
        match self {
            Self::Changed { revision, .. } | Self::PersistFailed { revision, .. } => *revision,
        }
    }
}
