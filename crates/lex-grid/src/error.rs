use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the cursor an edit or jump targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypingDirection {
    /// Toward the end of the key sequence.
    Front,
    /// Toward the start of the key sequence.
    Rear,
}

impl fmt::Display for TypingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypingDirection::Front => f.write_str("front"),
            TypingDirection::Rear => f.write_str("rear"),
        }
    }
}

/// Why a compositor operation was refused. The grid is unchanged on error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompositorError {
    #[error("key is empty")]
    EmptyKey,
    #[error("key equals the separator")]
    SeparatorKey,
    #[error("no unigram for key `{0}`")]
    UnknownKey(String),
    #[error("language model reported unigrams for `{0}` but returned none")]
    InconsistentModel(String),
    #[error("nothing to drop at the {0} of the cursor")]
    AtBoundary(TypingDirection),
    #[error("no walked path covers the current keys")]
    NotWalked,
    #[error("cursor already at the {0} edge")]
    CursorAtEdge(TypingDirection),
    #[error("no candidate `{value}` around position {location}")]
    CandidateNotFound { value: String, location: usize },
    #[error("NoOverride does not select a candidate")]
    NoOverrideRequested,
}
