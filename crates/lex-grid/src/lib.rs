//! Composition core of an input-method engine.
//!
//! Readings typed one key at a time are kept in a [`Grid`] of overlapping
//! candidate [`Node`]s, built from a pluggable [`LanguageModel`]. The
//! [`Compositor`] edits the grid and runs the assembler, which picks the
//! best-scoring segmentation of the whole key sequence.

pub mod assembler;
pub mod compositor;
pub mod error;
pub mod explain;
pub mod grid;
pub mod lm;
pub mod node;
pub mod settings;
pub mod span;
pub(crate) mod testutil;
pub mod unigram;
pub mod walk;

pub use compositor::{CandidateFilter, Compositor, NodeAnchor};
pub use error::{CompositorError, TypingDirection};
pub use grid::Grid;
pub use lm::{LanguageModel, LmError, TextLanguageModel};
pub use node::{Node, OverrideType};
pub use span::Span;
pub use unigram::{KeyValuePair, Unigram};
pub use walk::WalkedPath;
