//! Key editing on top of a [`Grid`], driven by a [`LanguageModel`].
//!
//! Every mutation either succeeds or leaves the grid exactly as it was. The
//! cached walk is dropped whenever keys or nodes change; cursor moves keep it.

mod candidates;
mod cursor;

pub use candidates::{CandidateFilter, NodeAnchor};

use tracing::{debug, debug_span};

use crate::assembler::assemble;
use crate::error::{CompositorError, TypingDirection};
use crate::explain::dump_dot;
use crate::grid::{Grid, ResizeBehavior};
use crate::lm::LanguageModel;
use crate::node::Node;
use crate::settings::CompositorSettings;
use crate::span::Span;
use crate::walk::WalkedPath;

#[derive(Debug, Clone)]
pub struct Compositor<M> {
    lm: M,
    grid: Grid,
}

impl<M: LanguageModel> Compositor<M> {
    /// A compositor using the global settings.
    pub fn new(lm: M) -> Self {
        Self::with_settings(lm, CompositorSettings::current())
    }

    pub fn with_settings(lm: M, settings: CompositorSettings) -> Self {
        Self {
            lm,
            grid: Grid::new(&settings),
        }
    }

    /// Resume from a saved grid. Anything the record gets wrong (misplaced
    /// nodes, out-of-range cursor, a stale walk) is repaired, not rejected.
    pub fn from_grid(lm: M, mut grid: Grid) -> Self {
        grid.sanitize();
        Self { lm, grid }
    }

    /// An independent copy; no node or span is shared with `self`.
    pub fn hard_copy(&self) -> Self
    where
        M: Clone,
    {
        self.clone()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn lang_model(&self) -> &M {
        &self.lm
    }

    /// Mutable access to the model. Call [`update`](Self::update) with
    /// `update_existing` afterwards so the nodes catch up.
    pub fn lang_model_mut(&mut self) -> &mut M {
        &mut self.lm
    }

    /// Swap the model. The grid is cleared since its nodes came from the old one.
    pub fn set_lang_model(&mut self, lm: M) {
        self.lm = lm;
        self.clear();
    }

    pub fn keys(&self) -> &[String] {
        self.grid.keys()
    }

    pub fn spans(&self) -> &[Span] {
        self.grid.spans()
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.grid.cursor()
    }

    pub fn marker(&self) -> usize {
        self.grid.marker()
    }

    pub fn separator(&self) -> &str {
        self.grid.separator()
    }

    pub fn max_span_length(&self) -> usize {
        self.grid.max_span_length()
    }

    /// The last walk, if keys and nodes are unchanged since.
    pub fn walked(&self) -> Option<&WalkedPath> {
        self.grid.walked()
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.grid.separator = separator.into();
    }

    /// Values below the minimum are raised to it. Lowering drops longer
    /// nodes; raising lets the grid grow them back from the model.
    pub fn set_max_span_length(&mut self, value: usize) {
        let old = self.grid.max_span_length;
        self.grid.set_max_span_length(value);
        if self.grid.max_span_length > old {
            self.update(true);
        }
    }

    /// Insert `key` at the cursor and advance past it.
    pub fn insert_key(&mut self, key: &str) -> Result<(), CompositorError> {
        let _span = debug_span!("insert_key", key, cursor = self.grid.cursor).entered();
        if key.is_empty() {
            return Err(CompositorError::EmptyKey);
        }
        if key == self.grid.separator {
            return Err(CompositorError::SeparatorKey);
        }
        if !self.lm.has_unigrams_for(&[key.to_string()]) {
            return Err(CompositorError::UnknownKey(key.to_string()));
        }

        let snapshot = self.grid.clone();
        let cursor = self.grid.cursor;
        self.grid.keys.insert(cursor, key.to_string());
        self.grid.resize(cursor, ResizeBehavior::Expand);
        if self.update(false) == 0 {
            debug!("model returned no unigrams, rolling back");
            self.grid = snapshot;
            return Err(CompositorError::InconsistentModel(key.to_string()));
        }
        self.grid.cursor += 1;
        self.grid.marker = self.grid.cursor;
        self.grid.invalidate_walk();
        Ok(())
    }

    /// Remove the key behind (`Rear`) or ahead of (`Front`) the cursor.
    pub fn drop_key(&mut self, direction: TypingDirection) -> Result<(), CompositorError> {
        let _span = debug_span!("drop_key", %direction, cursor = self.grid.cursor).entered();
        let is_rear = direction == TypingDirection::Rear;
        let edge = if is_rear { 0 } else { self.grid.keys.len() };
        if self.grid.cursor == edge {
            return Err(CompositorError::AtBoundary(direction));
        }

        let at = self.grid.cursor - usize::from(is_rear);
        self.grid.keys.remove(at);
        if is_rear {
            self.grid.cursor -= 1;
        }
        self.grid.marker = self.grid.cursor;
        self.grid.resize(self.grid.cursor, ResizeBehavior::Shrink);
        self.update(false);
        self.grid.invalidate_walk();
        Ok(())
    }

    /// Rebuild nodes from the model.
    ///
    /// Without `update_existing`, only slices within `max_span_length` of the
    /// cursor are visited and only missing nodes are created. With it, every
    /// slice is visited and existing nodes are refreshed: resynced when the
    /// model still knows them, removed when it does not. Single-key nodes are
    /// never removed, so every position stays reachable.
    ///
    /// Returns how many nodes were created, refreshed or removed.
    pub fn update(&mut self, update_existing: bool) -> usize {
        let _span = debug_span!("update", update_existing).entered();
        let key_count = self.grid.keys.len();
        let max = self.grid.max_span_length;
        let cursor = self.grid.cursor;
        let range = if update_existing {
            0..self.grid.spans.len()
        } else {
            cursor.saturating_sub(max)..cursor.saturating_add(max).min(key_count)
        };

        let mut changed = 0usize;
        for pos in range.clone() {
            for span_len in 1..=max.min(range.end - pos) {
                if pos + span_len > key_count {
                    continue;
                }
                let Some(span) = self.grid.spans.get_mut(pos) else {
                    continue;
                };
                let key_slice = &self.grid.keys[pos..pos + span_len];
                if span.node_of(span_len).is_some() {
                    if !update_existing {
                        continue;
                    }
                    let unigrams = self.lm.unigrams_for(key_slice);
                    if unigrams.is_empty() {
                        if span_len == 1 {
                            continue;
                        }
                        span.remove(span_len);
                    } else if let Some(node) = span.node_of_mut(span_len) {
                        node.sync_unigrams(unigrams);
                    }
                    changed += 1;
                    continue;
                }
                let unigrams = self.lm.unigrams_for(key_slice);
                if let Some(node) = Node::new(key_slice.to_vec(), unigrams) {
                    span.insert(node.with_overriding_score(self.grid.overriding_score));
                    changed += 1;
                }
            }
        }

        if changed > 0 {
            self.grid.invalidate_walk();
        }
        debug!(nodes_changed = changed);
        changed
    }

    /// Run the assembler, or return the cached result if nothing changed.
    pub fn walk(&mut self) -> &WalkedPath {
        if self.grid.walked.is_none() {
            let _span = debug_span!("walk", key_count = self.grid.keys.len()).entered();
            let path = assemble(&self.grid.spans);
            debug!(node_count = path.len(), score = path.score());
            self.grid.walked = Some(path);
        }
        self.grid.walked.get_or_insert_with(WalkedPath::default)
    }

    pub fn dump_dot(&self) -> String {
        dump_dot(&self.grid.spans)
    }
}

#[cfg(test)]
mod tests;
