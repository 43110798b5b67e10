//! The compositor's working state as a plain, serializable record.
//!
//! A `Grid` owns every span and node by value, so cloning one yields a fully
//! independent copy. Structural edits (resizing around an inserted or removed
//! key) live here; anything that needs the language model lives in
//! [`crate::compositor`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::settings::{clamp_span_length, CompositorSettings};
use crate::span::Span;
use crate::walk::WalkedPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResizeBehavior {
    Expand,
    Shrink,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub(crate) keys: Vec<String>,
    pub(crate) spans: Vec<Span>,
    pub(crate) cursor: usize,
    pub(crate) marker: usize,
    pub(crate) max_span_length: usize,
    pub(crate) separator: String,
    pub(crate) overriding_score: f64,
    pub(crate) overlap_weaken_divisor: f64,
    /// Result of the last walk; `None` once keys or nodes change.
    #[serde(default)]
    pub(crate) walked: Option<WalkedPath>,
}

impl Grid {
    pub fn new(settings: &CompositorSettings) -> Self {
        Self {
            keys: Vec::new(),
            spans: Vec::new(),
            cursor: 0,
            marker: 0,
            max_span_length: clamp_span_length(settings.max_span_length),
            separator: settings.separator.clone(),
            overriding_score: settings.overriding_score,
            overlap_weaken_divisor: settings.overlap_weaken_divisor,
            walked: None,
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn marker(&self) -> usize {
        self.marker
    }

    pub fn max_span_length(&self) -> usize {
        self.max_span_length
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn overriding_score(&self) -> f64 {
        self.overriding_score
    }

    pub fn overlap_weaken_divisor(&self) -> f64 {
        self.overlap_weaken_divisor
    }

    /// The cached walk, if nothing changed since it was computed.
    pub fn walked(&self) -> Option<&WalkedPath> {
        self.walked.as_ref()
    }

    pub fn settings(&self) -> CompositorSettings {
        CompositorSettings {
            max_span_length: self.max_span_length,
            separator: self.separator.clone(),
            overriding_score: self.overriding_score,
            overlap_weaken_divisor: self.overlap_weaken_divisor,
        }
    }

    /// Total number of nodes across all spans.
    pub fn node_count(&self) -> usize {
        self.spans.iter().map(|s| s.iter().count()).sum()
    }

    pub(crate) fn invalidate_walk(&mut self) {
        self.walked = None;
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
        self.spans.clear();
        self.cursor = 0;
        self.marker = 0;
        self.walked = None;
    }

    /// Open or close one span slot at `location`, then drop the nodes whose
    /// coverage the shift made wrong.
    pub(crate) fn resize(&mut self, location: usize, behavior: ResizeBehavior) {
        let location = location.min(self.spans.len());
        match behavior {
            ResizeBehavior::Expand => {
                self.spans.insert(location, Span::new(self.max_span_length));
                // Nothing starts before the first slot.
                if location == 0 {
                    return;
                }
            }
            ResizeBehavior::Shrink => {
                if location == self.spans.len() {
                    return;
                }
                self.spans.remove(location);
            }
        }
        self.drop_wrecked_nodes(location);
    }

    /// A node starting at `delta < location` whose length reaches past
    /// `location` covered the slot that just appeared or vanished.
    fn drop_wrecked_nodes(&mut self, location: usize) {
        let location = location.min(self.spans.len());
        if self.spans.is_empty() {
            return;
        }
        let begin = location.saturating_sub(self.max_span_length - 1);
        for delta in begin..location {
            self.spans[delta].drop_nodes_of_or_beyond(location - delta + 1);
        }
    }

    pub(crate) fn set_max_span_length(&mut self, value: usize) {
        let value = clamp_span_length(value);
        self.max_span_length = value;
        for span in &mut self.spans {
            span.set_limit(value);
        }
        self.walked = None;
    }

    /// Re-establish every structural invariant on a record that did not come
    /// from this crate's own mutators.
    pub(crate) fn sanitize(&mut self) {
        let fallback = CompositorSettings::default();
        self.max_span_length = clamp_span_length(self.max_span_length);
        if !self.overriding_score.is_finite() || self.overriding_score <= 0.0 {
            self.overriding_score = fallback.overriding_score;
        }
        if !self.overlap_weaken_divisor.is_finite() || self.overlap_weaken_divisor <= 1.0 {
            self.overlap_weaken_divisor = fallback.overlap_weaken_divisor;
        }

        let len = self.keys.len();
        self.spans.resize(len, Span::new(self.max_span_length));
        let mut dropped = 0usize;
        for (pos, span) in self.spans.iter_mut().enumerate() {
            span.set_limit(self.max_span_length);
            span.sanitize();
            for span_len in 1..=self.max_span_length {
                let fits = pos + span_len <= len
                    && span
                        .node_of(span_len)
                        .is_some_and(|n| n.key_array() == &self.keys[pos..pos + span_len]);
                if !fits && span.remove(span_len).is_some() {
                    dropped += 1;
                }
            }
        }

        self.cursor = self.cursor.min(len);
        self.marker = self.marker.min(len);
        // A kept walk must consist of the grid's own nodes, in order.
        let walk_matches = self.walked.as_ref().is_some_and(|w| {
            let mut pos = 0;
            let same_nodes = w.nodes().iter().all(|n| {
                let here = self.spans.get(pos).and_then(|s| s.node_of(n.span_length()));
                pos += n.span_length();
                here == Some(n)
            });
            same_nodes && pos == self.keys.len()
        });
        if !walk_matches {
            self.walked = None;
        }
        if dropped > 0 {
            debug!(dropped, "sanitize dropped misplaced nodes");
        }
    }
}
