//! Candidate lookup and overrides around a cursor position.

use tracing::debug;

use super::Compositor;
use crate::error::CompositorError;
use crate::lm::LanguageModel;
use crate::node::{Node, OverrideType};
use crate::unigram::KeyValuePair;

/// Which nodes around a cursor a lookup considers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CandidateFilter {
    /// Nodes covering the key right after the cursor (the last key when the
    /// cursor is at the end).
    #[default]
    All,
    /// Nodes starting at the cursor.
    BeginAt,
    /// Nodes ending at the cursor.
    EndAt,
}

/// A node together with the position it starts at.
#[derive(Debug, Clone, Copy)]
pub struct NodeAnchor<'a> {
    pub location: usize,
    pub node: &'a Node,
}

impl NodeAnchor<'_> {
    pub fn span_length(&self) -> usize {
        self.node.span_length()
    }

    /// First key position after the node.
    pub fn end(&self) -> usize {
        self.location + self.node.span_length()
    }
}

impl<M: LanguageModel> Compositor<M> {
    /// Nodes around cursor `at` selected by `filter`, shortest span first.
    pub fn fetch_overlapping_nodes(
        &self,
        at: usize,
        filter: CandidateFilter,
    ) -> Vec<NodeAnchor<'_>> {
        let spans = &self.grid.spans;
        self.overlapping_coords(at, filter)
            .into_iter()
            .filter_map(move |(location, len)| {
                spans[location]
                    .node_of(len)
                    .map(|node| NodeAnchor { location, node })
            })
            .collect()
    }

    /// Key/value pairs from every node [`fetch_overlapping_nodes`] returns,
    /// longest span first, each node's candidates in score order.
    ///
    /// [`fetch_overlapping_nodes`]: Self::fetch_overlapping_nodes
    pub fn fetch_candidates(&self, at: usize, filter: CandidateFilter) -> Vec<KeyValuePair> {
        let mut anchors = self.fetch_overlapping_nodes(at, filter);
        // Stable, so equal lengths keep grid order.
        anchors.sort_by(|a, b| b.span_length().cmp(&a.span_length()));
        anchors
            .iter()
            .flat_map(|a| {
                a.node
                    .unigrams()
                    .iter()
                    .map(|u| KeyValuePair::new(a.node.key_array().to_vec(), u.value.clone()))
            })
            .collect()
    }

    /// Pin `candidate` on the node covering `at` whose keys match.
    pub fn override_candidate(
        &mut self,
        candidate: &KeyValuePair,
        at: usize,
        override_type: OverrideType,
    ) -> Result<(), CompositorError> {
        self.override_candidate_against(
            Some(&candidate.key_array),
            &candidate.value,
            at,
            override_type,
        )
    }

    /// Pin `value` on the shortest node covering `at` that offers it.
    pub fn override_candidate_literal(
        &mut self,
        value: &str,
        at: usize,
        override_type: OverrideType,
    ) -> Result<(), CompositorError> {
        self.override_candidate_against(None, value, at, override_type)
    }

    fn override_candidate_against(
        &mut self,
        key_array: Option<&[String]>,
        value: &str,
        at: usize,
        override_type: OverrideType,
    ) -> Result<(), CompositorError> {
        if override_type == OverrideType::NoOverride {
            return Err(CompositorError::NoOverrideRequested);
        }
        let not_found = || CompositorError::CandidateNotFound {
            value: value.to_string(),
            location: at,
        };
        if self.grid.keys.is_empty() {
            return Err(not_found());
        }

        let query = at.min(self.grid.keys.len() - 1);
        let mut chosen: Option<(usize, usize)> = None;
        for (location, len) in self.overlapping_coords(query, CandidateFilter::All) {
            let Some(node) = self.grid.spans[location].node_of_mut(len) else {
                continue;
            };
            if key_array.is_some_and(|keys| node.key_array() != keys) {
                continue;
            }
            if node.select_override_unigram(value, override_type) {
                chosen = Some((location, len));
                break;
            }
        }
        let Some((start, len)) = chosen else {
            return Err(not_found());
        };
        debug!(value, start, len, ?override_type, "override_candidate");

        self.weaken_or_reset_overlaps(start, len);
        self.grid.invalidate_walk();
        Ok(())
    }

    /// Keep the fresh override dominant over every node it overlaps: nodes that
    /// are a contiguous part of it and show the same value keep their own
    /// override at a reduced score, all others are reset.
    fn weaken_or_reset_overlaps(&mut self, start: usize, len: usize) {
        let Some(chosen) = self.grid.spans[start].node_of(len) else {
            return;
        };
        let chosen_keys = chosen.key_array().to_vec();
        let chosen_value = chosen.value().to_string();
        let divisor = self.grid.overlap_weaken_divisor;

        let end = (start + len).min(self.grid.spans.len());
        for i in start..end {
            for (location, other_len) in self.overlapping_coords(i, CandidateFilter::All) {
                if (location, other_len) == (start, len) {
                    continue;
                }
                let Some(node) = self.grid.spans[location].node_of_mut(other_len) else {
                    continue;
                };
                let contained = chosen_keys
                    .windows(node.span_length())
                    .any(|w| w == node.key_array());
                if contained && node.value() == chosen_value {
                    node.weaken_overriding_score(divisor);
                } else {
                    node.reset();
                }
            }
        }
    }

    /// `(location, span_length)` of the nodes `filter` selects around `at`,
    /// ordered by span length, then location.
    fn overlapping_coords(&self, at: usize, filter: CandidateFilter) -> Vec<(usize, usize)> {
        let key_count = self.grid.keys.len();
        if key_count == 0 {
            return Vec::new();
        }
        let max = self.grid.max_span_length;
        let spans = &self.grid.spans;

        let mut coords: Vec<(usize, usize)> = match filter {
            CandidateFilter::All => {
                let at = at.min(key_count - 1);
                let begin = at.saturating_sub(max - 1);
                (begin..=at)
                    .flat_map(move |p| {
                        spans[p]
                            .iter()
                            .map(move |n| (p, n.span_length()))
                            .filter(move |&(p, len)| p + len > at)
                    })
                    .collect()
            }
            CandidateFilter::BeginAt => match spans.get(at) {
                Some(span) => span.iter().map(|n| (at, n.span_length())).collect(),
                None => Vec::new(),
            },
            CandidateFilter::EndAt => {
                let end = at.min(key_count);
                if end == 0 {
                    return Vec::new();
                }
                let begin = end.saturating_sub(max);
                (begin..end)
                    .filter_map(|p| {
                        spans[p]
                            .node_of(end - p)
                            .map(|n| (p, n.span_length()))
                    })
                    .collect()
            }
        };
        coords.sort_by_key(|&(p, len)| (len, p));
        coords
    }
}
