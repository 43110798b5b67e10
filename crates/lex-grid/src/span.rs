use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::settings::MAX_SPAN_LENGTH;

/// All nodes that start at one key position, indexed by span length.
///
/// Slot `i` holds the node of length `i + 1`. Lengths outside
/// `1..=limit` are rejected by every operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    limit: usize,
    nodes: Vec<Option<Node>>,
}

impl Span {
    /// `limit` is capped at [`MAX_SPAN_LENGTH`].
    pub fn new(limit: usize) -> Self {
        let limit = limit.min(MAX_SPAN_LENGTH);
        Self {
            limit,
            nodes: vec![None; limit],
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Store `node` under its own span length, replacing any previous one.
    pub fn insert(&mut self, node: Node) -> bool {
        let len = node.span_length();
        if !self.accepts(len) {
            return false;
        }
        self.nodes[len - 1] = Some(node);
        true
    }

    /// Remove every node of length `len` or longer.
    pub fn drop_nodes_of_or_beyond(&mut self, len: usize) {
        if !self.accepts(len) {
            return;
        }
        for slot in &mut self.nodes[len - 1..] {
            *slot = None;
        }
    }

    pub fn remove(&mut self, len: usize) -> Option<Node> {
        if !self.accepts(len) {
            return None;
        }
        self.nodes[len - 1].take()
    }

    pub fn node_of(&self, len: usize) -> Option<&Node> {
        if !self.accepts(len) {
            return None;
        }
        self.nodes[len - 1].as_ref()
    }

    pub fn node_of_mut(&mut self, len: usize) -> Option<&mut Node> {
        if !self.accepts(len) {
            return None;
        }
        self.nodes[len - 1].as_mut()
    }

    /// Length of the longest node held, 0 when empty.
    pub fn max_length(&self) -> usize {
        self.nodes
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(Option::is_none)
    }

    /// Nodes in ascending span length.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut().flatten()
    }

    /// Change the length limit; shrinking drops the nodes that no longer fit.
    pub fn set_limit(&mut self, limit: usize) {
        let limit = limit.min(MAX_SPAN_LENGTH);
        self.nodes.resize(limit, None);
        self.limit = limit;
    }

    pub fn clear(&mut self) {
        self.nodes.iter_mut().for_each(|slot| *slot = None);
    }

    /// Drop slots the limit forbids and nodes filed under the wrong length.
    pub(crate) fn sanitize(&mut self) {
        self.nodes.resize(self.limit, None);
        for (i, slot) in self.nodes.iter_mut().enumerate() {
            let valid = slot
                .as_ref()
                .is_some_and(|n| n.is_well_formed() && n.span_length() == i + 1);
            if !valid {
                *slot = None;
            }
        }
    }

    fn accepts(&self, len: usize) -> bool {
        (1..=self.limit.min(self.nodes.len())).contains(&len)
    }
}
