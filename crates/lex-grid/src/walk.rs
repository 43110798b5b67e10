//! The assembled segmentation and the cursor maps derived from it.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::unigram::KeyValuePair;

/// Nodes chosen by the assembler, in key order, with their summed score.
///
/// The nodes are copies; editing the grid never changes a path already
/// handed out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkedPath {
    nodes: Vec<Node>,
    score: f64,
}

impl WalkedPath {
    pub fn new(nodes: Vec<Node>, score: f64) -> Self {
        Self { nodes, score }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn values(&self) -> Vec<&str> {
        self.nodes.iter().map(Node::value).collect()
    }

    pub fn key_arrays(&self) -> Vec<&[String]> {
        self.nodes.iter().map(Node::key_array).collect()
    }

    pub fn joined_keys(&self, separator: &str) -> Vec<String> {
        self.nodes.iter().map(|n| n.joined_key(separator)).collect()
    }

    pub fn span_lengths(&self) -> Vec<usize> {
        self.nodes.iter().map(Node::span_length).collect()
    }

    pub fn total_key_count(&self) -> usize {
        self.nodes.iter().map(Node::span_length).sum()
    }

    /// For every cursor `0..=total_key_count()`, the index of the segment
    /// holding the key right after it. The final cursor maps to `len()`.
    pub fn cursor_region_map(&self) -> Vec<usize> {
        let mut map = Vec::with_capacity(self.total_key_count() + 1);
        for (i, node) in self.nodes.iter().enumerate() {
            map.extend(std::iter::repeat(i).take(node.span_length()));
        }
        map.push(self.nodes.len());
        map
    }

    /// Segment boundaries as cursors: entry `i` is where segment `i` starts,
    /// the last entry is `total_key_count()`.
    pub fn region_cursor_map(&self) -> Vec<usize> {
        let mut map = Vec::with_capacity(self.nodes.len() + 1);
        let mut at = 0;
        map.push(at);
        for node in &self.nodes {
            at += node.span_length();
            map.push(at);
        }
        map
    }

    /// Index and node of the segment holding the key at `cursor`. A cursor
    /// at the very end refers to the last segment.
    pub fn find_node(&self, cursor: usize) -> Option<(usize, &Node)> {
        let total = self.total_key_count();
        if total == 0 {
            return None;
        }
        let cursor = cursor.min(total - 1);
        let mut start = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            let end = start + node.span_length();
            if cursor < end {
                return Some((i, node));
            }
            start = end;
        }
        None
    }

    /// Key range of the segment [`find_node`](Self::find_node) returns.
    pub fn context_range(&self, cursor: usize) -> Range<usize> {
        let Some((index, node)) = self.find_node(cursor) else {
            return 0..0;
        };
        let start: usize = self.nodes[..index].iter().map(Node::span_length).sum();
        start..start + node.span_length()
    }

    /// One pair per key: multi-key words are split character by character,
    /// unless their value does not line up with their keys.
    pub fn smashed_pairs(&self) -> Vec<KeyValuePair> {
        let mut out = Vec::with_capacity(self.total_key_count());
        for node in &self.nodes {
            if node.span_length() == 1 || node.is_reading_mismatched() {
                out.push(node.current_pair());
                continue;
            }
            for (key, ch) in node.key_array().iter().zip(node.value().chars()) {
                out.push(KeyValuePair::new(vec![key.clone()], ch.to_string()));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unigram::Unigram;

    fn node(keys: &[&str], value: &str) -> Node {
        Node::new(
            keys.iter().map(|s| s.to_string()).collect(),
            vec![Unigram::new(value, -1.0)],
        )
        .unwrap()
    }

    fn path() -> WalkedPath {
        WalkedPath::new(
            vec![
                node(&["gao1", "ke1", "ji4"], "高科技"),
                node(&["gong1", "si1"], "公司"),
                node(&["de5"], "的"),
                node(&["huo3", "yan4"], "🔥"),
            ],
            -4.0,
        )
    }

    #[test]
    fn maps() {
        let p = path();
        assert_eq!(p.total_key_count(), 8);
        assert_eq!(p.span_lengths(), vec![3, 2, 1, 2]);
        assert_eq!(p.region_cursor_map(), vec![0, 3, 5, 6, 8]);
        assert_eq!(p.cursor_region_map(), vec![0, 0, 0, 1, 1, 2, 3, 3, 4]);
    }

    #[test]
    fn find_node_and_context_range() {
        let p = path();
        assert_eq!(p.find_node(4).map(|(i, n)| (i, n.value())), Some((1, "公司")));
        assert_eq!(p.context_range(4), 3..5);
        assert_eq!(p.context_range(8), 6..8);
        assert_eq!(WalkedPath::default().context_range(0), 0..0);
        assert!(WalkedPath::default().find_node(0).is_none());
    }

    #[test]
    fn smashed_pairs_split_aligned_words() {
        let pairs = path().smashed_pairs();
        let shown: Vec<String> = pairs.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            shown,
            vec![
                "(gao1,高)",
                "(ke1,科)",
                "(ji4,技)",
                "(gong1,公)",
                "(si1,司)",
                "(de5,的)",
                "(huo3-yan4,🔥)",
            ]
        );
    }

    #[test]
    fn joined_keys_and_values() {
        let p = path();
        assert_eq!(p.values(), vec!["高科技", "公司", "的", "🔥"]);
        assert_eq!(p.joined_keys(""), vec!["gao1ke1ji4", "gong1si1", "de5", "huo3yan4"]);
        assert_eq!(p.key_arrays()[1], &["gong1".to_string(), "si1".to_string()][..]);
    }
}
