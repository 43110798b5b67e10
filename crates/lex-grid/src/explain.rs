//! Diagnostic views of a grid: Graphviz text and serializable summaries.

use std::fmt::Write;

use serde::Serialize;

use crate::node::{Node, OverrideType};
use crate::span::Span;
use crate::walk::WalkedPath;

/// Render the grid as a Graphviz digraph.
///
/// Vertices are visited in grid order and, per position, by ascending span
/// length. `BOS` links to every node at 0; a node links to each node at
/// `position + length` and, if it ends the keys, to `EOS`.
pub fn dump_dot(spans: &[Span]) -> String {
    let mut out = String::from("digraph {\ngraph [ rankdir=LR ];\nBOS;\n");
    for (p, span) in spans.iter().enumerate() {
        for node in span.iter() {
            let value = node.value();
            let next = p + node.span_length();
            if p == 0 {
                let _ = writeln!(out, "BOS -> {value};");
            }
            let _ = writeln!(out, "{value};");
            if let Some(dest) = spans.get(next) {
                for succ in dest.iter() {
                    let _ = writeln!(out, "{value} -> {};", succ.value());
                }
            }
            if next == spans.len() {
                let _ = writeln!(out, "{value} -> EOS;");
            }
        }
    }
    out.push_str("EOS;\n}\n");
    out
}

/// A node for diagnostic display.
#[derive(Debug, Serialize)]
pub struct ExplainNode {
    pub start: usize,
    pub span_length: usize,
    pub keys: Vec<String>,
    pub value: String,
    pub score: f64,
    pub override_type: OverrideType,
}

impl ExplainNode {
    pub fn new(start: usize, node: &Node) -> Self {
        Self {
            start,
            span_length: node.span_length(),
            keys: node.key_array().to_vec(),
            value: node.value().to_string(),
            score: node.score(),
            override_type: node.override_type(),
        }
    }
}

/// A walked path with per-segment positions.
#[derive(Debug, Serialize)]
pub struct ExplainWalk {
    pub segments: Vec<ExplainNode>,
    pub score: f64,
}

impl From<&WalkedPath> for ExplainWalk {
    fn from(path: &WalkedPath) -> Self {
        let starts = path.region_cursor_map();
        Self {
            segments: path
                .nodes()
                .iter()
                .zip(starts)
                .map(|(node, start)| ExplainNode::new(start, node))
                .collect(),
            score: path.score(),
        }
    }
}

/// Every node in the grid, in the same order as [`dump_dot`].
pub fn explain_nodes(spans: &[Span]) -> Vec<ExplainNode> {
    spans
        .iter()
        .enumerate()
        .flat_map(|(p, span)| span.iter().map(move |n| ExplainNode::new(p, n)))
        .collect()
}
