//! Best-path search over the grid.
//!
//! The spans form an implicit DAG: a node at `(pos, len)` has edges to every
//! node starting at `pos + len`, and reaching `pos == key count` ends a path.
//! Edge weight is the destination node's [`Node::score`]. We maximize the sum
//! with a Dijkstra-style frontier ordered by score, since every edge moves
//! strictly forward.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, debug_span};

use crate::node::Node;
use crate::span::Span;
use crate::walk::WalkedPath;

/// One step of a candidate path. Predecessors are indices into the same
/// per-search arena.
struct SearchState {
    position: usize,
    score: f64,
    prev: Option<usize>,
    /// `(start, span_length)` of the node taken to reach `position`.
    via: Option<(usize, usize)>,
}

/// Heap entry: higher score first, then earlier discovery first.
struct Frontier {
    score: f64,
    seq: u64,
    state: usize,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

/// Find the highest-scoring sequence of nodes covering every span.
///
/// Returns an empty path when no sequence reaches the end.
pub fn assemble(spans: &[Span]) -> WalkedPath {
    let key_count = spans.len();
    let _span = debug_span!("assemble", key_count).entered();
    if key_count == 0 {
        return WalkedPath::default();
    }

    let mut states = vec![SearchState {
        position: 0,
        score: 0.0,
        prev: None,
        via: None,
    }];
    let mut best = vec![f64::NEG_INFINITY; key_count + 1];
    best[0] = 0.0;
    // Best score already expanded per position. A state is expanded again only
    // if it beats this, which keeps the search exact when overrides make some
    // edge weights positive.
    let mut expanded = vec![f64::NEG_INFINITY; key_count + 1];

    let mut heap = BinaryHeap::new();
    heap.push(Frontier {
        score: 0.0,
        seq: 0,
        state: 0,
    });
    let mut seq = 1u64;
    let mut final_state: Option<usize> = None;
    let mut final_score = f64::NEG_INFINITY;
    let mut expansions = 0usize;

    while let Some(Frontier { state, .. }) = heap.pop() {
        let (position, score) = (states[state].position, states[state].score);
        if score < best[position] || score <= expanded[position] {
            continue;
        }
        expanded[position] = score;

        if position == key_count {
            if score > final_score {
                final_score = score;
                final_state = Some(state);
            }
            continue;
        }

        expansions += 1;
        for node in spans[position].iter() {
            let next = position + node.span_length();
            if next > key_count {
                continue;
            }
            let next_score = score + node.score();
            if next_score > best[next] {
                best[next] = next_score;
                states.push(SearchState {
                    position: next,
                    score: next_score,
                    prev: Some(state),
                    via: Some((position, node.span_length())),
                });
                heap.push(Frontier {
                    score: next_score,
                    seq,
                    state: states.len() - 1,
                });
                seq += 1;
            }
        }
    }

    let Some(mut cursor) = final_state else {
        debug!(expansions, "no path reaches the end");
        return WalkedPath::default();
    };

    let mut nodes: Vec<Node> = Vec::new();
    loop {
        let state = &states[cursor];
        if let Some((start, len)) = state.via {
            if let Some(node) = spans[start].node_of(len) {
                nodes.push(node.clone());
            }
        }
        match state.prev {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    nodes.reverse();

    debug!(
        expansions,
        states = states.len(),
        node_count = nodes.len(),
        score = final_score,
        "assembled"
    );
    WalkedPath::new(nodes, final_score)
}
