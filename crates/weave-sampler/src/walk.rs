//! Start-node selection, decayed next-hop selection, and the sequential
//! walk primitive shared by both public sampling modes.

use rand::Rng;

use weave_core::Edge;
use weave_graph::Graph;

use crate::counters::{Counters, EdgeKey};

/// Candidates are nodes with out-degree >= 1, ranked ascending by
/// `start_count[node] + U[0,1)`; the smallest wins (spec.md §4.7).
pub fn select_start_node(graph: &Graph, counters: &Counters, rng: &mut impl Rng) -> Option<String> {
    graph
        .node_names()
        .filter(|name| graph.out_degree(name) >= 1)
        .map(|name| {
            let jitter: f64 = rng.random_range(0.0..1.0);
            (name.to_string(), counters.start_count_of(name) + jitter)
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(name, _)| name)
}

/// Sample the next hop from `node`, excluding any successor already in
/// `visited` (simple-path invariant). Weighted by `weight * 1/(1 +
/// edge_visits)`; falls back to a uniform pick when every candidate has
/// zero decayed weight.
pub fn select_next_hop<'g>(
    graph: &'g Graph,
    node: &str,
    visited: &[String],
    counters: &Counters,
    rng: &mut impl Rng,
) -> Option<&'g Edge> {
    let candidates: Vec<&Edge> = graph
        .successors(node)
        .iter()
        .filter(|e| !visited.iter().any(|v| v == &e.consumer))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    let decayed: Vec<f64> = candidates
        .iter()
        .map(|e| {
            let key: EdgeKey = e.key();
            e.weight as f64 * (1.0 / (1.0 + counters.edge_visits_of(&key) as f64))
        })
        .collect();

    let total: f64 = decayed.iter().sum();
    if total <= 0.0 {
        let idx = rng.random_range(0..candidates.len());
        return Some(candidates[idx]);
    }

    let mut target = rng.random_range(0.0..total);
    for (edge, weight) in candidates.iter().zip(decayed.iter()) {
        if target < *weight {
            return Some(edge);
        }
        target -= weight;
    }
    candidates.last().copied()
}

/// Outcome of one walk attempt. `Aborted` still names the chosen start so
/// the caller can apply the penalty (spec.md: "the start node is
/// penalized... even though no skeleton was emitted").
pub enum WalkOutcome<'g> {
    NoCandidates,
    Aborted { start: String },
    Success { start: String, nodes: Vec<String>, edges: Vec<&'g Edge> },
}

/// Greedily walk from a freshly chosen start node until `target_len`
/// nodes are collected or no unvisited successor remains.
pub fn attempt_sequential_walk<'g>(
    graph: &'g Graph,
    counters: &Counters,
    min_len: usize,
    max_len: usize,
    rng: &mut impl Rng,
) -> WalkOutcome<'g> {
    let Some(start) = select_start_node(graph, counters, rng) else {
        return WalkOutcome::NoCandidates;
    };

    let target_len = if max_len > min_len { rng.random_range(min_len..=max_len) } else { min_len };

    let mut nodes = vec![start.clone()];
    let mut edges: Vec<&Edge> = Vec::new();

    while nodes.len() < target_len {
        let current = nodes.last().expect("walk always has at least the start node");
        match select_next_hop(graph, current, &nodes, counters, rng) {
            Some(edge) => {
                nodes.push(edge.consumer.clone());
                edges.push(edge);
            }
            None => break,
        }
    }

    if nodes.len() < min_len {
        WalkOutcome::Aborted { start }
    } else {
        WalkOutcome::Success { start, nodes, edges }
    }
}
