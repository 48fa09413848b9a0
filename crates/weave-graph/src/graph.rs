//! The directed multigraph materialized by the Graph Assembler (C6).
//!
//! Hand-rolled per spec.md §9 ("a straightforward in-house implementation...
//! is 200-400 lines and avoids an ecosystem dependency"): adjacency maps
//! plus a reverse map for predecessors, and union-find for weakly
//! connected components. No `petgraph` dependency.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use weave_core::{Edge, ParameterSchema};

/// Node attributes retained so downstream components (C7, C8) never need
/// to reopen the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttrs {
    pub description: String,
    pub category: String,
    pub parameters: ParameterSchema,
}

/// Directed multigraph with node attributes and parallel edges keyed by
/// `(producer, consumer, parameter)`. Serializable as-is so the checkpoint
/// envelope (`weave-persist`) can embed it directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    nodes: HashMap<String, NodeAttrs>,
    /// producer -> outgoing edges
    outgoing: HashMap<String, Vec<Edge>>,
    /// consumer -> producer names (for predecessor iteration)
    incoming: HashMap<String, Vec<String>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>, attrs: NodeAttrs) {
        self.nodes.insert(name.into(), attrs);
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&NodeAttrs> {
        self.nodes.get(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeAttrs)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Insert an edge. Self-loops are rejected (spec.md §3 invariant: "a
    /// tool never feeds itself"). Both endpoints must already be nodes.
    /// On a duplicate multigraph key `(producer, consumer, parameter)`,
    /// the higher-weight edge wins.
    pub fn add_edge(&mut self, edge: Edge) {
        if edge.producer == edge.consumer {
            return;
        }
        if !self.nodes.contains_key(&edge.producer) || !self.nodes.contains_key(&edge.consumer) {
            return;
        }

        let bucket = self.outgoing.entry(edge.producer.clone()).or_default();
        if let Some(existing) = bucket.iter_mut().find(|e| e.key() == edge.key()) {
            if edge.weight > existing.weight {
                *existing = edge.clone();
            }
            return;
        }

        self.incoming.entry(edge.consumer.clone()).or_default().push(edge.producer.clone());
        bucket.push(edge);
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(Vec::len).sum()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.outgoing.values().flatten()
    }

    pub fn out_degree(&self, name: &str) -> usize {
        self.outgoing.get(name).map_or(0, Vec::len)
    }

    pub fn successors(&self, name: &str) -> &[Edge] {
        self.outgoing.get(name).map_or(&[], Vec::as_slice)
    }

    /// Distinct predecessor tool names (producers with an edge into `name`).
    pub fn predecessor_names(&self, name: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .incoming
            .get(name)
            .map(|v| v.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default();
        names.sort();
        names.dedup();
        names
    }

    /// Distinct successor tool names.
    pub fn successor_names(&self, name: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self.successors(name).iter().map(|e| e.consumer.as_str()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Remove every node (and its incident edges) belonging to a weakly
    /// connected component smaller than `min_component_size`.
    pub fn prune_small_components(&mut self, min_component_size: usize) {
        let components = self.weakly_connected_components();
        let doomed: HashSet<String> = components
            .into_iter()
            .filter(|c| c.len() < min_component_size)
            .flatten()
            .collect();

        if doomed.is_empty() {
            return;
        }

        for name in &doomed {
            self.nodes.remove(name);
            self.outgoing.remove(name);
            self.incoming.remove(name);
        }
        for bucket in self.outgoing.values_mut() {
            bucket.retain(|e| !doomed.contains(&e.consumer));
        }
        for producers in self.incoming.values_mut() {
            producers.retain(|p| !doomed.contains(p));
        }
    }

    /// Weakly connected components via union-find over the undirected view.
    pub fn weakly_connected_components(&self) -> Vec<Vec<String>> {
        let mut uf = UnionFind::new(self.nodes.keys().cloned());
        for edge in self.edges() {
            uf.union(&edge.producer, &edge.consumer);
        }

        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        for name in self.nodes.keys() {
            let root = uf.find(name);
            groups.entry(root).or_default().push(name.clone());
        }
        groups.into_values().collect()
    }
}

/// Union-find (disjoint-set) over node names, path-compressed with
/// union-by-rank.
struct UnionFind {
    parent: HashMap<String, String>,
    rank: HashMap<String, u32>,
}

impl UnionFind {
    fn new(names: impl Iterator<Item = String>) -> Self {
        let mut parent = HashMap::new();
        let mut rank = HashMap::new();
        for name in names {
            rank.insert(name.clone(), 0);
            parent.insert(name.clone(), name);
        }
        Self { parent, rank }
    }

    fn find(&mut self, name: &str) -> String {
        let parent_of = self.parent.get(name).cloned().unwrap_or_else(|| name.to_string());
        if parent_of == name {
            return parent_of;
        }
        let root = self.find(&parent_of);
        self.parent.insert(name.to_string(), root.clone());
        root
    }

    fn union(&mut self, a: &str, b: &str) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        let rank_a = *self.rank.get(&root_a).unwrap_or(&0);
        let rank_b = *self.rank.get(&root_b).unwrap_or(&0);
        match rank_a.cmp(&rank_b) {
            std::cmp::Ordering::Less => {
                self.parent.insert(root_a, root_b);
            }
            std::cmp::Ordering::Greater => {
                self.parent.insert(root_b, root_a);
            }
            std::cmp::Ordering::Equal => {
                self.parent.insert(root_b.clone(), root_a.clone());
                self.rank.insert(root_a, rank_a + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> NodeAttrs {
        NodeAttrs {
            description: String::new(),
            category: "general".to_string(),
            parameters: ParameterSchema::default(),
        }
    }

    #[test]
    fn rejects_self_loops() {
        let mut g = Graph::new();
        g.add_node("a", attrs());
        g.add_edge(Edge::new("a", "a", "x", 0.9));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn duplicate_key_keeps_highest_weight() {
        let mut g = Graph::new();
        g.add_node("a", attrs());
        g.add_node("b", attrs());
        g.add_edge(Edge::new("a", "b", "x", 0.5));
        g.add_edge(Edge::new("a", "b", "x", 0.9));
        g.add_edge(Edge::new("a", "b", "x", 0.1));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.successors("a")[0].weight, 0.9);
    }

    #[test]
    fn prunes_components_smaller_than_minimum() {
        let mut g = Graph::new();
        for n in ["a", "b", "c"] {
            g.add_node(n, attrs());
        }
        g.add_edge(Edge::new("a", "b", "p", 0.9));
        // c is isolated
        g.prune_small_components(2);
        assert!(g.has_node("a"));
        assert!(g.has_node("b"));
        assert!(!g.has_node("c"));
    }

    #[test]
    fn weakly_connected_components_groups_correctly() {
        let mut g = Graph::new();
        for n in ["a", "b", "c", "d"] {
            g.add_node(n, attrs());
        }
        g.add_edge(Edge::new("a", "b", "p", 0.9));
        g.add_edge(Edge::new("c", "d", "q", 0.9));
        let mut components = g.weakly_connected_components();
        for c in &mut components {
            c.sort();
        }
        components.sort();
        assert_eq!(components, vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string(), "d".to_string()]]);
    }
}
