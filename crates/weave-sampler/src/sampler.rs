//! The Graph Sampler (C7): coverage-decayed random walk producing
//! [`TaskSkeleton`] values, deduplicated by canonical edge signature.
//!
//! `GraphSampler` owns its counters exclusively and takes `&mut self` on
//! every sampling call — if callers want concurrent sampling they must
//! run independent instances, never share one (spec.md §5).

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use weave_core::{skeleton_id, Dependency, Pattern, Role, SkeletonEdge, SkeletonMeta, SkeletonNode, TaskSkeleton};
use weave_graph::Graph;

use crate::counters::Counters;
use crate::walk::{attempt_sequential_walk, WalkOutcome};

/// Target path length bounds and neighborhood/retry tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleParams {
    pub min_len: usize,
    pub max_len: usize,
    /// `num_extras = ceil(|core| * expansion_ratio) + 1` (default `0.5`).
    pub expansion_ratio: f64,
    /// Consecutive-failure budget before a batch returns early (default `500`).
    pub max_retries: u32,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self { min_len: 2, max_len: 4, expansion_ratio: 0.5, max_retries: 500 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    Sequential,
    NeighborhoodSubgraph,
}

/// Result of one `generate_skeletons` call. `exhausted`/`failures` are
/// the sampler's non-error signal for early termination (spec.md §7:
/// `SamplerExhausted` is "reported as part of the return value, not
/// raised").
#[derive(Debug, Clone)]
pub struct SampleBatch {
    pub skeletons: Vec<TaskSkeleton>,
    pub exhausted: bool,
    pub failures: u32,
    pub coverage: f64,
}

#[derive(Default)]
pub struct GraphSampler {
    counters: Counters,
    seen_signatures: HashSet<String>,
}

impl GraphSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coverage_ratio(&self, graph: &Graph) -> f64 {
        self.counters.coverage_ratio(graph.edge_count())
    }

    pub fn start_count_of(&self, node: &str) -> f64 {
        self.counters.start_count_of(node)
    }

    /// Draw up to `count` unique skeletons of `mode` from `graph`. Stops
    /// early (setting `exhausted`) after `params.max_retries` consecutive
    /// failures (walk aborts or duplicate hits).
    pub fn generate_skeletons(
        &mut self,
        graph: &Graph,
        mode: SampleMode,
        count: usize,
        params: &SampleParams,
        rng: &mut impl Rng,
    ) -> SampleBatch {
        let mut skeletons = Vec::with_capacity(count);
        let mut consecutive_failures = 0u32;
        let mut total_failures = 0u32;
        let mut exhausted = false;

        while skeletons.len() < count {
            if consecutive_failures >= params.max_retries {
                exhausted = true;
                break;
            }

            let attempt = match mode {
                SampleMode::Sequential => self.try_sequential(graph, params, rng),
                SampleMode::NeighborhoodSubgraph => self.try_neighborhood(graph, params, rng),
            };

            match attempt {
                Attempt::Success { skeleton, start, edge_keys } => {
                    let sig = skeleton_id(&skeleton);
                    if self.seen_signatures.contains(&sig) {
                        debug!(signature = %sig, "duplicate skeleton, discarding");
                        consecutive_failures += 1;
                        total_failures += 1;
                        continue;
                    }
                    self.seen_signatures.insert(sig);
                    self.counters.record_walk(&start, &edge_keys);
                    skeletons.push(skeleton);
                    consecutive_failures = 0;
                }
                Attempt::Aborted { start } => {
                    if let Some(start) = start {
                        self.counters.penalize_start(&start);
                    }
                    consecutive_failures += 1;
                    total_failures += 1;
                }
            }
        }

        SampleBatch { skeletons, exhausted, failures: total_failures, coverage: self.coverage_ratio(graph) }
    }

    fn try_sequential(&self, graph: &Graph, params: &SampleParams, rng: &mut impl Rng) -> Attempt {
        match attempt_sequential_walk(graph, &self.counters, params.min_len, params.max_len, rng) {
            WalkOutcome::NoCandidates => Attempt::Aborted { start: None },
            WalkOutcome::Aborted { start } => Attempt::Aborted { start: Some(start) },
            WalkOutcome::Success { start, nodes, edges } => {
                let skeleton_nodes = nodes
                    .iter()
                    .filter_map(|name| graph.node(name).map(|attrs| SkeletonNode {
                        name: name.clone(),
                        description: attrs.description.clone(),
                        category: attrs.category.clone(),
                        parameters: attrs.parameters.clone(),
                        role: Role::Core,
                    }))
                    .collect();

                let skeleton_edges = edges
                    .iter()
                    .enumerate()
                    .map(|(i, e)| SkeletonEdge {
                        step: (i + 1) as u32,
                        from_tool: e.producer.clone(),
                        to_tool: e.consumer.clone(),
                        dependency: Dependency::provides(e.parameter.clone()),
                    })
                    .collect();

                let edge_keys = edges.iter().map(|e| e.key()).collect();
                let skeleton = TaskSkeleton { pattern: Pattern::Sequential, nodes: skeleton_nodes, edges: skeleton_edges, meta: None };
                Attempt::Success { skeleton, start, edge_keys }
            }
        }
    }

    fn try_neighborhood(&self, graph: &Graph, params: &SampleParams, rng: &mut impl Rng) -> Attempt {
        let (core_nodes, core_edges, start, edge_keys) = match attempt_sequential_walk(graph, &self.counters, params.min_len, params.max_len, rng) {
            WalkOutcome::NoCandidates => return Attempt::Aborted { start: None },
            WalkOutcome::Aborted { start } => return Attempt::Aborted { start: Some(start) },
            WalkOutcome::Success { start, nodes, edges } => {
                let edge_keys = edges.iter().map(|e| e.key()).collect();
                (nodes, edges, start, edge_keys)
            }
        };

        let core_set: HashSet<String> = core_nodes.iter().cloned().collect();
        let num_extras = ((core_nodes.len() as f64 * params.expansion_ratio).ceil() as usize) + 1;

        // Phase 1: hard negatives — graph-neighbors of the core, minus the core.
        let mut hard_negatives: Vec<String> = core_nodes
            .iter()
            .flat_map(|n| {
                graph
                    .successor_names(n)
                    .into_iter()
                    .chain(graph.predecessor_names(n))
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|n| !core_set.contains(n))
            .collect();
        hard_negatives.shuffle(rng);
        hard_negatives.truncate(num_extras);

        let mut distractors: Vec<String> = hard_negatives;

        // Phase 2: easy negatives — any remaining node, uniformly, to fill the deficit.
        if distractors.len() < num_extras {
            let deficit = num_extras - distractors.len();
            let taken: HashSet<String> = core_set.iter().cloned().chain(distractors.iter().cloned()).collect();
            let mut remaining: Vec<String> = graph.node_names().map(str::to_string).filter(|n| !taken.contains(n)).collect();
            remaining.shuffle(rng);
            distractors.extend(remaining.into_iter().take(deficit));
        }

        let mut shuffled_names: Vec<String> = core_nodes.iter().cloned().chain(distractors.iter().cloned()).collect();
        shuffled_names.shuffle(rng);

        let node_role: HashMap<String, Role> =
            core_set.iter().cloned().map(|n| (n, Role::Core)).chain(distractors.iter().cloned().map(|n| (n, Role::Distractor))).collect();

        let skeleton_nodes = shuffled_names
            .iter()
            .filter_map(|name| {
                graph.node(name).map(|attrs| SkeletonNode {
                    name: name.clone(),
                    description: attrs.description.clone(),
                    category: attrs.category.clone(),
                    parameters: attrs.parameters.clone(),
                    role: node_role.get(name).copied().unwrap_or(Role::Distractor),
                })
            })
            .collect();

        let skeleton_edges = core_edges
            .iter()
            .enumerate()
            .map(|(i, e)| SkeletonEdge {
                step: (i + 1) as u32,
                from_tool: e.producer.clone(),
                to_tool: e.consumer.clone(),
                dependency: Dependency::provides(e.parameter.clone()),
            })
            .collect();

        let meta = SkeletonMeta { core_chain_nodes: core_nodes.clone(), distractor_nodes: distractors };
        let skeleton = TaskSkeleton {
            pattern: Pattern::NeighborhoodSubgraph,
            nodes: skeleton_nodes,
            edges: skeleton_edges,
            meta: Some(meta),
        };

        Attempt::Success { skeleton, start, edge_keys }
    }
}

enum Attempt {
    Success { skeleton: TaskSkeleton, start: String, edge_keys: Vec<(String, String, String)> },
    Aborted { start: Option<String> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use weave_core::{Edge, ParameterSchema};
    use weave_graph::NodeAttrs;

    fn attrs(description: &str) -> NodeAttrs {
        NodeAttrs { description: description.to_string(), category: "general".to_string(), parameters: ParameterSchema::default() }
    }

    fn trivial_chain_graph() -> Graph {
        let mut g = Graph::new();
        g.add_node("A", attrs("Finds users and returns user_id"));
        g.add_node("B", attrs("Takes a user_id"));
        g.add_edge(Edge::new("A", "B", "user_id", 0.91));
        g
    }

    #[test]
    fn sequential_scenario_s1() {
        let graph = trivial_chain_graph();
        let mut sampler = GraphSampler::new();
        let params = SampleParams { min_len: 2, max_len: 2, ..SampleParams::default() };
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        let batch = sampler.generate_skeletons(&graph, SampleMode::Sequential, 1, &params, &mut rng);

        assert_eq!(batch.skeletons.len(), 1);
        let skeleton = &batch.skeletons[0];
        assert_eq!(skeleton.pattern, Pattern::Sequential);
        assert_eq!(skeleton.all_node_names(), vec!["A".to_string(), "B".to_string()]);
        assert_eq!(skeleton.edges.len(), 1);
        assert_eq!(skeleton.edges[0].dependency.parameter.as_deref(), Some("user_id"));
    }

    #[test]
    fn walk_decay_pushes_sampler_away_from_repeated_start() {
        let mut graph = Graph::new();
        for n in ["A", "B", "C", "D", "Bp"] {
            graph.add_node(n, attrs(n));
        }
        graph.add_edge(Edge::new("A", "B", "x", 0.9));
        graph.add_edge(Edge::new("B", "C", "x", 0.9));
        graph.add_edge(Edge::new("C", "D", "x", 0.9));
        graph.add_edge(Edge::new("A", "Bp", "x", 0.9));

        let mut sampler = GraphSampler::new();
        let params = SampleParams { min_len: 2, max_len: 3, ..SampleParams::default() };
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);

        let initial = sampler.start_count_of("A");
        let batch = sampler.generate_skeletons(&graph, SampleMode::Sequential, 10, &params, &mut rng);

        assert!(!batch.skeletons.is_empty());
        assert!(sampler.start_count_of("A") > initial);
    }

    #[test]
    fn neighborhood_scenario_s4() {
        let mut graph = Graph::new();
        for n in ["A", "B", "X", "Y", "Z"] {
            graph.add_node(n, attrs(n));
        }
        graph.add_edge(Edge::new("A", "B", "p", 0.9));
        graph.add_edge(Edge::new("B", "X", "p", 0.9));
        graph.add_edge(Edge::new("A", "Y", "p", 0.9));
        graph.add_edge(Edge::new("Z", "A", "p", 0.9));

        let mut sampler = GraphSampler::new();
        let params = SampleParams { min_len: 2, max_len: 2, expansion_ratio: 0.5, ..SampleParams::default() };
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);

        let batch = sampler.generate_skeletons(&graph, SampleMode::NeighborhoodSubgraph, 1, &params, &mut rng);

        assert_eq!(batch.skeletons.len(), 1);
        let skeleton = &batch.skeletons[0];
        let meta = skeleton.meta.as_ref().unwrap();
        assert_eq!(meta.distractor_nodes.len(), 2);
        assert_eq!(skeleton.nodes.len(), 4);
        assert_eq!(skeleton.edges.len(), 1);
    }
}
