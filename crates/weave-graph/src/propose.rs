//! Edge Proposer (C4): cosine similarity between every producer's
//! description vector and every consumer `(tool, parameter)` vector,
//! sharded by consumer column and run with `rayon` — "embarrassingly
//! parallel on j" (spec.md §5), and already a dependency of the
//! teacher's `vex-core` crate, so no new dependency is introduced.

use rayon::prelude::*;

use weave_core::EdgeCandidate;
use weave_embed::EmbeddingCache;

use crate::config::GraphConfig;

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Propose candidate edges: for every consumer `(tool, parameter)`
/// column, score every producer and keep the top `top_k` producers
/// (or all of them, if fewer) whose score clears `recall_threshold`.
/// Self-edges (a tool consuming its own parameter) are never proposed.
pub fn propose_edges(cache: &EmbeddingCache, config: &GraphConfig) -> Vec<EdgeCandidate> {
    let producers = cache.producer_names();
    let consumers = cache.consumer_pairs();

    consumers
        .par_iter()
        .flat_map(|(consumer, parameter)| {
            let consumer_vec = match cache.param_vector(consumer, parameter) {
                Some(v) => v,
                None => return Vec::new(),
            };

            let mut scored: Vec<EdgeCandidate> = producers
                .iter()
                .filter(|producer| *producer != consumer)
                .filter_map(|producer| {
                    let producer_vec = cache.tool_vector(producer)?;
                    let score = dot(producer_vec, consumer_vec);
                    if score >= config.recall_threshold {
                        Some(EdgeCandidate {
                            producer: producer.clone(),
                            consumer: consumer.clone(),
                            parameter: parameter.clone(),
                            score,
                        })
                    } else {
                        None
                    }
                })
                .collect();

            scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
            scored.truncate(config.top_k.max(1));
            scored
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with(pairs: &[(&str, Vec<f32>)], params: &[(&str, &str, Vec<f32>)]) -> EmbeddingCache {
        let mut cache = EmbeddingCache::new();
        for (name, vec) in pairs {
            cache.insert_tool_vector(*name, vec.clone());
        }
        for (tool, param, vec) in params {
            cache.insert_param_vector(*tool, *param, vec.clone());
        }
        cache
    }

    #[test]
    fn proposes_above_threshold_and_excludes_self_edges() {
        let cache = cache_with(
            &[("producer_a", vec![1.0, 0.0]), ("consumer_b", vec![0.0, 1.0])],
            &[
                ("consumer_b", "city", vec![1.0, 0.0]),
                ("producer_a", "city", vec![1.0, 0.0]),
            ],
        );
        let config = GraphConfig { recall_threshold: 0.5, ..GraphConfig::default() };

        let candidates = propose_edges(&cache, &config);

        // consumer_b's "city" param matches producer_a but not itself.
        assert!(candidates
            .iter()
            .any(|c| c.producer == "producer_a" && c.consumer == "consumer_b" && c.parameter == "city"));
        assert!(!candidates.iter().any(|c| c.producer == c.consumer));
    }

    #[test]
    fn truncates_to_top_k() {
        let mut cache = EmbeddingCache::new();
        for i in 0..10 {
            cache.insert_tool_vector(format!("producer_{i}"), vec![1.0, 0.0]);
        }
        cache.insert_tool_vector("consumer", vec![0.0, 1.0]);
        cache.insert_param_vector("consumer", "p", vec![1.0, 0.0]);

        let config = GraphConfig { recall_threshold: 0.0, top_k: 3, ..GraphConfig::default() };
        let candidates = propose_edges(&cache, &config);

        assert_eq!(candidates.len(), 3);
    }
}
