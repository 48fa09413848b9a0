//! Edge candidates (pre-adjudication) and accepted edges (post-adjudication).

use serde::{Deserialize, Serialize};

/// A proposed edge from C4, awaiting either auto-acceptance or C5
/// adjudication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeCandidate {
    pub producer: String,
    pub consumer: String,
    pub parameter: String,
    /// Cosine similarity in `[0, 1]` (vectors are L2-normalized at the
    /// embedding cache boundary, so the dot product is the cosine).
    pub score: f32,
}

/// An accepted edge in the tool dependency graph. A given ordered pair
/// `(producer, consumer)` may carry multiple `Edge`s, one per satisfying
/// parameter, making the graph a multigraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub producer: String,
    pub consumer: String,
    pub parameter: String,
    /// Derived from the embedding similarity; influences sampling
    /// probability only, never correctness.
    pub weight: f32,
    pub relation: String,
}

impl Edge {
    pub fn new(producer: impl Into<String>, consumer: impl Into<String>, parameter: impl Into<String>, weight: f32) -> Self {
        Self {
            producer: producer.into(),
            consumer: consumer.into(),
            parameter: parameter.into(),
            weight,
            relation: "provides_parameter".to_string(),
        }
    }

    /// The multigraph key: collisions on this triple are resolved by
    /// keeping the highest-weight edge.
    pub fn key(&self) -> (String, String, String) {
        (self.producer.clone(), self.consumer.clone(), self.parameter.clone())
    }
}

impl From<EdgeCandidate> for Edge {
    fn from(c: EdgeCandidate) -> Self {
        Edge::new(c.producer, c.consumer, c.parameter, c.score)
    }
}
