//! Persistence (C9): the opaque checkpoint envelope reload depends on,
//! plus read-only JSON/GraphML/export views of a built graph, skeleton
//! batch, or intent batch.

pub mod checkpoint;
pub mod error;
pub mod export;

pub use checkpoint::{load_checkpoint, save_checkpoint, Checkpoint, SCHEMA_VERSION};
pub use error::PersistError;
pub use export::{graph_to_graphml, graph_to_json, graph_to_json_string, intents_to_json, skeletons_to_json, GraphJson};
