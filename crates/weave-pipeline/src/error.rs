//! Top-level error taxonomy: only configuration/input and checkpoint
//! errors are fatal to a pipeline caller (spec.md §7 propagation policy);
//! everything downstream of graph assembly degrades by omission instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("tool corpus is malformed: {0}")]
    MalformedInput(#[from] weave_core::RegistryError),

    #[error("no embeddings were obtained for any tool or parameter")]
    NoEmbeddings,

    #[error(transparent)]
    Persist(#[from] weave_persist::PersistError),
}
