//! The opaque checkpoint envelope: graph + registry + embedding cache,
//! written via write-to-temp-then-rename so a crash mid-write never
//! leaves a half-written file at the final path. Adapted from
//! `vex-anchor`'s file backend, which uses the same temp-then-rename
//! discipline for crash-safe writes, generalized here from append-only
//! to whole-file atomic replace.

use std::path::Path;

use serde::{Deserialize, Serialize};

use weave_core::ToolRegistry;
use weave_embed::EmbeddingCache;
use weave_graph::Graph;

use crate::error::PersistError;

/// Bumped on any incompatible field change to [`Checkpoint`]. A mismatch
/// on load is [`PersistError::Corrupted`], never a silent migration.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    pub schema_version: u32,
    pub registry: ToolRegistry,
    pub embeddings: EmbeddingCache,
    pub graph: Graph,
}

impl Checkpoint {
    pub fn new(registry: ToolRegistry, embeddings: EmbeddingCache, graph: Graph) -> Self {
        Self { schema_version: SCHEMA_VERSION, registry, embeddings, graph }
    }
}

/// Atomically write `checkpoint` to `path`: serialize with `bincode`
/// into a temp file in the same directory, then rename over the final
/// path so readers never observe a partial write.
pub fn save_checkpoint(checkpoint: &Checkpoint, path: &Path) -> Result<(), PersistError> {
    let bytes = bincode::serialize(checkpoint).map_err(|e| PersistError::Corrupted {
        path: path.to_path_buf(),
        reason: format!("failed to encode checkpoint: {e}"),
    })?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| PersistError::Io { path: path.to_path_buf(), source: e })?;

    use std::io::Write;
    temp.write_all(&bytes).map_err(|e| PersistError::Io { path: path.to_path_buf(), source: e })?;
    temp.flush().map_err(|e| PersistError::Io { path: path.to_path_buf(), source: e })?;

    temp.persist(path)
        .map_err(|e| PersistError::Io { path: path.to_path_buf(), source: e.error })?;

    Ok(())
}

/// Load a checkpoint, failing with [`PersistError::NotFound`] if the
/// file is missing and [`PersistError::Corrupted`] on any decode
/// failure or schema version mismatch.
pub fn load_checkpoint(path: &Path) -> Result<Checkpoint, PersistError> {
    if !path.exists() {
        return Err(PersistError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|e| PersistError::Io { path: path.to_path_buf(), source: e })?;
    let checkpoint: Checkpoint = bincode::deserialize(&bytes).map_err(|e| PersistError::Corrupted {
        path: path.to_path_buf(),
        reason: format!("failed to decode checkpoint: {e}"),
    })?;

    if checkpoint.schema_version != SCHEMA_VERSION {
        return Err(PersistError::Corrupted {
            path: path.to_path_buf(),
            reason: format!("schema version {} does not match supported version {SCHEMA_VERSION}", checkpoint.schema_version),
        });
    }

    Ok(checkpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::ToolRegistry;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.bin");

        let registry = ToolRegistry::load_ndjson(r#"{"name":"a","description":"d"}"#).unwrap();
        let checkpoint = Checkpoint::new(registry, EmbeddingCache::new(), Graph::new());

        save_checkpoint(&checkpoint, &path).unwrap();
        let loaded = load_checkpoint(&path).unwrap();

        assert_eq!(loaded.schema_version, SCHEMA_VERSION);
        assert!(loaded.registry.contains("a"));
    }

    #[test]
    fn missing_checkpoint_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        assert!(matches!(load_checkpoint(&path), Err(PersistError::NotFound(_))));
    }

    #[test]
    fn corrupted_checkpoint_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, b"not a valid checkpoint").unwrap();
        assert!(matches!(load_checkpoint(&path), Err(PersistError::Corrupted { .. })));
    }
}
