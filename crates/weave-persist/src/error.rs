//! Persistence failure taxonomy (spec.md §7): a missing checkpoint is
//! "not loaded", a corrupt or version-mismatched one is fatal.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("checkpoint not found at {0}")]
    NotFound(PathBuf),
    #[error("checkpoint at {path} is corrupted or from an incompatible schema version: {reason}")]
    Corrupted { path: PathBuf, reason: String },
    #[error("io error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
