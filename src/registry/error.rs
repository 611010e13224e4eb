use std::path::PathBuf;

/// Errors that can occur while loading or saving the registry snapshot
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}
