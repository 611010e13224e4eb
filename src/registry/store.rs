//! Durable snapshot storage for the registry.
//!
//! The whole registry persists as one pretty-printed JSON document, the same
//! name → instance-list shape the services expect. Every save overwrites the
//! full snapshot; the write goes through a temp file in the same directory
//! followed by a rename, so a save either fully lands or leaves the previous
//! snapshot intact.

use super::error::RegistryError;
use super::instance::ServiceInstance;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Registry contents as persisted: service name → instances in insertion order.
pub type RegistrySnapshot = BTreeMap<String, Vec<ServiceInstance>>;

/// File-backed snapshot store.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted snapshot.
    ///
    /// A missing file is an empty registry. A file that cannot be parsed is
    /// treated the same, with a warning: a half-written or hand-mangled
    /// snapshot must not keep the gateway from starting.
    pub fn load(&self) -> Result<RegistrySnapshot, RegistryError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(RegistrySnapshot::new());
            }
            Err(source) => {
                return Err(RegistryError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Registry snapshot unreadable, starting empty"
                );
                Ok(RegistrySnapshot::new())
            }
        }
    }

    /// Overwrite the persisted snapshot atomically.
    pub fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), RegistryError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|source| RegistryError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let encoded = serde_json::to_vec_pretty(snapshot)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &encoded).map_err(|source| RegistryError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| RegistryError::Write {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }
}
