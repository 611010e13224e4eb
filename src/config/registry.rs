//! Registry persistence configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the registry snapshot lives on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub data_file: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/service-registry.json"),
        }
    }
}
