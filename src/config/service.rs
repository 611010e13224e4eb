//! Static service seed configuration

use serde::{Deserialize, Serialize};

/// A service instance registered at gateway startup.
///
/// Seeds cover deployments where the services do not self-register over the
/// HTTP surface; they go through the same idempotent registration path, so
/// listing an instance that later re-registers itself is harmless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Logical service name, e.g. "item-service"
    pub name: String,
    /// Base URL of the instance
    pub url: String,
    /// Health endpoint override; defaults to /health
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_path: Option<String>,
}
