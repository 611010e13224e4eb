//! Server configuration

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Timeout applied to proxied forwards. The original gateway had none,
    /// which leaves requests hanging on a slow upstream; a timed-out forward
    /// counts as a transport failure (502 + breaker).
    pub proxy_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            proxy_timeout_seconds: 30,
        }
    }
}
