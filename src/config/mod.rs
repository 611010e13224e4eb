//! Configuration module for the gateway
//!
//! Provides layered configuration loading from files, environment variables,
//! and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`GATEWAY_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use compras_gateway::config::GatewayConfig;
//!
//! let config = GatewayConfig::default();
//! assert_eq!(config.server.port, 3000);
//!
//! let toml = r#"
//! [server]
//! port = 9000
//! "#;
//! let config: GatewayConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.port, 9000);
//! ```

pub mod breaker;
pub mod error;
pub mod health_check;
pub mod logging;
pub mod registry;
pub mod server;
pub mod service;

pub use breaker::BreakerConfig;
pub use error::ConfigError;
pub use health_check::HealthCheckConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use registry::RegistryConfig;
pub use server::ServerConfig;
pub use service::ServiceConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the gateway process.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Background health sweep settings
    pub health_check: HealthCheckConfig,
    /// Circuit breaker policy
    pub breaker: BreakerConfig,
    /// Registry snapshot persistence
    pub registry: RegistryConfig,
    /// Service instances registered at startup
    pub services: Vec<ServiceConfig>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Load configuration from a TOML file.
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supports GATEWAY_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("GATEWAY_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Ok(level) = std::env::var("GATEWAY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GATEWAY_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(data_file) = std::env::var("GATEWAY_DATA_FILE") {
            self.registry.data_file = data_file.into();
        }
        self
    }

    /// Reject configurations the gateway cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.health_check.interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "health_check.interval_seconds".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.health_check.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "health_check.timeout_seconds".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.breaker.failure_threshold == 0 {
            return Err(ConfigError::Validation {
                field: "breaker.failure_threshold".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        for service in &self.services {
            if service.name.is_empty() || service.url.is_empty() {
                return Err(ConfigError::Validation {
                    field: "services".to_string(),
                    message: "name and url must be non-empty".to_string(),
                });
            }
        }
        let mut seen = std::collections::HashSet::new();
        for service in &self.services {
            if !seen.insert((service.name.as_str(), service.url.as_str())) {
                return Err(ConfigError::Validation {
                    field: "services".to_string(),
                    message: format!("duplicate seed {} {}", service.name, service.url),
                });
            }
        }
        Ok(())
    }
}
