use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health endpoint used when a registration does not name one.
pub const DEFAULT_HEALTH_PATH: &str = "/health";

/// One running copy of a backend service, identified by its base URL.
///
/// Instances are keyed by `(service name, url)` inside the registry; the
/// record itself carries everything a health sweep or a proxy forward needs.
/// Field names serialize camelCase to stay compatible with the snapshot
/// format the services already read and write.
///
/// # Examples
///
/// ```
/// use compras_gateway::registry::ServiceInstance;
///
/// let instance = ServiceInstance::new("http://localhost:3003".to_string());
/// assert_eq!(instance.health_path, "/health");
/// assert!(instance.healthy);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstance {
    /// Base URL for requests to this instance
    pub url: String,
    /// Listening port, when the service reports one separately from the URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Path polled by the health sweeper
    pub health_path: String,
    /// When the instance registered
    pub registered_at: DateTime<Utc>,
    /// Last observed health flag; advisory, refreshed by the sweeper
    pub healthy: bool,
}

impl ServiceInstance {
    /// Create an instance with the default health path, flagged healthy.
    ///
    /// New registrations start healthy so they are immediately discoverable;
    /// the next sweep corrects the flag if the instance is not responding.
    pub fn new(url: String) -> Self {
        Self {
            url,
            port: None,
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            registered_at: Utc::now(),
            healthy: true,
        }
    }

    /// Absolute URL the health sweeper polls for this instance.
    pub fn health_url(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), self.health_path)
    }
}

/// Caller-supplied fields of a registration request.
///
/// Merged with gateway-owned fields (`registered_at`, `healthy`) by
/// `Registry::register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRegistration {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_path: Option<String>,
}

impl From<InstanceRegistration> for ServiceInstance {
    fn from(reg: InstanceRegistration) -> Self {
        Self {
            url: reg.url,
            port: reg.port,
            health_path: reg
                .health_path
                .unwrap_or_else(|| DEFAULT_HEALTH_PATH.to_string()),
            registered_at: Utc::now(),
            healthy: true,
        }
    }
}
