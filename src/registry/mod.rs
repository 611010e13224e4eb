//! Service registry module.
//!
//! Provides thread-safe in-memory storage and discovery of backend service
//! instances, with an optional durable JSON snapshot behind it.

mod error;
mod instance;
mod store;

pub use error::*;
pub use instance::*;
pub use store::*;

use dashmap::DashMap;

/// The service registry maps logical service names to their live instances.
///
/// Instances are kept in insertion order per service; uniqueness is by
/// `(service name, url)`. Mutations are mirrored to the snapshot store when
/// one is attached. Registry operations themselves never fail: a snapshot
/// write that goes wrong is logged and memory stays authoritative, so a
/// flaky disk cannot take discovery down with it.
///
/// # Examples
///
/// ```
/// use compras_gateway::registry::{InstanceRegistration, Registry};
///
/// let registry = Registry::new();
/// registry.register("item-service", InstanceRegistration {
///     url: "http://localhost:3003".to_string(),
///     port: None,
///     health_path: None,
/// });
///
/// let instance = registry.discover("item-service").unwrap();
/// assert_eq!(instance.url, "http://localhost:3003");
/// ```
pub struct Registry {
    services: DashMap<String, Vec<ServiceInstance>>,
    store: Option<SnapshotStore>,
}

impl Registry {
    /// Create an empty, memory-only registry.
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
            store: None,
        }
    }

    /// Create a registry backed by a snapshot file, loading whatever the
    /// previous process left behind.
    pub fn with_store(store: SnapshotStore) -> Result<Self, RegistryError> {
        let snapshot = store.load()?;
        let services = DashMap::new();
        for (name, instances) in snapshot {
            services.insert(name, instances);
        }
        Ok(Self {
            services,
            store: Some(store),
        })
    }

    /// Register an instance under a service name.
    ///
    /// Idempotent by `(name, url)`: when an instance with the same url is
    /// already present this is a no-op, so services can re-register on every
    /// startup without piling up duplicates.
    pub fn register(&self, name: &str, registration: InstanceRegistration) {
        let mut instances = self.services.entry(name.to_string()).or_default();
        if instances.iter().any(|i| i.url == registration.url) {
            return;
        }
        let instance = ServiceInstance::from(registration);
        tracing::info!(service = name, url = %instance.url, "Instance registered");
        instances.push(instance);
        drop(instances);
        self.persist();
    }

    /// Remove the instance with the given url; drops the service name entirely
    /// when its last instance goes. No-op when nothing matches.
    pub fn unregister(&self, name: &str, url: &str) {
        let mut removed = false;
        if let Some(mut instances) = self.services.get_mut(name) {
            let before = instances.len();
            instances.retain(|i| i.url != url);
            removed = instances.len() != before;
        }
        self.services.remove_if(name, |_, instances| instances.is_empty());
        if removed {
            tracing::info!(service = name, url, "Instance unregistered");
            self.persist();
        }
    }

    /// Resolve a service name to an instance.
    ///
    /// Prefers the first instance flagged healthy; when none are, falls back
    /// to the first instance regardless. Health data is advisory and may be
    /// stale, and attempting a possibly-dead instance beats refusing outright.
    pub fn discover(&self, name: &str) -> Option<ServiceInstance> {
        let instances = self.services.get(name)?;
        instances
            .iter()
            .find(|i| i.healthy)
            .or_else(|| instances.first())
            .cloned()
    }

    /// Full registry dump for observability and persistence.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.services
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Apply the outcome of a health sweep, persisting once for the batch.
    ///
    /// Updates for instances that disappeared mid-sweep are dropped silently.
    pub fn apply_health(&self, updates: &[HealthUpdate]) {
        for update in updates {
            if let Some(mut instances) = self.services.get_mut(&update.service) {
                if let Some(instance) = instances.iter_mut().find(|i| i.url == update.url) {
                    if instance.healthy != update.healthy {
                        tracing::info!(
                            service = %update.service,
                            url = %update.url,
                            healthy = update.healthy,
                            "Instance health changed"
                        );
                    }
                    instance.healthy = update.healthy;
                }
            }
        }
        self.persist();
    }

    /// Number of known service names.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Total instances across all services.
    pub fn instance_count(&self) -> usize {
        self.services.iter().map(|e| e.value().len()).sum()
    }

    /// Instances currently flagged healthy.
    pub fn healthy_instance_count(&self) -> usize {
        self.services
            .iter()
            .map(|e| e.value().iter().filter(|i| i.healthy).count())
            .sum()
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.snapshot()) {
                tracing::warn!(error = %e, "Failed to persist registry snapshot");
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// One instance's result from a health sweep.
#[derive(Debug, Clone)]
pub struct HealthUpdate {
    pub service: String,
    pub url: String,
    pub healthy: bool,
}
