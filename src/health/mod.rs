//! Background health sweeping for registered service instances.
//!
//! The sweeper polls every instance's health endpoint on a fixed interval and
//! flips the advisory `healthy` flag in the registry. Failed polls never
//! propagate anywhere; they only shape future `discover()` results.

use crate::config::HealthCheckConfig;
use crate::registry::{HealthUpdate, Registry};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Background service that periodically checks instance health.
pub struct HealthSweeper {
    registry: Arc<Registry>,
    client: reqwest::Client,
    config: HealthCheckConfig,
}

impl HealthSweeper {
    /// Create a sweeper with its own bounded-timeout HTTP client.
    pub fn new(registry: Arc<Registry>, config: HealthCheckConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            registry,
            client,
            config,
        }
    }

    /// Poll one instance; any error counts as unhealthy.
    async fn check_instance(&self, service: &str, health_url: &str) -> bool {
        let start = Instant::now();
        let healthy = match self.client.get(health_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(service, url = health_url, error = %e, "Health check failed");
                false
            }
        };

        let latency_seconds = start.elapsed().as_secs_f64();
        metrics::histogram!("gateway_health_check_seconds", "service" => service.to_string())
            .record(latency_seconds);

        healthy
    }

    /// Sweep every instance of every service once and apply the results.
    ///
    /// Works off a point-in-time snapshot: an instance registered or removed
    /// mid-sweep is picked up next round.
    pub async fn sweep_once(&self) -> Vec<HealthUpdate> {
        let snapshot = self.registry.snapshot();

        let mut updates = Vec::new();
        for (service, instances) in snapshot {
            for instance in instances {
                let healthy = self.check_instance(&service, &instance.health_url()).await;
                updates.push(HealthUpdate {
                    service: service.clone(),
                    url: instance.url,
                    healthy,
                });
            }
        }

        self.registry.apply_health(&updates);
        updates
    }

    /// Start the sweep loop as a background task.
    ///
    /// Returns a JoinHandle that resolves once the cancellation token fires,
    /// so shutdown can wait for the task instead of abandoning it.
    pub fn start(self: Arc<Self>, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(self.config.interval_seconds));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                interval_seconds = self.config.interval_seconds,
                "Health sweeper started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Health sweeper shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let updates = self.sweep_once().await;
                        tracing::debug!(
                            instances_checked = updates.len(),
                            "Health sweep completed"
                        );
                    }
                }
            }
        })
    }
}
