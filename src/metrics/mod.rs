//! # Metrics Collection Module
//!
//! Prometheus export for gateway observability.
//!
//! **Counters:**
//! - `gateway_requests_total{service, status}` - Proxied requests
//! - `gateway_errors_total{service, error_type}` - Gateway-originated errors
//!
//! **Histograms:**
//! - `gateway_upstream_latency_seconds{service}` - Forward round-trip time
//! - `gateway_health_check_seconds{service}` - Health poll latency
//!
//! **Gauges:**
//! - `gateway_services_total` - Known service names
//! - `gateway_instances_total` - Registered instances
//! - `gateway_instances_healthy` - Instances currently flagged healthy

pub mod handler;

// Re-export PrometheusBuilder for test compatibility
pub use metrics_exporter_prometheus::PrometheusBuilder;

use crate::registry::Registry;
use std::sync::Arc;
use std::time::Instant;

/// Central coordinator for metrics collection and gauge computation.
pub struct MetricsCollector {
    /// Registry handle for computing gauges
    registry: Arc<Registry>,
    /// Gateway startup time for uptime calculation
    start_time: Instant,
    /// Prometheus handle for rendering metrics
    prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl MetricsCollector {
    pub fn new(
        registry: Arc<Registry>,
        start_time: Instant,
        prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        Self {
            registry,
            start_time,
            prometheus_handle,
        }
    }

    /// Update registry-derived gauges.
    pub fn update_registry_gauges(&self) {
        metrics::gauge!("gateway_services_total").set(self.registry.service_count() as f64);
        metrics::gauge!("gateway_instances_total").set(self.registry.instance_count() as f64);
        metrics::gauge!("gateway_instances_healthy")
            .set(self.registry.healthy_instance_count() as f64);
    }

    /// Get uptime in seconds since gateway startup.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Render Prometheus metrics in text format.
    pub fn render_metrics(&self) -> String {
        self.prometheus_handle.render()
    }
}

/// Initialize the Prometheus exporter with latency buckets sized for LAN
/// microservice hops (milliseconds to a few seconds).
///
/// Returns a PrometheusHandle that can be used to render metrics.
pub fn setup_metrics(
) -> Result<metrics_exporter_prometheus::PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

    let latency_buckets = &[
        0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
    ];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("gateway_upstream_latency_seconds".to_string()),
            latency_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("gateway_health_check_seconds".to_string()),
            latency_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, Once};

    static INIT: Once = Once::new();
    static TEST_HANDLE: Mutex<Option<metrics_exporter_prometheus::PrometheusHandle>> =
        Mutex::new(None);

    fn get_test_handle() -> metrics_exporter_prometheus::PrometheusHandle {
        INIT.call_once(|| {
            let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            *TEST_HANDLE.lock().unwrap() = Some(handle);
            metrics::set_global_recorder(Box::new(recorder)).ok();
        });

        TEST_HANDLE.lock().unwrap().as_ref().unwrap().clone()
    }

    #[test]
    fn test_collector_uptime_starts_near_zero() {
        let registry = Arc::new(Registry::new());
        let collector = MetricsCollector::new(registry, Instant::now(), get_test_handle());

        assert!(collector.uptime_seconds() < 1);
    }

    #[test]
    fn test_registry_gauges_render() {
        use crate::registry::InstanceRegistration;

        let registry = Arc::new(Registry::new());
        registry.register(
            "item-service",
            InstanceRegistration {
                url: "http://localhost:3003".to_string(),
                port: None,
                health_path: None,
            },
        );

        let collector =
            MetricsCollector::new(Arc::clone(&registry), Instant::now(), get_test_handle());
        collector.update_registry_gauges();

        let rendered = collector.render_metrics();
        assert!(rendered.contains("gateway_instances_total"));
    }
}
