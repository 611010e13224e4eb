//! # Gateway HTTP surface
//!
//! The axum router that fronts the shopping-list services.
//!
//! ## Endpoints
//!
//! - `/api/auth/*`, `/api/users/*`, `/api/items/*`, `/api/lists/*`,
//!   `/api/media/*`, `/tasks/*` - prefix-mapped reverse proxy (any method)
//! - `GET /api/media/images/:key` - streamed binary image passthrough
//! - `GET /api/dashboard` - list summary aggregation
//! - `GET /api/search?q=` - cross-service search
//! - `GET /health` - sweep + registry snapshot
//! - `GET|POST|DELETE /registry` - snapshot / register / unregister
//! - `GET /metrics` - Prometheus exposition
//!
//! ## Example
//!
//! ```no_run
//! use compras_gateway::api::{create_router, AppState};
//! use compras_gateway::config::GatewayConfig;
//! use compras_gateway::registry::Registry;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(Registry::new());
//! let config = Arc::new(GatewayConfig::default());
//! let state = Arc::new(AppState::new(registry, config));
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod admin;
mod aggregate;
mod error;
mod forward;
mod media;
mod routes;

pub use error::GatewayError;
pub use routes::{ProxyRoute, PROXY_ROUTES, SKIP_AUTH_HEADER};

use crate::breaker::CircuitBreaker;
use crate::config::GatewayConfig;
use crate::health::HealthSweeper;
use crate::metrics::MetricsCollector;
use crate::registry::Registry;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (50 MB, sized for the media upload passthrough).
pub const MAX_BODY_SIZE: usize = 50 * 1024 * 1024;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub registry: Arc<Registry>,
    pub config: Arc<GatewayConfig>,
    /// Client used for forwards and aggregation fetches, bounded by the
    /// configured proxy timeout
    pub http_client: reqwest::Client,
    pub breaker: CircuitBreaker,
    /// Sweeper shared with the background task so `/health` can trigger an
    /// on-demand sweep
    pub sweeper: Arc<HealthSweeper>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    pub metrics_collector: Arc<MetricsCollector>,
}

impl AppState {
    /// Create new application state with the given registry and configuration.
    pub fn new(registry: Arc<Registry>, config: Arc<GatewayConfig>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.server.proxy_timeout_seconds,
            ))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to create HTTP client");

        let breaker = CircuitBreaker::with_config(&config.breaker);
        let sweeper = Arc::new(HealthSweeper::new(
            Arc::clone(&registry),
            config.health_check.clone(),
        ));

        let start_time = Instant::now();

        // Safe to call repeatedly: tests re-create state and reuse a local
        // handle when the global recorder is already installed.
        let prometheus_handle = crate::metrics::setup_metrics().unwrap_or_else(|e| {
            tracing::debug!("Metrics already initialized, creating new handle: {}", e);
            crate::metrics::PrometheusBuilder::new()
                .build_recorder()
                .handle()
        });

        let metrics_collector = Arc::new(MetricsCollector::new(
            Arc::clone(&registry),
            start_time,
            prometheus_handle,
        ));

        Self {
            registry,
            config,
            http_client,
            breaker,
            sweeper,
            start_time,
            metrics_collector,
        }
    }
}

/// Create the main gateway router with all endpoints configured.
///
/// Dedicated routes win over the proxy fallback, so `/api/media/images/:key`
/// never reaches the generic `/api/media` mapping.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/dashboard", get(aggregate::dashboard))
        .route("/api/search", get(aggregate::search))
        .route("/api/media/images/:key", get(media::image))
        .route("/health", get(admin::health))
        .route(
            "/registry",
            get(admin::snapshot)
                .post(admin::register)
                .delete(admin::unregister),
        )
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .fallback(forward::handle)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
