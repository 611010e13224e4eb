//! Shared helpers for gateway integration tests.

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use compras_gateway::api::{create_router, AppState};
use compras_gateway::config::GatewayConfig;
use compras_gateway::registry::{InstanceRegistration, Registry};
use std::sync::Arc;
use tower::Service;

/// Build a gateway app over the given registry with default configuration.
pub fn test_app(registry: Arc<Registry>) -> Router {
    test_app_with_config(registry, GatewayConfig::default())
}

pub fn test_app_with_config(registry: Arc<Registry>, config: GatewayConfig) -> Router {
    let state = Arc::new(AppState::new(registry, Arc::new(config)));
    create_router(state)
}

/// Register an instance with default fields.
pub fn register(registry: &Registry, service: &str, url: &str) {
    registry.register(
        service,
        InstanceRegistration {
            url: url.to_string(),
            port: None,
            health_path: None,
        },
    );
}

/// Drive one request through the app and return the response.
pub async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    let mut app = app.clone();
    app.call(request).await.unwrap()
}

/// Read a response body fully.
pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Read a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
