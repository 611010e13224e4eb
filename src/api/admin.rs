//! Gateway admin surface: health, registry snapshot, registration.

use crate::api::AppState;
use crate::registry::InstanceRegistration;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /health - run one sweep and report the refreshed registry.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.sweeper.sweep_once().await;
    Json(json!({
        "gateway": "ok",
        "registry": state.registry.snapshot(),
    }))
}

/// GET /registry - raw registry snapshot.
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.registry.snapshot()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub service: String,
    #[serde(flatten)]
    pub instance: InstanceRegistration,
}

/// POST /registry - self-registration for service instances.
///
/// Idempotent by (service, url); re-registering an existing instance changes
/// nothing.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Json<Value> {
    state.registry.register(&request.service, request.instance);
    Json(json!({ "registered": true }))
}

#[derive(Debug, Deserialize)]
pub struct UnregisterParams {
    pub service: String,
    pub url: String,
}

/// DELETE /registry?service=&url= - deregistration on shutdown.
pub async fn unregister(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UnregisterParams>,
) -> Json<Value> {
    state.registry.unregister(&params.service, &params.url);
    Json(json!({ "unregistered": true }))
}
