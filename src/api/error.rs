//! Gateway error taxonomy.
//!
//! Every error the gateway itself originates maps to a stable JSON body;
//! upstream non-2xx responses are relayed as-is and never pass through here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors produced by the gateway while routing, forwarding, or aggregating.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No registry entry for the target service
    #[error("{0} not available")]
    ServiceUnavailable(String),

    /// Circuit breaker cooldown active for the target service
    #[error("{0} circuit open")]
    CircuitOpen(String),

    /// Transport failure while forwarding
    #[error("bad gateway: {details}")]
    BadGateway { details: String },

    /// Dashboard aggregation needs list-service and it is undiscoverable
    #[error("list service unavailable")]
    ListServiceUnavailable,

    /// Dashboard fetch or response shaping failed
    #[error("failed to build dashboard")]
    DashboardFailed,

    /// Search hit a transport failure on a discovered source
    #[error("search failed")]
    SearchFailed,

    /// Media image path: media-service undiscoverable
    #[error("media service unavailable")]
    MediaServiceUnavailable,

    /// Media image path: upstream answered non-OK
    #[error("image not found: {details}")]
    ImageNotFound { details: String },

    /// Media image path: transport failure
    #[error("failed to fetch image: {details}")]
    ImageFetchFailed { details: String },

    /// Inbound path matches no proxy prefix or gateway route
    #[error("not found")]
    RouteNotFound,
}

impl GatewayError {
    /// Label used on the `gateway_errors_total` metric.
    pub fn metric_label(&self) -> &'static str {
        match self {
            GatewayError::ServiceUnavailable(_) => "service_unavailable",
            GatewayError::CircuitOpen(_) => "circuit_open",
            GatewayError::BadGateway { .. } => "bad_gateway",
            GatewayError::ListServiceUnavailable => "list_service_unavailable",
            GatewayError::DashboardFailed => "dashboard_failed",
            GatewayError::SearchFailed => "search_failed",
            GatewayError::MediaServiceUnavailable => "media_service_unavailable",
            GatewayError::ImageNotFound { .. } => "image_not_found",
            GatewayError::ImageFetchFailed { .. } => "image_fetch_failed",
            GatewayError::RouteNotFound => "route_not_found",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            GatewayError::ServiceUnavailable(service) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": format!("{} not available", service) }),
            ),
            GatewayError::CircuitOpen(service) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": format!("{} circuit open", service) }),
            ),
            GatewayError::BadGateway { details } => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "bad gateway", "details": details }),
            ),
            GatewayError::ListServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "list service unavailable" }),
            ),
            GatewayError::DashboardFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "failed to build dashboard" }),
            ),
            GatewayError::SearchFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "search failed" }),
            ),
            GatewayError::MediaServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "media service unavailable" }),
            ),
            GatewayError::ImageNotFound { details } => (
                StatusCode::NOT_FOUND,
                json!({ "error": "image not found", "details": details }),
            ),
            GatewayError::ImageFetchFailed { details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "failed to fetch image", "details": details }),
            ),
            GatewayError::RouteNotFound => {
                (StatusCode::NOT_FOUND, json!({ "error": "not found" }))
            }
        };

        (status, Json(body)).into_response()
    }
}
