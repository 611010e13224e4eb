//! Generic reverse-proxy handler.
//!
//! Fallback for every path not claimed by a dedicated gateway route: resolve
//! the prefix table, discover an instance, pass the circuit breaker gate,
//! forward, and relay the upstream response. The proxied body is treated as
//! an opaque byte sequence end to end; JSON is only a best-effort re-shaping
//! of the response, never an assumption about the request.

use crate::api::error::GatewayError;
use crate::api::routes::{self, ProxyRoute, SKIP_AUTH_HEADER};
use crate::api::{AppState, MAX_BODY_SIZE};
use crate::logging::generate_request_id;
use axum::body::{to_bytes, Bytes};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

/// Fallback handler implementing the prefix-mapped proxy.
pub async fn handle(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let path = req.uri().path().to_string();
    let Some((route, mapped_path)) = routes::resolve(&path) else {
        return GatewayError::RouteNotFound.into_response();
    };

    let query = req.uri().query().map(str::to_string);
    let method = req.method().clone();
    let headers = req.headers().clone();

    let body = match to_bytes(req.into_body(), MAX_BODY_SIZE).await {
        Ok(body) => body,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "failed to read request body", "details": e.to_string() })),
            )
                .into_response();
        }
    };

    match forward(&state, route, &mapped_path, query.as_deref(), method, headers, body).await {
        Ok(response) => response,
        Err(e) => {
            metrics::counter!("gateway_errors_total",
                "service" => route.service,
                "error_type" => e.metric_label()
            )
            .increment(1);
            e.into_response()
        }
    }
}

/// Forward one request to the resolved service and relay the response.
async fn forward(
    state: &Arc<AppState>,
    route: &'static ProxyRoute,
    mapped_path: &str,
    query: Option<&str>,
    method: Method,
    mut headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let service = route.service;

    let instance = state
        .registry
        .discover(service)
        .ok_or_else(|| GatewayError::ServiceUnavailable(service.to_string()))?;

    if state.breaker.is_open(service) {
        return Err(GatewayError::CircuitOpen(service.to_string()));
    }

    let mut url = format!("{}{}", instance.url.trim_end_matches('/'), mapped_path);
    if let Some(q) = query {
        url.push('?');
        url.push_str(q);
    }

    // The upstream sees its own host; framing headers are recomputed by the
    // client for the forwarded body.
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::TRANSFER_ENCODING);
    if route.inject_skip_auth {
        headers.insert(SKIP_AUTH_HEADER, HeaderValue::from_static("true"));
    }

    let request_id = generate_request_id();
    tracing::info!(
        request_id = %request_id,
        method = %method,
        service,
        url = %url,
        "Proxying request"
    );

    let mut builder = state.http_client.request(method.clone(), &url).headers(headers);
    if method != Method::GET && method != Method::HEAD {
        builder = builder.body(body);
    }

    let start = Instant::now();
    let outcome = async {
        let response = builder.send().await?;
        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let bytes = response.bytes().await?;
        Ok::<_, reqwest::Error>((status, content_type, bytes))
    }
    .await;

    metrics::histogram!("gateway_upstream_latency_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());

    match outcome {
        Ok((status, content_type, bytes)) => {
            // Any completed exchange closes the circuit; a non-2xx answer is
            // the upstream's to report, not a gateway failure.
            state.breaker.record_success(service);
            metrics::counter!("gateway_requests_total",
                "service" => service,
                "status" => status.as_u16().to_string()
            )
            .increment(1);
            Ok(relay(status, content_type, bytes))
        }
        Err(e) => {
            state.breaker.record_failure(service);
            metrics::counter!("gateway_requests_total",
                "service" => service,
                "status" => "502"
            )
            .increment(1);
            tracing::warn!(request_id = %request_id, service, error = %e, "Forward failed");
            Err(GatewayError::BadGateway {
                details: e.to_string(),
            })
        }
    }
}

/// Mirror the upstream status; serve JSON when the body parses as JSON,
/// otherwise relay the raw bytes with the upstream content type.
fn relay(status: StatusCode, content_type: Option<HeaderValue>, bytes: Bytes) -> Response {
    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(value) => (status, Json(value)).into_response(),
        Err(_) => {
            let mut response = (status, bytes).into_response();
            if let Some(ct) = content_type {
                response.headers_mut().insert(header::CONTENT_TYPE, ct);
            }
            response
        }
    }
}
