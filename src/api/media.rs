//! Dedicated media image passthrough.
//!
//! `/api/media/images/:key` bypasses the generic proxy: the image body is
//! streamed straight through rather than buffered, with the upstream
//! `Content-Type` preserved. Never assumes UTF-8 anywhere.

use crate::api::error::GatewayError;
use crate::api::AppState;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

const MEDIA_SERVICE: &str = "media-service";

/// GET /api/media/images/:key - stream an image from the media service.
pub async fn image(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, GatewayError> {
    let instance = state
        .registry
        .discover(MEDIA_SERVICE)
        .ok_or(GatewayError::MediaServiceUnavailable)?;

    let url = format!(
        "{}/media/image/{}",
        instance.url.trim_end_matches('/'),
        key
    );
    tracing::debug!(key = %key, url = %url, "Fetching image from media service");

    let response = state
        .http_client
        .get(&url)
        .send()
        .await
        .map_err(|e| GatewayError::ImageFetchFailed {
            details: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(GatewayError::ImageNotFound {
            details: format!("media service returned {}", response.status()),
        });
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

    let mut relayed = Response::builder()
        .status(StatusCode::OK)
        .body(Body::from_stream(response.bytes_stream()))
        .map_err(|e| GatewayError::ImageFetchFailed {
            details: e.to_string(),
        })?;
    relayed
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);

    Ok(relayed.into_response())
}
