//! Aggregation endpoints: dashboard and cross-service search.
//!
//! Both compose data from the backing services on the caller's behalf. The
//! payloads stay untyped (`serde_json::Value`) — the gateway summarizes and
//! merges, it does not own the list or item schemas.

use crate::api::error::GatewayError;
use crate::api::AppState;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const LIST_SERVICE: &str = "list-service";
const ITEM_SERVICE: &str = "item-service";

/// GET /api/dashboard - summarize the caller's lists.
///
/// The Authorization header is forwarded to list-service untouched; the
/// gateway does not validate tokens. Missing `items` arrays and missing
/// summaries count as zero.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, GatewayError> {
    let instance = state
        .registry
        .discover(LIST_SERVICE)
        .ok_or(GatewayError::ListServiceUnavailable)?;

    let mut request = state
        .http_client
        .get(format!("{}/lists", instance.url.trim_end_matches('/')));
    if let Some(auth) = headers.get(header::AUTHORIZATION) {
        request = request.header(header::AUTHORIZATION, auth);
    }

    let lists: Vec<Value> = request
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Dashboard fetch failed");
            GatewayError::DashboardFailed
        })?
        .json()
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Dashboard response was not a list array");
            GatewayError::DashboardFailed
        })?;

    let total_lists = lists.len();
    let total_items: usize = lists
        .iter()
        .map(|l| l["items"].as_array().map_or(0, Vec::len))
        .sum();
    let estimated_total: f64 = lists
        .iter()
        .map(|l| l["summary"]["estimatedTotal"].as_f64().unwrap_or(0.0))
        .sum();

    Ok(Json(json!({
        "totalLists": total_lists,
        "totalItems": total_items,
        "estimatedTotal": estimated_total,
        "lists": lists,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /api/search?q= - merge item-service search hits with name-matched lists.
///
/// Each source is optional: an undiscoverable service contributes an empty
/// array, as does a non-OK upstream answer. A transport failure from a
/// service we did discover is the unexpected case and fails the request.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, GatewayError> {
    let items_fut = async {
        let Some(instance) = state.registry.discover(ITEM_SERVICE) else {
            return Ok(Vec::new());
        };
        let response = state
            .http_client
            .get(format!("{}/search", instance.url.trim_end_matches('/')))
            .query(&[("q", &params.q)])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Item search failed");
                GatewayError::SearchFailed
            })?;
        if !response.status().is_success() {
            return Ok(Vec::new());
        }
        response.json::<Vec<Value>>().await.map_err(|e| {
            tracing::warn!(error = %e, "Item search response unreadable");
            GatewayError::SearchFailed
        })
    };

    let lists_fut = async {
        let Some(instance) = state.registry.discover(LIST_SERVICE) else {
            return Ok(Vec::new());
        };
        let response = state
            .http_client
            .get(format!("{}/lists", instance.url.trim_end_matches('/')))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "List fetch failed");
                GatewayError::SearchFailed
            })?;
        if !response.status().is_success() {
            return Ok(Vec::new());
        }
        let all: Vec<Value> = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "List response unreadable");
            GatewayError::SearchFailed
        })?;
        let needle = params.q.to_lowercase();
        Ok(all
            .into_iter()
            .filter(|l| {
                l["name"]
                    .as_str()
                    .unwrap_or("")
                    .to_lowercase()
                    .contains(&needle)
            })
            .collect::<Vec<Value>>())
    };

    let (items, lists) = futures::join!(items_fut, lists_fut);
    let (items, lists) = (items?, lists?);

    Ok(Json(json!({ "items": items, "lists": lists })))
}
