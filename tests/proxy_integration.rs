//! Integration tests for the reverse-proxy path, backed by mock services.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{body_bytes, body_json, register, send, test_app, test_app_with_config};
use compras_gateway::config::GatewayConfig;
use compras_gateway::registry::Registry;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json as match_body, header as match_header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_relays_json_array_verbatim_with_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/search"))
        .and(query_param("q", "arroz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Arroz integral", "price": 8.5},
            {"name": "Arroz branco", "price": 6.0}
        ])))
        .mount(&mock_server)
        .await;

    let registry = Arc::new(Registry::new());
    register(&registry, "item-service", &mock_server.uri());
    let app = test_app(registry);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/items/search?q=arroz")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["name"], "Arroz integral");
}

#[tokio::test]
async fn test_unregistered_service_returns_503() {
    let registry = Arc::new(Registry::new());
    let app = test_app(registry);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/items/anything")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "item-service not available");
}

#[tokio::test]
async fn test_circuit_opens_after_three_transport_failures() {
    let registry = Arc::new(Registry::new());
    // Nothing listens here; every forward is a transport failure.
    register(&registry, "item-service", "http://127.0.0.1:9");
    let app = test_app(registry);

    for _ in 0..3 {
        let response = send(
            &app,
            Request::builder()
                .uri("/api/items/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "bad gateway");
        assert!(body["details"].is_string());
    }

    // Fourth call is rejected by the breaker without touching the network.
    let response = send(
        &app,
        Request::builder()
            .uri("/api/items/1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "item-service circuit open");
}

#[tokio::test]
async fn test_circuit_admits_calls_after_cooldown_expires() {
    let mut config = GatewayConfig::default();
    config.breaker.cooldown_seconds = 1;

    let registry = Arc::new(Registry::new());
    register(&registry, "item-service", "http://127.0.0.1:9");
    let app = test_app_with_config(registry, config);

    for _ in 0..3 {
        send(
            &app,
            Request::builder()
                .uri("/api/items/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    }

    let response = send(
        &app,
        Request::builder()
            .uri("/api/items/1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;

    // No probe state: the timer lapsed, so the call is attempted again and
    // fails against the dead upstream as a plain 502.
    let response = send(
        &app,
        Request::builder()
            .uri("/api/items/1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_success_closes_circuit_again() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .mount(&mock_server)
        .await;

    let registry = Arc::new(Registry::new());
    register(&registry, "item-service", "http://127.0.0.1:9");
    let app = test_app(Arc::clone(&registry));

    for _ in 0..2 {
        send(
            &app,
            Request::builder()
                .uri("/api/items/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    }

    // Swap the dead instance for a live one before the third failure.
    registry.unregister("item-service", "http://127.0.0.1:9");
    register(&registry, "item-service", &mock_server.uri());

    let response = send(
        &app,
        Request::builder()
            .uri("/api/items/1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The success reset the counter; new failures start from zero.
    registry.unregister("item-service", &mock_server.uri());
    register(&registry, "item-service", "http://127.0.0.1:9");
    for _ in 0..2 {
        let response = send(
            &app,
            Request::builder()
                .uri("/api/items/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}

#[tokio::test]
async fn test_upstream_error_status_is_relayed_not_counted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .mount(&mock_server)
        .await;

    let registry = Arc::new(Registry::new());
    register(&registry, "list-service", &mock_server.uri());
    let app = test_app(registry);

    // Well past the breaker threshold; a relayed 404 is not a failure.
    for _ in 0..5 {
        let response = send(
            &app,
            Request::builder()
                .uri("/api/lists/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "not found");
    }
}

#[tokio::test]
async fn test_post_body_and_auth_header_forwarded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/lists"))
        .and(match_header("authorization", "Bearer token-123"))
        .and(match_body(json!({"name": "Feira"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
        .mount(&mock_server)
        .await;

    let registry = Arc::new(Registry::new());
    register(&registry, "list-service", &mock_server.uri());
    let app = test_app(registry);

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/lists")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, "Bearer token-123")
            .body(Body::from(serde_json::to_vec(&json!({"name": "Feira"})).unwrap()))
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "abc");
}

#[tokio::test]
async fn test_tasks_alias_rewrites_and_injects_skip_auth() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/7"))
        .and(match_header("x-skip-auth", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "7"})))
        .mount(&mock_server)
        .await;

    let registry = Arc::new(Registry::new());
    register(&registry, "list-service", &mock_server.uri());
    let app = test_app(registry);

    let response = send(
        &app,
        Request::builder()
            .uri("/tasks/7")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "7");
}

#[tokio::test]
async fn test_generic_media_route_forwards() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "count": 0})),
        )
        .mount(&mock_server)
        .await;

    let registry = Arc::new(Registry::new());
    register(&registry, "media-service", &mock_server.uri());
    let app = test_app(registry);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/media/list")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_non_json_body_relayed_with_content_type() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/export"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("name;price\narroz;8.5")
                .insert_header("content-type", "text/csv"),
        )
        .mount(&mock_server)
        .await;

    let registry = Arc::new(Registry::new());
    register(&registry, "item-service", &mock_server.uri());
    let app = test_app(registry);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/items/export")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );
    let body = body_bytes(response).await;
    assert_eq!(body, b"name;price\narroz;8.5");
}

#[tokio::test]
async fn test_unmapped_path_returns_404() {
    let registry = Arc::new(Registry::new());
    let app = test_app(registry);

    let response = send(
        &app,
        Request::builder()
            .uri("/definitely/not/mapped")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not found");
}
