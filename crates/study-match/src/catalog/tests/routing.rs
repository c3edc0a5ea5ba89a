use super::common::*;
use crate::catalog::router::catalog_router;
use crate::catalog::service::CatalogSearchService;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn build_router() -> axum::Router {
    let service = Arc::new(CatalogSearchService::new(
        Arc::new(MemoryCatalog::new(sample_records())),
        Arc::new(euro_rates()),
        search_config(0),
    ));
    catalog_router(service)
}

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn search_endpoint_returns_annotated_matches() {
    let router = build_router();
    let payload = json!({
        "countries": ["Germany"],
        "grade": { "value": 3.5, "system": "cgpa-4" },
        "currency": "USD",
        "now": "2026-03-01T12:00:00Z",
    });

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/catalog/search")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request");

    let response = router.oneshot(request).await.expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    let matches = body.get("matches").and_then(Value::as_array).expect("matches");
    assert_eq!(matches.len(), 1);
    assert_eq!(
        matches[0].pointer("/record/name").and_then(Value::as_str),
        Some("Technical University of Munich"),
    );
    assert_eq!(
        matches[0].pointer("/intake/status").and_then(Value::as_str),
        Some("open"),
    );
}

#[tokio::test]
async fn record_endpoint_returns_404_for_unknown_ids() {
    let router = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/catalog/records/est-404")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body.get("record_id"), Some(&json!("est-404")));
}

#[tokio::test]
async fn record_endpoint_returns_annotated_record() {
    let router = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/catalog/records/est-003")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(
        body.pointer("/record/city").and_then(Value::as_str),
        Some("Toronto"),
    );
    assert!(body.pointer("/intake/status").is_some());
}

#[tokio::test]
async fn provider_outage_maps_to_bad_gateway() {
    let service = Arc::new(CatalogSearchService::new(
        Arc::new(UnavailableCatalog),
        Arc::new(FixedRates::default()),
        search_config(0),
    ));
    let router = catalog_router(service);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/catalog/search")
        .header("content-type", "application/json")
        .body(Body::from(json!({}).to_string()))
        .expect("request");

    let response = router.oneshot(request).await.expect("router dispatch");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
