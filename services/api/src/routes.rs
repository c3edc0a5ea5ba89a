use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use study_match::catalog::{catalog_router, CatalogProvider, CatalogSearchService};
use study_match::grading::{Grade, GradeConversionEngine};
use study_match::pricing::CurrencyRateProvider;

pub(crate) fn with_catalog_routes<P, C>(service: Arc<CatalogSearchService<P, C>>) -> axum::Router
where
    P: CatalogProvider + 'static,
    C: CurrencyRateProvider + 'static,
{
    catalog_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/grades/convert",
            axum::routing::post(convert_grade_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConvertGradeRequest {
    pub(crate) value: f64,
    pub(crate) from_system: String,
    pub(crate) to_system: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ConvertGradeResponse {
    pub(crate) value: f64,
    pub(crate) system: String,
    pub(crate) normalized: f64,
}

pub(crate) async fn convert_grade_endpoint(
    Json(payload): Json<ConvertGradeRequest>,
) -> Json<ConvertGradeResponse> {
    let engine = GradeConversionEngine::new();
    let grade = Grade::new(payload.value, payload.from_system);

    Json(ConvertGradeResponse {
        value: engine.convert(&grade, &payload.to_system),
        system: payload.to_system,
        normalized: engine.normalize(&grade),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{sample_catalog, FixedCurrencyRates, InMemoryCatalogProvider};
    use axum::body::Body;
    use axum::http::Request;
    use study_match::config::SearchConfig;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let service = Arc::new(CatalogSearchService::new(
            Arc::new(InMemoryCatalogProvider::new(sample_catalog())),
            Arc::new(FixedCurrencyRates::default()),
            SearchConfig::default(),
        ));
        let router = with_catalog_routes(service);

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn convert_endpoint_maps_between_scales() {
        let request = ConvertGradeRequest {
            value: 85.5,
            from_system: "percentage".to_string(),
            to_system: "cgpa-4".to_string(),
        };

        let Json(body) = convert_grade_endpoint(Json(request)).await;

        assert!((body.normalized - 8.55).abs() < 1e-9);
        assert!((body.value - 3.42).abs() < 1e-9);
        assert_eq!(body.system, "cgpa-4");
    }

    #[tokio::test]
    async fn convert_endpoint_passes_unknown_systems_through() {
        let request = ConvertGradeRequest {
            value: 12.0,
            from_system: "letter-grades".to_string(),
            to_system: "cgpa-4".to_string(),
        };

        let Json(body) = convert_grade_endpoint(Json(request)).await;
        assert_eq!(body.value, 12.0);
    }
}
