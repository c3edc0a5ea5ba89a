use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{FilterCriteria, RecordId};
use super::provider::CatalogProvider;
use super::service::{CatalogSearchService, SearchError};
use crate::pricing::CurrencyRateProvider;

/// Router builder exposing the catalog search surface.
pub fn catalog_router<P, C>(service: Arc<CatalogSearchService<P, C>>) -> Router
where
    P: CatalogProvider + 'static,
    C: CurrencyRateProvider + 'static,
{
    Router::new()
        .route("/api/v1/catalog/search", post(search_handler::<P, C>))
        .route(
            "/api/v1/catalog/records/:record_id",
            get(record_handler::<P, C>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchRequest {
    #[serde(flatten)]
    pub(crate) criteria: FilterCriteria,
    /// Evaluation instant override for reproducible responses.
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) async fn search_handler<P, C>(
    State(service): State<Arc<CatalogSearchService<P, C>>>,
    axum::Json(request): axum::Json<SearchRequest>,
) -> Response
where
    P: CatalogProvider + 'static,
    C: CurrencyRateProvider + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);

    match service.search(&request.criteria, now).await {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(SearchError::Provider(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn record_handler<P, C>(
    State(service): State<Arc<CatalogSearchService<P, C>>>,
    Path(record_id): Path<String>,
) -> Response
where
    P: CatalogProvider + 'static,
    C: CurrencyRateProvider + 'static,
{
    let id = RecordId(record_id);
    let criteria = FilterCriteria::default();

    match service.find_record(&id, &criteria, Utc::now()).await {
        Ok(Some(found)) => (StatusCode::OK, axum::Json(found)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "record not found", "record_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(SearchError::Provider(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}
