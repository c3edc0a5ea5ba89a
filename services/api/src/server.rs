use crate::cli::ServeArgs;
use crate::infra::{sample_catalog, AppState, FixedCurrencyRates, InMemoryCatalogProvider};
use crate::routes::with_catalog_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use study_match::catalog::{CatalogFeedImporter, CatalogSearchService};
use study_match::config::AppConfig;
use study_match::error::AppError;
use study_match::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let records = match args.feed.take() {
        Some(path) => CatalogFeedImporter::from_path(path)?,
        None => sample_catalog(),
    };
    info!(records = records.len(), "catalog loaded");

    let provider = Arc::new(InMemoryCatalogProvider::new(records));
    let rates = Arc::new(FixedCurrencyRates::default());
    let search_service = Arc::new(CatalogSearchService::new(
        provider,
        rates,
        config.search.clone(),
    ));

    let app = with_catalog_routes(search_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "catalog matching service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
