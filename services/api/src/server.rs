use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_bursary_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bursary_insight::config::AppConfig;
use bursary_insight::error::AppError;
use bursary_insight::telemetry;
use bursary_insight::workflows::bursary::BursaryReportService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(dataset) = args.dataset.take() {
        config.dataset.path = dataset;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(BursaryReportService::from_config(&config.dataset));

    let app = with_bursary_routes(service.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tokio::spawn(warm_dataset(service, readiness_flag));

    info!(
        ?config.environment,
        %addr,
        dataset = %config.dataset.path.display(),
        "bursary insight service listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Loads the configured dataset into the cache, then reports ready.
/// A failed load is logged; requests retry it and surface the error.
async fn warm_dataset(service: Arc<BursaryReportService>, readiness: Arc<AtomicBool>) {
    let loader = service.clone();
    match tokio::task::spawn_blocking(move || loader.table()).await {
        Ok(Ok(table)) => info!(
            schools = table.len(),
            provinces = table.provinces().len(),
            "school dataset ready"
        ),
        Ok(Err(err)) => warn!(
            error = %err,
            source = %service.dataset_path().display(),
            "school dataset failed to load"
        ),
        Err(err) => warn!(error = %err, "dataset warm-up task aborted"),
    }
    readiness.store(true, Ordering::Release);
}
