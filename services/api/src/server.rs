use crate::cli::ServeArgs;
use crate::infra::{AppState, MarketplaceSeed};
use crate::routes::with_matching_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gigmatch::config::AppConfig;
use gigmatch::error::AppError;
use gigmatch::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let seed = MarketplaceSeed::load(args.seed.as_deref())?;
    info!(
        jobs = seed.jobs.len(),
        freelancers = seed.freelancers.len(),
        "loaded marketplace seed"
    );
    let service = seed.into_service(config.matching);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_matching_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_matches = config.matching.max_matches,
        "matching service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
