use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore};
use crate::routes::with_diagnostic_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mind_blown::config::AppConfig;
use mind_blown::diagnostic::DiagnosticService;
use mind_blown::error::AppError;
use mind_blown::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemorySessionStore::new(config.sessions.clone()));
    let diagnostic_service = Arc::new(DiagnosticService::new(store));

    let app = with_diagnostic_routes(diagnostic_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_sessions = config.sessions.max_sessions,
        "mind-blown diagnostic ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
