use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAssessmentRepository, JsonFileRepository};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use stability_planner::config::AppConfig;
use stability_planner::error::AppError;
use stability_planner::telemetry;
use stability_planner::workflows::assessment::{AssessmentRepository, AssessmentService};
use std::sync::atomic::{AtomicBool, Ordering};
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

    match config.storage.store_path.clone() {
        Some(path) => {
            let repository = JsonFileRepository::open(path)?;
            info!(store = %repository.path().display(), "using json file store");
            serve(config, Arc::new(repository)).await
        }
        None => serve(config, Arc::new(InMemoryAssessmentRepository::default())).await,
    }
}

async fn serve<R>(config: AppConfig, repository: Arc<R>) -> Result<(), AppError>
where
    R: AssessmentRepository + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(AssessmentService::new(repository, config.plan));
    let app = with_assessment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        lock_days = config.plan.lock_days,
        "stability planner ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
