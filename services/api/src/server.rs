use crate::cli::ServeArgs;
use crate::infra::{AppState, ResultStore};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use eq_assessment::assessment::{AssessmentService, InferenceApiLoader, SentimentAnalyzer};
use eq_assessment::config::AppConfig;
use eq_assessment::error::AppError;
use eq_assessment::telemetry;
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
    if let Some(path) = args.results_path.take() {
        config.storage.results_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let loader = Arc::new(InferenceApiLoader::new(&config.classifier)?);
    let analyzer = Arc::new(SentimentAnalyzer::new(
        loader,
        config.classifier.primary_model.clone(),
        config.classifier.fallback_model.clone(),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        analyzer: analyzer.clone(),
    };

    let repository = Arc::new(ResultStore::from_config(&config.storage)?);
    let assessment_service = Arc::new(AssessmentService::new(repository, analyzer));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        model = %config.classifier.primary_model,
        "eq assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
