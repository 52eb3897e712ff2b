use crate::infra::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use eq_assessment::assessment::{
    assessment_router, export_csv, AssessmentService, LoadStatus, ResultFilter,
    ResultRepository,
};
use eq_assessment::error::AppError;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_assessment_routes<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: ResultRepository + 'static,
{
    let export = Router::new()
        .route("/api/v1/assessments/export", get(export_endpoint::<R>))
        .with_state(service.clone());

    assessment_router(service)
        .merge(export)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Ready once the listener is bound. The classifier loads lazily, so only a
/// permanent load failure takes the service out of rotation.
pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let classifier = state.analyzer.status();

    let (status, label) = match (ready, classifier) {
        (false, _) => (StatusCode::SERVICE_UNAVAILABLE, "initializing"),
        (true, LoadStatus::Failed) => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
        (true, _) => (StatusCode::OK, "ready"),
    };

    (
        status,
        Json(json!({ "status": label, "classifier": classifier })),
    )
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn export_endpoint<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Query(filter): Query<ResultFilter>,
) -> Result<impl IntoResponse, AppError>
where
    R: ResultRepository + 'static,
{
    let results = service.list(&filter)?;

    let mut buffer = Vec::new();
    export_csv(&results, &mut buffer)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"eq_results.csv\"",
            ),
        ],
        buffer,
    ))
}
