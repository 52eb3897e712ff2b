use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::repository::{RepositoryError, ResultFilter, ResultId, ResultRepository};
use super::service::{AssessmentError, AssessmentService, StartRequest, Submission};

/// Router builder exposing the assessment lifecycle over HTTP.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: ResultRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessments/start", post(start_handler::<R>))
        .route(
            "/api/v1/assessments",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/assessments/:result_id", get(result_handler::<R>))
        .with_state(service)
}

pub(crate) async fn start_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Json(request): Json<StartRequest>,
) -> Response
where
    R: ResultRepository + 'static,
{
    match service.start(request.age, &request.profession) {
        Ok(prompt) => (StatusCode::OK, Json(prompt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Json(submission): Json<Submission>,
) -> Response
where
    R: ResultRepository + 'static,
{
    match service.submit(submission).await {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn result_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(result_id): Path<u64>,
) -> Response
where
    R: ResultRepository + 'static,
{
    match service.get(ResultId(result_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(AssessmentError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": format!("assessment {result_id} not found"),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Query(filter): Query<ResultFilter>,
) -> Response
where
    R: ResultRepository + 'static,
{
    match service.list(&filter) {
        Ok(results) => {
            let rows: Vec<_> = results.iter().map(|result| result.summary_view()).collect();
            (StatusCode::OK, Json(json!({ "results": rows }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: AssessmentError) -> Response {
    match error {
        AssessmentError::Validation(issues) => {
            let payload = json!({ "errors": issues });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        AssessmentError::InvalidProfile(message) => {
            let payload = json!({ "error": message });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        AssessmentError::Classifier(error) => {
            tracing::error!(%error, "sentiment analysis failed");
            let payload = json!({ "error": error.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
        AssessmentError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "record not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        AssessmentError::Repository(error) => {
            tracing::error!(%error, "results repository failed");
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
