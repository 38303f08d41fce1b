use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::answers::AnswerRecord;
use super::profile::{ProfileStore, UserId};
use super::service::{RecommendationError, RecommendationService};
use super::tracking::{IntakeEvent, IntakeTracker, TrackingError};

/// Body of an intake submission. `today` defaults to the current UTC date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeRequest {
    pub events: Vec<IntakeEvent>,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Router builder exposing assessments, profiles, intake logging, and the catalog.
pub fn recommendation_router<S>(service: Arc<RecommendationService<S>>) -> Router
where
    S: ProfileStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/assessments",
            post(assessment_handler::<S>),
        )
        .route("/api/v1/users/:user_id/profile", get(profile_handler::<S>))
        .route("/api/v1/users/:user_id/history", get(history_handler::<S>))
        .route("/api/v1/users/:user_id/intake", post(intake_handler::<S>))
        .route("/api/v1/catalog", get(catalog_handler::<S>))
        .route("/api/v1/catalog/:item_id", get(item_handler::<S>))
        .with_state(service)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

/// Runs a store-backed call on the blocking pool. The JSON file store does synchronous I/O.
async fn run_blocking<T, F>(task: F) -> Result<T, Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|err| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("store task failed: {err}"),
        )
    })
}

pub(crate) async fn assessment_handler<S>(
    State(service): State<Arc<RecommendationService<S>>>,
    Path(user_id): Path<String>,
    axum::Json(answers): axum::Json<AnswerRecord>,
) -> Response
where
    S: ProfileStore + 'static,
{
    let user_id = UserId(user_id);
    let result = match run_blocking(move || service.recommend(&user_id, answers)).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    match result {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error @ RecommendationError::InvalidAnswers(_)) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
    }
}

pub(crate) async fn profile_handler<S>(
    State(service): State<Arc<RecommendationService<S>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
{
    let user_id = UserId(user_id);
    let lookup = user_id.clone();
    let result = match run_blocking(move || service.profile(&lookup)).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    match result {
        Ok(Some(profile)) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": "profile not found",
                "user_id": user_id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<RecommendationService<S>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
{
    let result = match run_blocking(move || service.history(&UserId(user_id))).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    match result {
        Ok(history) => (StatusCode::OK, axum::Json(history)).into_response(),
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn intake_handler<S>(
    State(service): State<Arc<RecommendationService<S>>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<IntakeRequest>,
) -> Response
where
    S: ProfileStore + 'static,
{
    let tracker = IntakeTracker::new(service.store().clone());
    let today = request.today.unwrap_or_else(|| Utc::now().date_naive());

    let recorded =
        run_blocking(move || tracker.record(&UserId(user_id), &request.events, today)).await;
    let result = match recorded {
        Ok(result) => result,
        Err(response) => return response,
    };

    match result {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error @ TrackingError::NoAssessment(_)) => {
            error_response(StatusCode::NOT_FOUND, error.to_string())
        }
        Err(error @ TrackingError::WindowBeforeAssessment { .. }) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn catalog_handler<S>(
    State(service): State<Arc<RecommendationService<S>>>,
) -> Response
where
    S: ProfileStore + 'static,
{
    (StatusCode::OK, axum::Json(service.catalog().items())).into_response()
}

pub(crate) async fn item_handler<S>(
    State(service): State<Arc<RecommendationService<S>>>,
    Path(item_id): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
{
    match service.catalog().get(&item_id) {
        Some(item) => (StatusCode::OK, axum::Json(item)).into_response(),
        None => {
            let payload = json!({
                "error": "unknown catalog item",
                "item_id": item_id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}
