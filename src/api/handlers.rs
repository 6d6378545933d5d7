//! HTTP request handlers for the payroll API.
//!
//! A thin layer: handlers parse the request, build the [`Actor`] from
//! the `x-user-id` header, and delegate to the engine. All policy lives
//! in the engine; rendering and messaging are downstream consumers of
//! the data these endpoints return.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::authorize::Actor;

use super::request::{
    BulkReviewUpdateRequest, ReviewUpdateRequest, SyncRequest, TransitionRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/companies/:company_id/payroll/sync", post(sync_handler))
        .route(
            "/companies/:company_id/payroll/runs/:run_id/review-status",
            get(review_status_handler),
        )
        .route(
            "/companies/:company_id/payroll/runs/:run_id/line-reviews",
            get(line_reviews_handler),
        )
        .route(
            "/companies/:company_id/payroll/runs/:run_id/status",
            post(transition_handler),
        )
        .route(
            "/companies/:company_id/payroll/runs/:run_id",
            delete(delete_run_handler),
        )
        .route(
            "/companies/:company_id/payroll/reviews/:review_id",
            patch(update_review_handler),
        )
        .route(
            "/companies/:company_id/payroll/reviews",
            patch(bulk_update_reviews_handler),
        )
        .with_state(state)
}

/// Builds the caller identity from the `x-user-id` header.
fn actor_from_headers(headers: &HeaderMap, tenant_id: Uuid) -> Result<Actor, ApiErrorResponse> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or(ApiErrorResponse {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::missing_user(),
        })?;
    Ok(Actor { user_id, tenant_id })
}

fn bad_json(rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse {
        status: StatusCode::BAD_REQUEST,
        error,
    }
}

/// Handler for POST /companies/{company_id}/payroll/sync.
async fn sync_handler(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<SyncRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %company_id, "processing payroll sync request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, "sync request body rejected");
            return bad_json(rejection).into_response();
        }
    };
    let actor = match actor_from_headers(&headers, company_id) {
        Ok(actor) => actor,
        Err(response) => return response.into_response(),
    };
    let period = match request.period() {
        Ok(period) => period,
        Err(err) => return ApiErrorResponse::from(err).into_response(),
    };

    match state.engine().sync(&actor, period) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %outcome.run_id,
                employee_count = outcome.employee_count,
                "payroll sync completed"
            );
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "payroll sync failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /companies/{company_id}/payroll/runs/{run_id}/review-status.
async fn review_status_handler(
    State(state): State<AppState>,
    Path((company_id, run_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let actor = match actor_from_headers(&headers, company_id) {
        Ok(actor) => actor,
        Err(response) => return response.into_response(),
    };
    match state.engine().get_review_status(&actor, run_id) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /companies/{company_id}/payroll/runs/{run_id}/line-reviews.
async fn line_reviews_handler(
    State(state): State<AppState>,
    Path((company_id, run_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let actor = match actor_from_headers(&headers, company_id) {
        Ok(actor) => actor,
        Err(response) => return response.into_response(),
    };
    match state.engine().get_line_review_statuses(&actor, run_id) {
        Ok(statuses) => (StatusCode::OK, Json(statuses)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /companies/{company_id}/payroll/runs/{run_id}/status.
async fn transition_handler(
    State(state): State<AppState>,
    Path((company_id, run_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_json(rejection).into_response(),
    };
    let actor = match actor_from_headers(&headers, company_id) {
        Ok(actor) => actor,
        Err(response) => return response.into_response(),
    };

    match state.engine().transition(&actor, run_id, request.status) {
        Ok(run) => (StatusCode::OK, Json(run)).into_response(),
        Err(err) => {
            warn!(%run_id, error = %err, "status transition rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for DELETE /companies/{company_id}/payroll/runs/{run_id}.
async fn delete_run_handler(
    State(state): State<AppState>,
    Path((company_id, run_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let actor = match actor_from_headers(&headers, company_id) {
        Ok(actor) => actor,
        Err(response) => return response.into_response(),
    };
    match state.engine().delete_run(&actor, run_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for PATCH /companies/{company_id}/payroll/reviews/{review_id}.
async fn update_review_handler(
    State(state): State<AppState>,
    Path((company_id, review_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    payload: Result<Json<ReviewUpdateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_json(rejection).into_response(),
    };
    let actor = match actor_from_headers(&headers, company_id) {
        Ok(actor) => actor,
        Err(response) => return response.into_response(),
    };

    match state
        .engine()
        .update_review_task(&actor, review_id, request.status)
    {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for PATCH /companies/{company_id}/payroll/reviews.
async fn bulk_update_reviews_handler(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<BulkReviewUpdateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_json(rejection).into_response(),
    };
    let actor = match actor_from_headers(&headers, company_id) {
        Ok(actor) => actor,
        Err(response) => return response.into_response(),
    };

    match state
        .engine()
        .bulk_update_review_tasks(&actor, &request.review_ids, request.status)
    {
        Ok(updated) => (
            StatusCode::OK,
            Json(serde_json::json!({ "updated": updated })),
        )
            .into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}
