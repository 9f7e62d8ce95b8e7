//! Review handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{post, put};
use axum::{Json, Router};

use crate::api::dto::{CreateReviewRequest, UpdateReviewRequest};
use crate::app_state::AppState;
use crate::domain::{Actor, RatingSummary, Review, ReviewId};
use crate::error::{ApiError, ErrorResponse};

/// `POST /reviews`: Review an arena.
///
/// # Errors
///
/// Returns 409 if the caller already reviewed the arena and 400 for an
/// out-of-range rating or invalid comment.
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    summary = "Create a review",
    description = "Posts a 1-5 star review and recomputes the arena's rating. One review per user and arena.",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Arena not found", body = ErrorResponse),
        (status = 409, description = "Arena already reviewed", body = ErrorResponse),
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .review_service
        .create_review(actor, req.try_into()?)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// `PUT /reviews/{id}`: Edit a review.
///
/// # Errors
///
/// Returns 403 unless the caller wrote the review.
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    summary = "Update a review",
    params(("id" = uuid::Uuid, Path, description = "Review UUID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse),
    )
)]
pub async fn update_review(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .review_service
        .update_review(actor, ReviewId::from_uuid(id), req.try_into()?)
        .await?;
    Ok(Json(review))
}

/// `DELETE /reviews/{id}`: Delete a review.
///
/// # Errors
///
/// Returns 403 unless the caller wrote the review or is an admin.
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    summary = "Delete a review",
    description = "Deletes the review and returns the arena's recomputed rating.",
    params(("id" = uuid::Uuid, Path, description = "Review UUID")),
    responses(
        (status = 200, description = "Arena rating after deletion", body = RatingSummary),
        (status = 403, description = "Not the author or an admin", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse),
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .review_service
        .delete_review(actor, ReviewId::from_uuid(id))
        .await?;
    Ok(Json(summary))
}

/// Review routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(create_review))
        .route("/reviews/{id}", put(update_review).delete(delete_review))
}
