//! Match handlers: challenge, lifecycle and result.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CompleteMatchRequest, CreateMatchRequest};
use crate::app_state::AppState;
use crate::domain::{Actor, Match, MatchId};
use crate::error::{ApiError, ErrorResponse};

/// `POST /matches`: Challenge a team on a confirmed booking.
///
/// # Errors
///
/// Returns 400 for an unusable booking or mismatched sports, 403 unless
/// the caller captains the home team, 409 if the booking has a match.
#[utoipa::path(
    post,
    path = "/api/v1/matches",
    tag = "Matches",
    summary = "Challenge a team",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match scheduled", body = Match),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not the home captain", body = ErrorResponse),
        (status = 409, description = "Booking already hosts a match", body = ErrorResponse),
    )
)]
pub async fn create_match(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateMatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fixture = state.match_service.create_match(actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(fixture)))
}

/// `GET /matches/{id}`: Match details.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the match does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/matches/{id}",
    tag = "Matches",
    summary = "Get match details",
    params(("id" = uuid::Uuid, Path, description = "Match UUID")),
    responses(
        (status = 200, description = "Match details", body = Match),
        (status = 404, description = "Match not found", body = ErrorResponse),
    )
)]
pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.match_service.get_match(MatchId::from_uuid(id)).await?))
}

/// `POST /matches/{id}/accept`: Away captain accepts.
///
/// # Errors
///
/// Returns 403 unless the caller captains the away team, 409 unless scheduled.
#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/accept",
    tag = "Matches",
    summary = "Accept a challenge",
    params(("id" = uuid::Uuid, Path, description = "Match UUID")),
    responses(
        (status = 200, description = "Challenge accepted", body = Match),
        (status = 403, description = "Not the away captain", body = ErrorResponse),
        (status = 409, description = "Match is not scheduled", body = ErrorResponse),
    )
)]
pub async fn accept_match(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state
            .match_service
            .accept_challenge(actor, MatchId::from_uuid(id))
            .await?,
    ))
}

/// `POST /matches/{id}/reject`: Away captain declines, cancelling the match.
///
/// # Errors
///
/// Returns 403 unless the caller captains the away team, 409 unless scheduled.
#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/reject",
    tag = "Matches",
    summary = "Reject a challenge",
    params(("id" = uuid::Uuid, Path, description = "Match UUID")),
    responses(
        (status = 200, description = "Challenge rejected, match cancelled", body = Match),
        (status = 403, description = "Not the away captain", body = ErrorResponse),
        (status = 409, description = "Match is not scheduled or already accepted", body = ErrorResponse),
    )
)]
pub async fn reject_match(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state
            .match_service
            .reject_challenge(actor, MatchId::from_uuid(id))
            .await?,
    ))
}

/// `POST /matches/{id}/start`: Kick off an accepted match.
///
/// # Errors
///
/// Returns 403 for non-captains and 409 unless scheduled and accepted.
#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/start",
    tag = "Matches",
    summary = "Start a match",
    params(("id" = uuid::Uuid, Path, description = "Match UUID")),
    responses(
        (status = 200, description = "Match in progress", body = Match),
        (status = 403, description = "Not a captain of either team", body = ErrorResponse),
        (status = 409, description = "Match cannot start", body = ErrorResponse),
    )
)]
pub async fn start_match(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state
            .match_service
            .start_match(actor, MatchId::from_uuid(id))
            .await?,
    ))
}

/// `POST /matches/{id}/complete`: Record the final score.
///
/// # Errors
///
/// Returns 409 unless in progress, 400 for level scores when draws are
/// rejected, 403 for non-captains.
#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/complete",
    tag = "Matches",
    summary = "Complete a match",
    description = "Moves an in-progress match to completed and adds the result to both teams' records exactly once.",
    params(("id" = uuid::Uuid, Path, description = "Match UUID")),
    request_body = CompleteMatchRequest,
    responses(
        (status = 200, description = "Match completed", body = Match),
        (status = 400, description = "Level scores not permitted", body = ErrorResponse),
        (status = 403, description = "Not a captain of either team", body = ErrorResponse),
        (status = 409, description = "Match is not in progress", body = ErrorResponse),
    )
)]
pub async fn complete_match(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<CompleteMatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state
            .match_service
            .complete_match(actor, MatchId::from_uuid(id), req.into())
            .await?,
    ))
}

/// `POST /matches/{id}/cancel`: Call off a match.
///
/// # Errors
///
/// Returns 403 unless home captain or admin, 409 once completed or cancelled.
#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/cancel",
    tag = "Matches",
    summary = "Cancel a match",
    params(("id" = uuid::Uuid, Path, description = "Match UUID")),
    responses(
        (status = 200, description = "Match cancelled", body = Match),
        (status = 403, description = "Not the home captain or an admin", body = ErrorResponse),
        (status = 409, description = "Match already finished", body = ErrorResponse),
    )
)]
pub async fn cancel_match(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state
            .match_service
            .cancel_match(actor, MatchId::from_uuid(id))
            .await?,
    ))
}

/// Match routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matches", post(create_match))
        .route("/matches/{id}", get(get_match))
        .route("/matches/{id}/accept", post(accept_match))
        .route("/matches/{id}/reject", post(reject_match))
        .route("/matches/{id}/start", post(start_match))
        .route("/matches/{id}/complete", post(complete_match))
        .route("/matches/{id}/cancel", post(cancel_match))
}
