//! Team handlers: teams, rosters and the leaderboard.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AddMemberRequest, CreateTeamRequest, LeaderboardEntry, LeaderboardQuery, Paginated,
    PaginationParams, SportQuery,
};
use crate::app_state::AppState;
use crate::domain::{Actor, Team, TeamId, UserId};
use crate::error::{ApiError, ErrorResponse};

/// `POST /teams`: Form a team captained by the caller.
///
/// # Errors
///
/// Returns 409 if the caller already captains an active team in the sport.
#[utoipa::path(
    post,
    path = "/api/v1/teams",
    tag = "Teams",
    summary = "Create a team",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Caller already captains a team in this sport", body = ErrorResponse),
    )
)]
pub async fn create_team(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateTeamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state.team_service.create_team(actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// `GET /teams`: List active teams.
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    tag = "Teams",
    summary = "List teams",
    params(PaginationParams, SportQuery),
    responses(
        (status = 200, description = "Paginated team list", body = Paginated<Team>),
    )
)]
pub async fn list_teams(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<SportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let teams = state.team_service.list_teams(query.sport).await;
    Ok(Json(pagination.paginate(teams)))
}

/// `GET /teams/{id}`: Team details.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the team does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}",
    tag = "Teams",
    summary = "Get team details",
    params(("id" = uuid::Uuid, Path, description = "Team UUID")),
    responses(
        (status = 200, description = "Team details", body = Team),
        (status = 404, description = "Team not found", body = ErrorResponse),
    )
)]
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.team_service.get_team(TeamId::from_uuid(id)).await?))
}

/// `POST /teams/{id}/members`: Add a player.
///
/// # Errors
///
/// Returns 403 unless the caller is the captain or an admin.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{id}/members",
    tag = "Teams",
    summary = "Add a team member",
    params(("id" = uuid::Uuid, Path, description = "Team UUID")),
    request_body = AddMemberRequest,
    responses(
        (status = 200, description = "Updated team", body = Team),
        (status = 400, description = "Already a member", body = ErrorResponse),
        (status = 403, description = "Not the captain", body = ErrorResponse),
    )
)]
pub async fn add_member(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state
        .team_service
        .add_member(actor, TeamId::from_uuid(id), req.user_id)
        .await?;
    Ok(Json(team))
}

/// `DELETE /teams/{id}/members/{user_id}`: Remove a player.
///
/// # Errors
///
/// Returns 400 when removing the captain and 403 for strangers.
#[utoipa::path(
    delete,
    path = "/api/v1/teams/{id}/members/{user_id}",
    tag = "Teams",
    summary = "Remove a team member",
    params(
        ("id" = uuid::Uuid, Path, description = "Team UUID"),
        ("user_id" = uuid::Uuid, Path, description = "Member UUID"),
    ),
    responses(
        (status = 200, description = "Updated team", body = Team),
        (status = 400, description = "Cannot remove the captain", body = ErrorResponse),
        (status = 403, description = "Not the captain", body = ErrorResponse),
    )
)]
pub async fn remove_member(
    State(state): State<AppState>,
    actor: Actor,
    Path((id, user_id)): Path<(uuid::Uuid, uuid::Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state
        .team_service
        .remove_member(actor, TeamId::from_uuid(id), UserId::from_uuid(user_id))
        .await?;
    Ok(Json(team))
}

/// `POST /teams/{id}/deactivate`: Retire a team.
///
/// # Errors
///
/// Returns 403 unless the caller is the captain or an admin, and 409 if
/// the team is already inactive.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{id}/deactivate",
    tag = "Teams",
    summary = "Deactivate a team",
    description = "Hides the team from listings and the leaderboard and frees the captain to form a new team in the same sport.",
    params(("id" = uuid::Uuid, Path, description = "Team UUID")),
    responses(
        (status = 200, description = "Team deactivated", body = Team),
        (status = 403, description = "Not the captain", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 409, description = "Team already inactive", body = ErrorResponse),
    )
)]
pub async fn deactivate_team(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state
        .team_service
        .deactivate_team(actor, TeamId::from_uuid(id))
        .await?;
    Ok(Json(team))
}

/// `GET /leaderboard`: Teams ranked by wins, then matches played.
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    tag = "Teams",
    summary = "Team leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Ranked teams", body = Vec<LeaderboardEntry>),
    )
)]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let teams = state
        .team_service
        .leaderboard(query.sport, query.limit())
        .await;
    let entries: Vec<LeaderboardEntry> = (1_u32..)
        .zip(teams.iter())
        .map(|(rank, team)| LeaderboardEntry::new(rank, team))
        .collect();
    Ok(Json(entries))
}

/// Team routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teams", post(create_team).get(list_teams))
        .route("/teams/{id}", get(get_team))
        .route("/teams/{id}/members", post(add_member))
        .route("/teams/{id}/deactivate", post(deactivate_team))
        .route("/teams/{id}/members/{user_id}", delete(remove_member))
        .route("/leaderboard", get(leaderboard))
}
