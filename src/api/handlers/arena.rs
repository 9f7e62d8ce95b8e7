//! Arena handlers: listings, approval, availability, bookings calendar,
//! reviews and rating recompute.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    ArenaListQuery, ArenaReviewsResponse, AvailabilityQuery, AvailabilityResponse,
    CreateArenaRequest, DateQuery, Paginated, PaginationParams,
};
use crate::app_state::AppState;
use crate::domain::{Actor, Arena, ArenaId, Booking, RatingSummary, TimeSlot};
use crate::error::{ApiError, ErrorResponse};

/// `POST /arenas`: List a new arena.
///
/// # Errors
///
/// Returns [`ApiError`] if the caller is a player or the body is invalid.
#[utoipa::path(
    post,
    path = "/api/v1/arenas",
    tag = "Arenas",
    summary = "Create an arena",
    description = "Lists a new arena. Listings by arena owners await admin approval; listings by admins are approved immediately.",
    request_body = CreateArenaRequest,
    responses(
        (status = 201, description = "Arena created", body = Arena),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing identity", body = ErrorResponse),
        (status = 403, description = "Caller may not list arenas", body = ErrorResponse),
    )
)]
pub async fn create_arena(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateArenaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let arena = state.arena_service.create_arena(actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(arena)))
}

/// `GET /arenas`: List arenas with pagination and filters.
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/arenas",
    tag = "Arenas",
    summary = "List arenas",
    description = "Returns a paginated list of arenas, best rated first. Only approved arenas are listed unless `approved=false` is given.",
    params(PaginationParams, ArenaListQuery),
    responses(
        (status = 200, description = "Paginated arena list", body = Paginated<Arena>),
    )
)]
pub async fn list_arenas(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<ArenaListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let arenas = state.arena_service.list_arenas(&filter.into()).await;
    Ok(Json(pagination.paginate(arenas)))
}

/// `GET /arenas/{id}`: Arena details.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the arena does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/arenas/{id}",
    tag = "Arenas",
    summary = "Get arena details",
    params(("id" = uuid::Uuid, Path, description = "Arena UUID")),
    responses(
        (status = 200, description = "Arena details", body = Arena),
        (status = 404, description = "Arena not found", body = ErrorResponse),
    )
)]
pub async fn get_arena(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let arena = state.arena_service.get_arena(ArenaId::from_uuid(id)).await?;
    Ok(Json(arena))
}

/// `POST /arenas/{id}/approve`: Admin approval.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] for non-admins.
#[utoipa::path(
    post,
    path = "/api/v1/arenas/{id}/approve",
    tag = "Arenas",
    summary = "Approve an arena",
    params(("id" = uuid::Uuid, Path, description = "Arena UUID")),
    responses(
        (status = 200, description = "Arena approved", body = Arena),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Arena not found", body = ErrorResponse),
    )
)]
pub async fn approve_arena(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let arena = state
        .arena_service
        .approve_arena(actor, ArenaId::from_uuid(id))
        .await?;
    Ok(Json(arena))
}

/// `GET /arenas/{id}/availability`: Check whether a slot is free.
///
/// # Errors
///
/// Returns [`ApiError`] for malformed times or a missing arena.
#[utoipa::path(
    get,
    path = "/api/v1/arenas/{id}/availability",
    tag = "Arenas",
    summary = "Check slot availability",
    description = "Reports whether the half-open slot [start_time, end_time) on `date` overlaps any pending or confirmed booking.",
    params(("id" = uuid::Uuid, Path, description = "Arena UUID"), AvailabilityQuery),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
        (status = 400, description = "Malformed slot", body = ErrorResponse),
        (status = 404, description = "Arena not found", body = ErrorResponse),
    )
)]
pub async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let arena_id = ArenaId::from_uuid(id);
    let slot = TimeSlot::parse(&query.start_time, &query.end_time)?;
    let available = state
        .booking_service
        .is_available(arena_id, query.date, &slot)
        .await?;
    Ok(Json(AvailabilityResponse {
        arena_id,
        date: query.date,
        start_time: slot.start().to_string(),
        end_time: slot.end().to_string(),
        available,
    }))
}

/// `GET /arenas/{id}/bookings`: The arena's bookings on one day.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the arena does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/arenas/{id}/bookings",
    tag = "Arenas",
    summary = "List an arena's bookings for a day",
    params(("id" = uuid::Uuid, Path, description = "Arena UUID"), DateQuery),
    responses(
        (status = 200, description = "Bookings in slot order", body = Vec<Booking>),
        (status = 404, description = "Arena not found", body = ErrorResponse),
    )
)]
pub async fn arena_bookings(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(query): Query<DateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = state
        .booking_service
        .list_for_arena(ArenaId::from_uuid(id), query.date)
        .await?;
    Ok(Json(bookings))
}

/// `GET /arenas/{id}/reviews`: Reviews with the rating distribution.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the arena does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/arenas/{id}/reviews",
    tag = "Arenas",
    summary = "List an arena's reviews",
    params(("id" = uuid::Uuid, Path, description = "Arena UUID")),
    responses(
        (status = 200, description = "Reviews and rating distribution", body = ArenaReviewsResponse),
        (status = 404, description = "Arena not found", body = ErrorResponse),
    )
)]
pub async fn arena_reviews(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let arena_id = ArenaId::from_uuid(id);
    let listing = state.review_service.list_for_arena(arena_id).await?;
    Ok(Json(ArenaReviewsResponse::new(arena_id, listing)))
}

/// `POST /arenas/{id}/rating/recompute`: Rebuild the derived rating.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] for non-admins.
#[utoipa::path(
    post,
    path = "/api/v1/arenas/{id}/rating/recompute",
    tag = "Arenas",
    summary = "Recompute an arena's rating",
    description = "Recomputes rating and total_reviews from the arena's reviews. Idempotent.",
    params(("id" = uuid::Uuid, Path, description = "Arena UUID")),
    responses(
        (status = 200, description = "Recomputed rating", body = RatingSummary),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
    )
)]
pub async fn recompute_rating(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !actor.is_admin() {
        return Err(ApiError::Forbidden(
            "only admins can recompute ratings".to_string(),
        ));
    }
    let summary = state
        .review_service
        .recompute_arena_rating(ArenaId::from_uuid(id))
        .await?;
    Ok(Json(summary))
}

/// Arena routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/arenas", post(create_arena).get(list_arenas))
        .route("/arenas/{id}", get(get_arena))
        .route("/arenas/{id}/approve", post(approve_arena))
        .route("/arenas/{id}/availability", get(check_availability))
        .route("/arenas/{id}/bookings", get(arena_bookings))
        .route("/arenas/{id}/reviews", get(arena_reviews))
        .route("/arenas/{id}/rating/recompute", post(recompute_rating))
}
