//! Booking handlers: create, read, and lifecycle transitions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CancelBookingRequest, CreateBookingRequest};
use crate::app_state::AppState;
use crate::domain::{Actor, Booking, BookingId};
use crate::error::{ApiError, ErrorResponse};

/// `POST /bookings`: Book a slot.
///
/// # Errors
///
/// Returns [`ApiError::BookingConflict`] (409) if the slot overlaps an
/// active booking, and 400 for malformed times or an unapproved arena.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "Create a booking",
    description = "Books [start_time, end_time) on `date`. The conflict check and insert are atomic; touching slots (10:00-11:00 and 11:00-12:00) do not conflict.",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created (pending)", body = Booking),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Arena or team not found", body = ErrorResponse),
        (status = 409, description = "Slot already booked", body = ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .booking_service
        .create_booking(actor, req.try_into()?)
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// `GET /bookings/mine`: The caller's bookings.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] without identity headers.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/mine",
    tag = "Bookings",
    summary = "List my bookings",
    responses(
        (status = 200, description = "Caller's bookings, latest date first", body = Vec<Booking>),
        (status = 401, description = "Missing identity", body = ErrorResponse),
    )
)]
pub async fn my_bookings(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.booking_service.list_for_user(actor.user_id).await))
}

/// `GET /bookings/{id}`: Booking details.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] or [`ApiError::Forbidden`].
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    summary = "Get booking details",
    params(("id" = uuid::Uuid, Path, description = "Booking UUID")),
    responses(
        (status = 200, description = "Booking details", body = Booking),
        (status = 403, description = "Not the booker, arena owner or an admin", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .booking_service
        .get_booking(actor, BookingId::from_uuid(id))
        .await?;
    Ok(Json(booking))
}

/// `POST /bookings/{id}/confirm`: Arena owner accepts a pending booking.
///
/// # Errors
///
/// Returns 403 for anyone but the owner or an admin and 409 unless pending.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/confirm",
    tag = "Bookings",
    summary = "Confirm a booking",
    params(("id" = uuid::Uuid, Path, description = "Booking UUID")),
    responses(
        (status = 200, description = "Booking confirmed", body = Booking),
        (status = 403, description = "Not the arena owner or an admin", body = ErrorResponse),
        (status = 409, description = "Booking is not pending", body = ErrorResponse),
    )
)]
pub async fn confirm_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .booking_service
        .confirm_booking(actor, BookingId::from_uuid(id))
        .await?;
    Ok(Json(booking))
}

/// `POST /bookings/{id}/cancel`: Cancel an active booking.
///
/// # Errors
///
/// Returns 403 for strangers and 409 if already cancelled or completed.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    summary = "Cancel a booking",
    params(("id" = uuid::Uuid, Path, description = "Booking UUID")),
    request_body(content = CancelBookingRequest, description = "Optional cancellation reason"),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 403, description = "Not the booker, arena owner or an admin", body = ErrorResponse),
        (status = 409, description = "Booking is not active", body = ErrorResponse),
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
    body: Option<Json<CancelBookingRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let reason = body.and_then(|Json(req)| req.reason);
    let booking = state
        .booking_service
        .cancel_booking(actor, BookingId::from_uuid(id), reason)
        .await?;
    Ok(Json(booking))
}

/// `POST /bookings/{id}/complete`: Mark a confirmed booking as played.
///
/// # Errors
///
/// Returns 403 for anyone but the owner or an admin and 409 unless confirmed.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/complete",
    tag = "Bookings",
    summary = "Complete a booking",
    params(("id" = uuid::Uuid, Path, description = "Booking UUID")),
    responses(
        (status = 200, description = "Booking completed", body = Booking),
        (status = 403, description = "Not the arena owner or an admin", body = ErrorResponse),
        (status = 409, description = "Booking is not confirmed", body = ErrorResponse),
    )
)]
pub async fn complete_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .booking_service
        .complete_booking(actor, BookingId::from_uuid(id))
        .await?;
    Ok(Json(booking))
}

/// Booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/mine", get(my_bookings))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/confirm", post(confirm_booking))
        .route("/bookings/{id}/cancel", post(cancel_booking))
        .route("/bookings/{id}/complete", post(complete_booking))
}
