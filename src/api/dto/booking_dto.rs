//! Booking DTOs.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use super::common_dto::deserialize_calendar_date;
use crate::domain::{ArenaId, TeamId, TimeSlot};
use crate::error::ApiError;
use crate::service::NewBooking;

/// Request body for `POST /bookings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Arena to book.
    pub arena_id: ArenaId,
    /// Team playing in the slot.
    #[serde(default)]
    pub team_id: Option<TeamId>,
    /// Day of play (`YYYY-MM-DD`; a date-time is cut to its date).
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    /// Slot start (`HH:MM`).
    pub start_time: String,
    /// Slot end (`HH:MM`).
    pub end_time: String,
    /// Amount paid upfront.
    #[serde(default)]
    pub advance_payment: f64,
    /// Notes for the arena owner.
    #[serde(default)]
    pub notes: Option<String>,
}

impl TryFrom<CreateBookingRequest> for NewBooking {
    type Error = ApiError;

    fn try_from(req: CreateBookingRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            arena_id: req.arena_id,
            team_id: req.team_id,
            date: req.date,
            slot: TimeSlot::parse(&req.start_time, &req.end_time)?,
            advance_payment: req.advance_payment,
            notes: req.notes,
        })
    }
}

/// Optional body for `POST /bookings/{id}/cancel`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CancelBookingRequest {
    /// Why the booking is cancelled.
    #[serde(default)]
    pub reason: Option<String>,
}
