//! Arena DTOs: listing, availability and reviews.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::deserialize_calendar_date;
use crate::domain::{ArenaId, Review, Sport};
use crate::service::{ArenaFilter, ArenaReviews, NewArena};

/// Request body for `POST /arenas`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateArenaRequest {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Supported sports.
    #[serde(default)]
    pub sports: Vec<Sport>,
    /// Hourly price.
    pub price_per_hour: f64,
}

impl From<CreateArenaRequest> for NewArena {
    fn from(req: CreateArenaRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            city: req.city,
            address: req.address,
            sports: req.sports,
            price_per_hour: req.price_per_hour,
        }
    }
}

/// Filters for `GET /arenas`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArenaListQuery {
    /// Approval state to list. Defaults to `true`.
    #[serde(default)]
    pub approved: Option<bool>,
    /// City, case-insensitive.
    #[serde(default)]
    pub city: Option<String>,
}

impl From<ArenaListQuery> for ArenaFilter {
    fn from(query: ArenaListQuery) -> Self {
        Self {
            approved: Some(query.approved.unwrap_or(true)),
            city: query.city,
        }
    }
}

/// Query for `GET /arenas/{id}/availability`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// Day to check (`YYYY-MM-DD`; a date-time is cut to its date).
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    /// Slot start (`HH:MM`).
    pub start_time: String,
    /// Slot end (`HH:MM`).
    pub end_time: String,
}

/// Response for `GET /arenas/{id}/availability`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    /// Arena checked.
    pub arena_id: ArenaId,
    /// Day checked.
    pub date: NaiveDate,
    /// Slot start.
    pub start_time: String,
    /// Slot end.
    pub end_time: String,
    /// `true` if no active booking overlaps the slot.
    pub available: bool,
}

/// Query for `GET /arenas/{id}/bookings`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    /// Day (`YYYY-MM-DD`; a date-time is cut to its date).
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
}

/// Response for `GET /arenas/{id}/reviews`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArenaReviewsResponse {
    /// Reviewed arena.
    pub arena_id: ArenaId,
    /// Mean rating, one decimal.
    pub rating: f64,
    /// Number of reviews.
    pub total_reviews: u32,
    /// Review count per star value.
    pub distribution: BTreeMap<u8, u32>,
    /// Reviews, newest first.
    pub reviews: Vec<Review>,
}

impl ArenaReviewsResponse {
    /// Shapes a service listing for the wire.
    #[must_use]
    pub fn new(arena_id: ArenaId, listing: ArenaReviews) -> Self {
        Self {
            arena_id,
            rating: listing.summary.rating,
            total_reviews: listing.summary.total_reviews,
            distribution: listing.distribution,
            reviews: listing.reviews,
        }
    }
}
