//! Review DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{ArenaId, BookingId, Rating};
use crate::error::ApiError;
use crate::service::{NewReview, ReviewUpdate};

/// Request body for `POST /reviews`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    /// Reviewed arena.
    pub arena_id: ArenaId,
    /// Completed booking backing the review.
    #[serde(default)]
    pub booking_id: Option<BookingId>,
    /// Stars, `1..=5`.
    pub rating: i64,
    /// Review text, at most 1000 characters.
    pub comment: String,
}

impl TryFrom<CreateReviewRequest> for NewReview {
    type Error = ApiError;

    fn try_from(req: CreateReviewRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            arena_id: req.arena_id,
            booking_id: req.booking_id,
            rating: Rating::new(req.rating)?,
            comment: req.comment,
        })
    }
}

/// Request body for `PUT /reviews/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    /// New stars, `1..=5`.
    #[serde(default)]
    pub rating: Option<i64>,
    /// New review text.
    #[serde(default)]
    pub comment: Option<String>,
}

impl TryFrom<UpdateReviewRequest> for ReviewUpdate {
    type Error = ApiError;

    fn try_from(req: UpdateReviewRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            rating: req.rating.map(Rating::new).transpose()?,
            comment: req.comment,
        })
    }
}
