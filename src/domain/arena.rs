//! Arena documents.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{ArenaId, RatingSummary, Sport, UserId};

/// A bookable sports venue listed by an arena owner.
///
/// `rating` and `total_reviews` are a materialized view over the arena's
/// reviews. They are private and only change through
/// [`Arena::apply_rating`], which the rating recomputation calls.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Arena {
    /// Arena identifier.
    pub id: ArenaId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// City used for listing filters.
    pub city: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Sports the venue supports.
    pub sports: Vec<Sport>,
    /// Hourly price used to compute booking totals.
    pub price_per_hour: f64,
    /// Whether an admin approved the listing. Unapproved arenas cannot be
    /// booked or reviewed.
    pub approved: bool,
    rating: f64,
    total_reviews: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Arena {
    /// Creates an unrated arena listing.
    #[must_use]
    pub fn new(
        owner_id: UserId,
        name: String,
        sports: Vec<Sport>,
        price_per_hour: f64,
        approved: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ArenaId::new(),
            owner_id,
            name,
            description: None,
            city: None,
            address: None,
            sports,
            price_per_hour,
            approved,
            rating: 0.0,
            total_reviews: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mean review rating, one decimal.
    #[must_use]
    pub const fn rating(&self) -> f64 {
        self.rating
    }

    /// Number of reviews behind [`Arena::rating`].
    #[must_use]
    pub const fn total_reviews(&self) -> u32 {
        self.total_reviews
    }

    /// Current rating as a summary.
    #[must_use]
    pub const fn rating_summary(&self) -> RatingSummary {
        RatingSummary {
            rating: self.rating,
            total_reviews: self.total_reviews,
        }
    }

    /// Overwrites the derived rating fields with a freshly computed summary.
    pub(crate) fn apply_rating(&mut self, summary: RatingSummary) {
        self.rating = summary.rating;
        self.total_reviews = summary.total_reviews;
        self.updated_at = Utc::now();
    }
}
