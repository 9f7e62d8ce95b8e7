//! Review ratings and the arena rating aggregate.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::openapi::schema::{ObjectBuilder, Schema, Type};
use utoipa::openapi::RefOr;
use utoipa::{PartialSchema, ToSchema};

use super::DomainError;

/// Star rating of a single review, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest allowed rating.
    pub const MIN: u8 = 1;
    /// Highest allowed rating.
    pub const MAX: u8 = 5;

    /// Validates and wraps a rating.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::RatingOutOfRange`] outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, DomainError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(DomainError::RatingOutOfRange(value))
    }

    /// The numeric star value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl PartialSchema for Rating {
    fn schema() -> RefOr<Schema> {
        ObjectBuilder::new()
            .schema_type(Type::Integer)
            .minimum(Some(Self::MIN))
            .maximum(Some(Self::MAX))
            .description(Some("Star rating from 1 to 5"))
            .into()
    }
}

impl ToSchema for Rating {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Rating")
    }
}

/// Derived rating of an arena: rounded mean and review count.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, ToSchema)]
pub struct RatingSummary {
    /// Mean rating rounded to one decimal, `0.0` without reviews.
    pub rating: f64,
    /// Number of reviews the mean was computed from.
    pub total_reviews: u32,
}

impl RatingSummary {
    /// Aggregates a set of ratings.
    ///
    /// Deterministic in its input: recomputing from the same review set
    /// always yields the same summary.
    #[must_use]
    pub fn from_ratings(ratings: impl IntoIterator<Item = Rating>) -> Self {
        let (sum, count) = ratings
            .into_iter()
            .fold((0u64, 0u32), |(sum, count), r| {
                (sum + u64::from(r.get()), count.saturating_add(1))
            });
        if count == 0 {
            return Self::default();
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = sum as f64 / f64::from(count);
        Self {
            rating: (mean * 10.0).round() / 10.0,
            total_reviews: count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn ratings(values: &[i64]) -> Vec<Rating> {
        values
            .iter()
            .map(|v| {
                let Ok(r) = Rating::new(*v) else {
                    panic!("valid rating {v}");
                };
                r
            })
            .collect()
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(Rating::new(0), Err(DomainError::RatingOutOfRange(0)));
        assert_eq!(Rating::new(6), Err(DomainError::RatingOutOfRange(6)));
        assert_eq!(Rating::new(-3), Err(DomainError::RatingOutOfRange(-3)));
        assert!(Rating::new(1).is_ok());
        assert!(Rating::new(5).is_ok());
    }

    #[test]
    fn mean_of_four_five_three_is_four() {
        let summary = RatingSummary::from_ratings(ratings(&[4, 5, 3]));
        assert!((summary.rating - 4.0).abs() < f64::EPSILON);
        assert_eq!(summary.total_reviews, 3);
    }

    #[test]
    fn rounds_to_one_decimal() {
        // 14 / 3 = 4.666…
        let summary = RatingSummary::from_ratings(ratings(&[5, 5, 4]));
        assert!((summary.rating - 4.7).abs() < 1e-9);
        // 7 / 2 = 3.5 stays exact
        let summary = RatingSummary::from_ratings(ratings(&[3, 4]));
        assert!((summary.rating - 3.5).abs() < 1e-9);
    }

    #[test]
    fn no_reviews_is_zero() {
        let summary = RatingSummary::from_ratings(Vec::new());
        assert_eq!(summary, RatingSummary::default());
        assert_eq!(summary.total_reviews, 0);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let set = ratings(&[2, 3, 5, 5]);
        let first = RatingSummary::from_ratings(set.clone());
        let second = RatingSummary::from_ratings(set);
        assert_eq!(first, second);
    }

    #[test]
    fn deserializes_with_validation() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn schema_is_a_bounded_integer() {
        assert_eq!(Rating::name(), "Rating");
        let Ok(schema) = serde_json::to_value(Rating::schema()) else {
            panic!("schema serializes");
        };
        assert_eq!(schema.get("type"), Some(&serde_json::json!("integer")));
        assert_eq!(schema.get("minimum"), Some(&serde_json::json!(1)));
        assert_eq!(schema.get("maximum"), Some(&serde_json::json!(5)));
    }
}
