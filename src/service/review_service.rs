//! Review service: one review per user and arena, with the arena rating
//! recomputed after every change.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use crate::domain::review::validate_comment;
use crate::domain::{
    Actor, ArenaId, BookingId, BookingStatus, DomainEvent, EventBus, Rating, RatingSummary,
    Review, ReviewId, Store, StoreError,
};
use crate::error::ApiError;

/// Fields of a new review.
#[derive(Debug, Clone)]
pub struct NewReview {
    /// Reviewed arena.
    pub arena_id: ArenaId,
    /// Completed booking backing the review.
    pub booking_id: Option<BookingId>,
    /// Star rating.
    pub rating: Rating,
    /// Review text.
    pub comment: String,
}

/// Partial update of a review.
#[derive(Debug, Clone, Default)]
pub struct ReviewUpdate {
    /// New star rating.
    pub rating: Option<Rating>,
    /// New review text.
    pub comment: Option<String>,
}

/// Reviews of one arena with their aggregate.
#[derive(Debug, Clone)]
pub struct ArenaReviews {
    /// Reviews, newest first.
    pub reviews: Vec<Review>,
    /// Aggregate over all of them.
    pub summary: RatingSummary,
    /// Number of reviews per star value `1..=5`.
    pub distribution: BTreeMap<u8, u32>,
}

/// Orchestration layer for arena reviews.
#[derive(Debug, Clone)]
pub struct ReviewService {
    store: Arc<Store>,
    event_bus: EventBus,
}

impl ReviewService {
    /// Creates a new `ReviewService`.
    #[must_use]
    pub fn new(store: Arc<Store>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Posts a review and refreshes the arena rating.
    ///
    /// A review that names one of the author's completed bookings at the
    /// same arena is marked verified.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the arena or booking does not exist.
    /// - [`ApiError::InvalidRequest`] if the arena is unapproved or the
    ///   booking does not back the review.
    /// - [`ApiError::DuplicateReview`] if the user already reviewed the arena.
    pub async fn create_review(&self, actor: Actor, new: NewReview) -> Result<Review, ApiError> {
        validate_comment(&new.comment)?;
        let arena = self.store.arenas.get(new.arena_id).await?;
        if !arena.approved {
            return Err(ApiError::InvalidRequest(
                "cannot review an arena that is not approved".to_string(),
            ));
        }

        let is_verified = match new.booking_id {
            Some(booking_id) => {
                let booking = self.store.bookings.get(booking_id).await?;
                if booking.user_id != actor.user_id || booking.arena_id != new.arena_id {
                    return Err(ApiError::InvalidRequest(
                        "booking does not belong to you at this arena".to_string(),
                    ));
                }
                if booking.status != BookingStatus::Completed {
                    return Err(ApiError::InvalidRequest(
                        "only completed bookings can be reviewed".to_string(),
                    ));
                }
                true
            }
            None => false,
        };

        let now = Utc::now();
        let review = Review {
            id: ReviewId::new(),
            arena_id: new.arena_id,
            user_id: actor.user_id,
            booking_id: new.booking_id,
            rating: new.rating,
            comment: new.comment,
            is_verified,
            created_at: now,
            updated_at: now,
        };

        let review_id = self
            .store
            .reviews
            .insert_unless(review.clone(), |mut existing| {
                existing.any(|other| other.same_author_and_arena(&review))
            })
            .await
            .ok_or(ApiError::DuplicateReview)?;

        self.publish_change(review.arena_id, review_id, "created");
        tracing::info!(%review_id, arena_id = %review.arena_id, rating = review.rating.get(), "review created");

        self.recompute_arena_rating(review.arena_id).await?;
        Ok(review)
    }

    /// Edits the author's review and refreshes the arena rating.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the review does not exist and
    /// [`ApiError::Forbidden`] unless the caller wrote it.
    pub async fn update_review(
        &self,
        actor: Actor,
        review_id: ReviewId,
        update: ReviewUpdate,
    ) -> Result<Review, ApiError> {
        if let Some(comment) = &update.comment {
            validate_comment(comment)?;
        }
        let (review, ()) = self
            .store
            .reviews
            .update(review_id, |review| -> Result<(), ApiError> {
                if review.user_id != actor.user_id {
                    return Err(ApiError::Forbidden(
                        "only the author can edit a review".to_string(),
                    ));
                }
                if let Some(rating) = update.rating {
                    review.rating = rating;
                }
                if let Some(comment) = update.comment {
                    review.comment = comment;
                }
                review.updated_at = Utc::now();
                Ok(())
            })
            .await?;

        self.publish_change(review.arena_id, review_id, "updated");
        tracing::info!(%review_id, arena_id = %review.arena_id, "review updated");

        self.recompute_arena_rating(review.arena_id).await?;
        Ok(review)
    }

    /// Deletes a review (author or admin) and refreshes the arena rating.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the review does not exist and
    /// [`ApiError::Forbidden`] for anyone but the author or an admin.
    pub async fn delete_review(&self, actor: Actor, review_id: ReviewId) -> Result<RatingSummary, ApiError> {
        let review = self.store.reviews.get(review_id).await?;
        if !actor.is_or_admin(review.user_id) {
            return Err(ApiError::Forbidden(
                "only the author or an admin can delete a review".to_string(),
            ));
        }
        let removed = self.store.reviews.remove(review_id).await?;

        self.publish_change(removed.arena_id, review_id, "deleted");
        tracing::info!(%review_id, arena_id = %removed.arena_id, "review deleted");

        self.recompute_arena_rating(removed.arena_id).await
    }

    /// Reviews of an arena with the rating distribution.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the arena does not exist.
    pub async fn list_for_arena(&self, arena_id: ArenaId) -> Result<ArenaReviews, ApiError> {
        let arena = self.store.arenas.get(arena_id).await?;
        let mut reviews = self.store.reviews.filter(|r| r.arena_id == arena_id).await;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut distribution: BTreeMap<u8, u32> = (Rating::MIN..=Rating::MAX).map(|star| (star, 0)).collect();
        for review in &reviews {
            *distribution.entry(review.rating.get()).or_default() += 1;
        }

        Ok(ArenaReviews {
            reviews,
            summary: arena.rating_summary(),
            distribution,
        })
    }

    /// Recomputes an arena's rating and review count from its reviews and
    /// stores them on the arena.
    ///
    /// Idempotent: the result depends only on the current review set. If
    /// the arena no longer exists, the summary is still returned but
    /// nothing is persisted.
    ///
    /// # Errors
    ///
    /// Only fails on store errors other than a missing arena.
    pub async fn recompute_arena_rating(&self, arena_id: ArenaId) -> Result<RatingSummary, ApiError> {
        let ratings: Vec<Rating> = self
            .store
            .reviews
            .filter(|r| r.arena_id == arena_id)
            .await
            .into_iter()
            .map(|r| r.rating)
            .collect();
        let summary = RatingSummary::from_ratings(ratings);

        match self
            .store
            .arenas
            .update(arena_id, |arena| -> Result<(), StoreError> {
                arena.apply_rating(summary);
                Ok(())
            })
            .await
        {
            Ok(_) => {}
            Err(StoreError::NotFound { .. }) => {
                tracing::warn!(%arena_id, "arena missing during rating recompute; nothing persisted");
                return Ok(summary);
            }
            Err(err) => return Err(err.into()),
        }

        let _ = self.event_bus.publish(DomainEvent::RatingRecomputed {
            arena_id,
            rating: summary.rating,
            total_reviews: summary.total_reviews,
            timestamp: Utc::now(),
        });

        tracing::info!(%arena_id, rating = summary.rating, total_reviews = summary.total_reviews, "arena rating recomputed");
        Ok(summary)
    }

    fn publish_change(&self, arena_id: ArenaId, review_id: ReviewId, change: &'static str) {
        let _ = self.event_bus.publish(DomainEvent::ReviewChanged {
            arena_id,
            review_id,
            change,
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Arena, Role, Sport, UserId};

    async fn setup() -> (ReviewService, Arc<Store>, ArenaId) {
        let store = Arc::new(Store::new());
        let arena = Arena::new(UserId::new(), "Turf".to_string(), vec![Sport::Cricket], 800.0, true);
        let arena_id = arena.id;
        let _ = store.arenas.insert(arena).await;
        (ReviewService::new(Arc::clone(&store), EventBus::new(100)), store, arena_id)
    }

    fn player() -> Actor {
        Actor::new(UserId::new(), Role::Player)
    }

    fn stars(value: i64) -> Rating {
        let Ok(rating) = Rating::new(value) else {
            panic!("valid rating");
        };
        rating
    }

    fn new_review(arena_id: ArenaId, rating: i64) -> NewReview {
        NewReview {
            arena_id,
            booking_id: None,
            rating: stars(rating),
            comment: "good pitch".to_string(),
        }
    }

    #[tokio::test]
    async fn three_reviews_average_to_four() {
        let (service, store, arena_id) = setup().await;
        for rating in [4, 5, 3] {
            assert!(service.create_review(player(), new_review(arena_id, rating)).await.is_ok());
        }
        let Ok(arena) = store.arenas.get(arena_id).await else {
            panic!("arena missing");
        };
        assert_eq!(
            arena.rating_summary(),
            RatingSummary {
                rating: 4.0,
                total_reviews: 3
            }
        );
    }

    #[tokio::test]
    async fn recompute_is_idempotent() {
        let (service, _, arena_id) = setup().await;
        let _ = service.create_review(player(), new_review(arena_id, 2)).await;
        let _ = service.create_review(player(), new_review(arena_id, 5)).await;
        let Ok(first) = service.recompute_arena_rating(arena_id).await else {
            panic!("recompute failed");
        };
        let Ok(second) = service.recompute_arena_rating(arena_id).await else {
            panic!("recompute failed");
        };
        assert_eq!(first, second);
        assert_eq!(first.total_reviews, 2);
    }

    #[tokio::test]
    async fn deleting_only_review_resets_rating() {
        let (service, store, arena_id) = setup().await;
        let author = player();
        let Ok(review) = service.create_review(author, new_review(arena_id, 5)).await else {
            panic!("create failed");
        };
        let Ok(summary) = service.delete_review(author, review.id).await else {
            panic!("delete failed");
        };
        assert_eq!(summary, RatingSummary::default());
        let Ok(arena) = store.arenas.get(arena_id).await else {
            panic!("arena missing");
        };
        assert_eq!(arena.total_reviews(), 0);
        assert!(arena.rating().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn second_review_by_same_user_conflicts() {
        let (service, _, arena_id) = setup().await;
        let author = player();
        assert!(service.create_review(author, new_review(arena_id, 4)).await.is_ok());
        let again = service.create_review(author, new_review(arena_id, 1)).await;
        assert!(matches!(again, Err(ApiError::DuplicateReview)));
    }

    #[tokio::test]
    async fn update_by_author_only() {
        let (service, store, arena_id) = setup().await;
        let author = player();
        let Ok(review) = service.create_review(author, new_review(arena_id, 2)).await else {
            panic!("create failed");
        };
        let update = ReviewUpdate {
            rating: Some(stars(4)),
            comment: None,
        };
        let denied = service.update_review(player(), review.id, update.clone()).await;
        assert!(matches!(denied, Err(ApiError::Forbidden(_))));

        assert!(service.update_review(author, review.id, update).await.is_ok());
        let Ok(arena) = store.arenas.get(arena_id).await else {
            panic!("arena missing");
        };
        assert!((arena.rating() - 4.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn missing_arena_recompute_is_noop() {
        let (service, _, _) = setup().await;
        let Ok(summary) = service.recompute_arena_rating(ArenaId::new()).await else {
            panic!("recompute should not fail");
        };
        assert_eq!(summary.total_reviews, 0);
    }

    #[tokio::test]
    async fn distribution_counts_each_star() {
        let (service, _, arena_id) = setup().await;
        for rating in [5, 5, 1] {
            let _ = service.create_review(player(), new_review(arena_id, rating)).await;
        }
        let Ok(listing) = service.list_for_arena(arena_id).await else {
            panic!("list failed");
        };
        assert_eq!(listing.reviews.len(), 3);
        assert_eq!(listing.distribution.get(&5), Some(&2));
        assert_eq!(listing.distribution.get(&3), Some(&0));
        assert_eq!(listing.distribution.len(), 5);
    }
}
