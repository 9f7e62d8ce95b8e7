//! Arena reviews.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{ArenaId, BookingId, DomainError, Rating, ReviewId, UserId};

/// Longest accepted review comment, in characters.
pub const MAX_COMMENT_CHARS: usize = 1000;

/// A user's rating and comment for an arena. At most one per
/// (arena, user) pair.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Review {
    /// Review identifier.
    pub id: ReviewId,
    /// Reviewed arena.
    pub arena_id: ArenaId,
    /// Author.
    pub user_id: UserId,
    /// Completed booking the review refers to, if any.
    pub booking_id: Option<BookingId>,
    /// Star rating.
    pub rating: Rating,
    /// Review text.
    pub comment: String,
    /// Set when the review is backed by a completed booking of the author.
    pub is_verified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Returns `true` if both reviews are by the same user for the same arena.
    #[must_use]
    pub fn same_author_and_arena(&self, other: &Self) -> bool {
        self.arena_id == other.arena_id && self.user_id == other.user_id
    }
}

/// Validates a review comment.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] if the comment is blank or longer
/// than [`MAX_COMMENT_CHARS`].
pub fn validate_comment(comment: &str) -> Result<(), DomainError> {
    if comment.trim().is_empty() {
        return Err(DomainError::Validation("comment is required".to_string()));
    }
    if comment.chars().count() > MAX_COMMENT_CHARS {
        return Err(DomainError::Validation(format!(
            "comment exceeds {MAX_COMMENT_CHARS} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_comment_rejected() {
        assert!(validate_comment("   ").is_err());
    }

    #[test]
    fn long_comment_rejected() {
        let comment = "x".repeat(MAX_COMMENT_CHARS + 1);
        assert!(validate_comment(&comment).is_err());
        assert!(validate_comment(&"x".repeat(MAX_COMMENT_CHARS)).is_ok());
    }
}
