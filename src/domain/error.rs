//! Failures raised by pure domain logic.
//!
//! [`DomainError`] never carries HTTP concerns; the API layer maps each
//! variant onto a status code through [`crate::error::ApiError`].

/// Error produced by domain-level validation and state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A clock time did not match the strict `HH:MM` 24-hour format.
    #[error("invalid time {0:?}: expected HH:MM (00:00-23:59)")]
    InvalidClockTime(String),

    /// A time slot had `start >= end`.
    #[error("start time {start} must be before end time {end}")]
    EmptyTimeSlot {
        /// Requested start.
        start: String,
        /// Requested end.
        end: String,
    },

    /// A review rating fell outside `1..=5`.
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    /// A lifecycle transition is not allowed from the current state.
    #[error("cannot {action} {entity} in state {from}")]
    InvalidTransition {
        /// Kind of document (`"booking"`, `"match"`).
        entity: &'static str,
        /// Current state name.
        from: &'static str,
        /// Attempted action.
        action: &'static str,
    },

    /// Scores were level while the draw policy rejects draws.
    #[error("scores are level and draws are not permitted")]
    DrawNotAllowed,

    /// Any other malformed input.
    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    /// Returns `true` if the error stems from the current lifecycle state
    /// rather than from malformed input.
    #[must_use]
    pub const fn is_state_conflict(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}
