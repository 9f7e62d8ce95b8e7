//! Booking documents and their lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ArenaId, BookingId, DomainError, TeamId, TimeSlot, UserId};

/// Lifecycle state of a booking.
///
/// ```text
/// pending ──confirm──▶ confirmed ──complete──▶ completed
///    │                     │
///    └──────cancel─────────┴──────▶ cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Requested by a player, awaiting the arena owner.
    Pending,
    /// Accepted by the arena owner.
    Confirmed,
    /// Withdrawn by the player, owner, or an admin.
    Cancelled,
    /// Played out.
    Completed,
}

impl BookingStatus {
    /// Returns `true` if a booking in this state occupies its slot.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Returns the status as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

/// A reservation of one arena for one time slot on one day.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Booking {
    /// Booking identifier.
    pub id: BookingId,
    /// Booked arena.
    pub arena_id: ArenaId,
    /// Player who made the booking.
    pub user_id: UserId,
    /// Team playing in the slot, if any. Required to host a match.
    pub team_id: Option<TeamId>,
    /// Calendar day of the booking.
    pub date: NaiveDate,
    /// Booked interval.
    #[serde(flatten)]
    pub slot: TimeSlot,
    /// Length of the slot in hours.
    pub duration: f64,
    /// `duration * price_per_hour` at booking time.
    pub total_amount: f64,
    /// Amount paid upfront.
    pub advance_payment: f64,
    /// Free-form notes from the player.
    pub notes: Option<String>,
    /// Current lifecycle state.
    pub status: BookingStatus,
    /// Reason supplied on cancellation.
    pub cancellation_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a pending booking priced at `price_per_hour`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] if `advance_payment` is negative
    /// or exceeds the total amount.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        arena_id: ArenaId,
        user_id: UserId,
        team_id: Option<TeamId>,
        date: NaiveDate,
        slot: TimeSlot,
        price_per_hour: f64,
        advance_payment: f64,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        let duration = slot.duration_hours();
        let total_amount = duration * price_per_hour;
        if !(0.0..=total_amount).contains(&advance_payment) {
            return Err(DomainError::Validation(format!(
                "advance payment {advance_payment} must be between 0 and the total amount {total_amount}"
            )));
        }
        let now = Utc::now();
        Ok(Self {
            id: BookingId::new(),
            arena_id,
            user_id,
            team_id,
            date,
            slot,
            duration,
            total_amount,
            advance_payment,
            notes,
            status: BookingStatus::Pending,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns `true` if this booking is active and blocks `slot` on
    /// `date` at `arena_id`.
    #[must_use]
    pub fn blocks(&self, arena_id: ArenaId, date: NaiveDate, slot: &TimeSlot) -> bool {
        self.arena_id == arena_id
            && self.date == date
            && self.status.is_active()
            && self.slot.overlaps(slot)
    }

    /// Moves a pending booking to confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] unless the booking is pending.
    pub fn confirm(&mut self) -> Result<(), DomainError> {
        self.transition("confirm", BookingStatus::Confirmed, |s| {
            s == BookingStatus::Pending
        })
    }

    /// Cancels an active booking, releasing its slot.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] if the booking is already
    /// cancelled or completed.
    pub fn cancel(&mut self, reason: Option<String>) -> Result<(), DomainError> {
        self.transition("cancel", BookingStatus::Cancelled, BookingStatus::is_active)?;
        self.cancellation_reason = reason;
        Ok(())
    }

    /// Marks a confirmed booking as played.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] unless the booking is confirmed.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.transition("complete", BookingStatus::Completed, |s| {
            s == BookingStatus::Confirmed
        })
    }

    fn transition(
        &mut self,
        action: &'static str,
        to: BookingStatus,
        allowed: impl Fn(BookingStatus) -> bool,
    ) -> Result<(), DomainError> {
        if !allowed(self.status) {
            return Err(DomainError::InvalidTransition {
                entity: "booking",
                from: self.status.as_str(),
                action,
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}
