//! Domain events reflecting document mutations.
//!
//! Every state change emits a [`DomainEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers and
//! optionally appended to the PostgreSQL event log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::fixture::MatchResult;
use super::{ArenaId, BookingId, BookingStatus, MatchId, ReviewId, TeamId, UserId};

/// Direction of a roster change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterChange {
    /// A player joined the team.
    Added,
    /// A player left the team.
    Removed,
}

/// Domain event emitted after every successful mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A new arena was listed.
    ArenaCreated {
        /// Arena identifier.
        arena_id: ArenaId,
        /// Listing owner.
        owner_id: UserId,
        /// Display name.
        name: String,
        /// Whether the listing went live immediately.
        approved: bool,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An admin approved an arena listing.
    ArenaApproved {
        /// Arena identifier.
        arena_id: ArenaId,
        /// Approval timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A booking was accepted into the calendar.
    BookingCreated {
        /// Booked arena.
        arena_id: ArenaId,
        /// Booking identifier.
        booking_id: BookingId,
        /// Booker.
        user_id: UserId,
        /// Day of the booking.
        date: NaiveDate,
        /// Slot start, `HH:MM`.
        start_time: String,
        /// Slot end, `HH:MM`.
        end_time: String,
        /// Amount owed.
        total_amount: f64,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A booking moved through its lifecycle.
    BookingStatusChanged {
        /// Booked arena.
        arena_id: ArenaId,
        /// Booking identifier.
        booking_id: BookingId,
        /// Status before the change.
        old_status: BookingStatus,
        /// Status after the change.
        new_status: BookingStatus,
        /// Change timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A review was created, edited or deleted.
    ReviewChanged {
        /// Reviewed arena.
        arena_id: ArenaId,
        /// Review identifier.
        review_id: ReviewId,
        /// `"created"`, `"updated"` or `"deleted"`.
        change: &'static str,
        /// Change timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An arena's derived rating was recomputed.
    RatingRecomputed {
        /// Arena identifier.
        arena_id: ArenaId,
        /// Mean rating, one decimal.
        rating: f64,
        /// Number of reviews.
        total_reviews: u32,
        /// Recompute timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A team was formed.
    TeamCreated {
        /// Team identifier.
        team_id: TeamId,
        /// Captain.
        captain_id: UserId,
        /// Display name.
        name: String,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A player joined or left a team.
    TeamRosterChanged {
        /// Team identifier.
        team_id: TeamId,
        /// Player concerned.
        user_id: UserId,
        /// Joined or left.
        change: RosterChange,
        /// Change timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A team was retired by its captain or an admin.
    TeamDeactivated {
        /// Team identifier.
        team_id: TeamId,
        /// Deactivation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A challenge match was scheduled.
    MatchScheduled {
        /// Venue.
        arena_id: ArenaId,
        /// Match identifier.
        match_id: MatchId,
        /// Challenging team.
        home_team_id: TeamId,
        /// Challenged team.
        away_team_id: TeamId,
        /// Scheduling timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A match was accepted, started or cancelled.
    MatchStatusChanged {
        /// Venue.
        arena_id: ArenaId,
        /// Match identifier.
        match_id: MatchId,
        /// Action that caused the change.
        action: &'static str,
        /// State after the change.
        status: &'static str,
        /// Change timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A match finished with a result.
    MatchCompleted {
        /// Venue.
        arena_id: ArenaId,
        /// Match identifier.
        match_id: MatchId,
        /// Final result.
        result: MatchResult,
        /// Completion timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A team's record changed after a completed match.
    TeamStatsUpdated {
        /// Team identifier.
        team_id: TeamId,
        /// Match that caused the update.
        match_id: MatchId,
        /// Wins after the update.
        wins: u32,
        /// Losses after the update.
        losses: u32,
        /// Draws after the update.
        draws: u32,
        /// Completed matches after the update.
        total_matches: u32,
        /// Update timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Returns the arena the event concerns, if any. Team-level events are
    /// not tied to a venue.
    #[must_use]
    pub const fn arena_id(&self) -> Option<ArenaId> {
        match self {
            Self::ArenaCreated { arena_id, .. }
            | Self::ArenaApproved { arena_id, .. }
            | Self::BookingCreated { arena_id, .. }
            | Self::BookingStatusChanged { arena_id, .. }
            | Self::ReviewChanged { arena_id, .. }
            | Self::RatingRecomputed { arena_id, .. }
            | Self::MatchScheduled { arena_id, .. }
            | Self::MatchStatusChanged { arena_id, .. }
            | Self::MatchCompleted { arena_id, .. } => Some(*arena_id),
            Self::TeamCreated { .. }
            | Self::TeamRosterChanged { .. }
            | Self::TeamDeactivated { .. }
            | Self::TeamStatsUpdated { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::ArenaCreated { .. } => "arena_created",
            Self::ArenaApproved { .. } => "arena_approved",
            Self::BookingCreated { .. } => "booking_created",
            Self::BookingStatusChanged { .. } => "booking_status_changed",
            Self::ReviewChanged { .. } => "review_changed",
            Self::RatingRecomputed { .. } => "rating_recomputed",
            Self::TeamCreated { .. } => "team_created",
            Self::TeamRosterChanged { .. } => "team_roster_changed",
            Self::TeamDeactivated { .. } => "team_deactivated",
            Self::MatchScheduled { .. } => "match_scheduled",
            Self::MatchStatusChanged { .. } => "match_status_changed",
            Self::MatchCompleted { .. } => "match_completed",
            Self::TeamStatsUpdated { .. } => "team_stats_updated",
        }
    }
}
