//! Domain layer: documents, pure booking/rating/standings logic, the
//! document store, and the event system.
//!
//! Everything here is independent of HTTP. Lifecycle rules live on the
//! documents themselves ([`Booking`], [`Match`]); derived aggregates
//! ([`Arena`] rating, [`Team`] record) can only be changed through the
//! recomputation entry points in [`crate::service`].

pub mod actor;
pub mod arena;
pub mod booking;
pub mod conflict;
pub mod error;
pub mod event;
pub mod event_bus;
pub mod fixture;
pub mod ids;
pub mod rating;
pub mod review;
pub mod sport;
pub mod standings;
pub mod store;
pub mod team;
pub mod time_slot;

pub use actor::{Actor, Role};
pub use arena::Arena;
pub use booking::{Booking, BookingStatus};
pub use conflict::has_conflict;
pub use error::DomainError;
pub use event::{DomainEvent, RosterChange};
pub use event_bus::EventBus;
pub use fixture::{Completion, Match, MatchResult, MatchState, PlayerStat};
pub use ids::{ArenaId, BookingId, MatchId, ReviewId, TeamId, UserId};
pub use rating::{Rating, RatingSummary};
pub use review::Review;
pub use sport::Sport;
pub use standings::{DrawPolicy, Outcome, Side, SideResult, Tally, TeamRecord};
pub use store::{Collection, Document, Store, StoreError};
pub use team::Team;
pub use time_slot::{ClockTime, TimeSlot};
