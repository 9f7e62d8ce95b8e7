//! Service layer: business logic orchestration.
//!
//! Each service owns an `Arc` of the shared [`crate::domain::Store`] and a
//! handle to the [`crate::domain::EventBus`]. Mutations follow one pattern:
//! authorize the caller, apply the change under the store lock, publish a
//! [`crate::domain::DomainEvent`], log, and return the stored document.

pub mod arena_service;
pub mod booking_service;
pub mod match_service;
pub mod review_service;
pub mod team_service;

pub use arena_service::{ArenaFilter, ArenaService, NewArena};
pub use booking_service::{BookingService, NewBooking};
pub use match_service::{MatchService, NewMatch};
pub use review_service::{ArenaReviews, NewReview, ReviewService, ReviewUpdate};
pub use team_service::{NewTeam, TeamService};
