//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{DrawPolicy, EventBus, Store};
use crate::service::{ArenaService, BookingService, MatchService, ReviewService, TeamService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Arena listings.
    pub arena_service: Arc<ArenaService>,
    /// Bookings and availability.
    pub booking_service: Arc<BookingService>,
    /// Reviews and arena ratings.
    pub review_service: Arc<ReviewService>,
    /// Teams and the leaderboard.
    pub team_service: Arc<TeamService>,
    /// Matches and team statistics.
    pub match_service: Arc<MatchService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires every service to one shared store and event bus.
    #[must_use]
    pub fn new(store: Arc<Store>, event_bus: EventBus, draw_policy: DrawPolicy) -> Self {
        Self {
            arena_service: Arc::new(ArenaService::new(Arc::clone(&store), event_bus.clone())),
            booking_service: Arc::new(BookingService::new(Arc::clone(&store), event_bus.clone())),
            review_service: Arc::new(ReviewService::new(Arc::clone(&store), event_bus.clone())),
            team_service: Arc::new(TeamService::new(Arc::clone(&store), event_bus.clone())),
            match_service: Arc::new(MatchService::new(store, event_bus.clone(), draw_policy)),
            event_bus,
        }
    }
}
