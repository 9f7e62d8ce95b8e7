//! Arena service: listings and admin approval.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Actor, Arena, ArenaId, DomainEvent, EventBus, Role, Sport, Store};
use crate::error::ApiError;

/// Fields of a new arena listing.
#[derive(Debug, Clone)]
pub struct NewArena {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Supported sports.
    pub sports: Vec<Sport>,
    /// Hourly price.
    pub price_per_hour: f64,
}

/// Listing filters.
#[derive(Debug, Clone, Default)]
pub struct ArenaFilter {
    /// Only arenas with this approval state.
    pub approved: Option<bool>,
    /// Only arenas in this city (case-insensitive).
    pub city: Option<String>,
}

/// Orchestration layer for arena listings.
#[derive(Debug, Clone)]
pub struct ArenaService {
    store: Arc<Store>,
    event_bus: EventBus,
}

impl ArenaService {
    /// Creates a new `ArenaService`.
    #[must_use]
    pub fn new(store: Arc<Store>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Lists a new arena. Arenas created by admins go live immediately;
    /// everyone else waits for approval.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for players and
    /// [`ApiError::InvalidRequest`] for a blank name or negative price.
    pub async fn create_arena(&self, actor: Actor, new: NewArena) -> Result<Arena, ApiError> {
        if actor.role == Role::Player {
            return Err(ApiError::Forbidden(
                "only arena owners and admins can list arenas".to_string(),
            ));
        }
        if new.name.trim().is_empty() {
            return Err(ApiError::InvalidRequest("name is required".to_string()));
        }
        if !new.price_per_hour.is_finite() || new.price_per_hour < 0.0 {
            return Err(ApiError::InvalidRequest(
                "price_per_hour must be a non-negative number".to_string(),
            ));
        }

        let mut arena = Arena::new(
            actor.user_id,
            new.name,
            new.sports,
            new.price_per_hour,
            actor.is_admin(),
        );
        arena.description = new.description;
        arena.city = new.city;
        arena.address = new.address;

        let arena_id = self.store.arenas.insert(arena.clone()).await?;

        let _ = self.event_bus.publish(DomainEvent::ArenaCreated {
            arena_id,
            owner_id: arena.owner_id,
            name: arena.name.clone(),
            approved: arena.approved,
            timestamp: Utc::now(),
        });

        tracing::info!(%arena_id, owner_id = %arena.owner_id, approved = arena.approved, "arena created");
        Ok(arena)
    }

    /// Returns one arena.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the arena does not exist.
    pub async fn get_arena(&self, arena_id: ArenaId) -> Result<Arena, ApiError> {
        Ok(self.store.arenas.get(arena_id).await?)
    }

    /// Lists arenas matching `filter`, best rated first.
    pub async fn list_arenas(&self, filter: &ArenaFilter) -> Vec<Arena> {
        let mut arenas = self
            .store
            .arenas
            .filter(|arena| {
                filter.approved.is_none_or(|approved| arena.approved == approved)
                    && filter.city.as_deref().is_none_or(|city| {
                        arena
                            .city
                            .as_deref()
                            .is_some_and(|c| c.eq_ignore_ascii_case(city))
                    })
            })
            .await;
        arenas.sort_by(|a, b| {
            b.rating()
                .total_cmp(&a.rating())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        arenas
    }

    /// Approves an arena listing so it can be booked and reviewed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for non-admins and
    /// [`ApiError::NotFound`] if the arena does not exist.
    pub async fn approve_arena(&self, actor: Actor, arena_id: ArenaId) -> Result<Arena, ApiError> {
        if !actor.is_admin() {
            return Err(ApiError::Forbidden("only admins can approve arenas".to_string()));
        }
        let (arena, ()) = self
            .store
            .arenas
            .update(arena_id, |arena| -> Result<(), ApiError> {
                arena.approved = true;
                arena.updated_at = Utc::now();
                Ok(())
            })
            .await?;

        let _ = self.event_bus.publish(DomainEvent::ArenaApproved {
            arena_id,
            timestamp: Utc::now(),
        });

        tracing::info!(%arena_id, "arena approved");
        Ok(arena)
    }
}
