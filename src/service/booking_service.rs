//! Booking service: conflict-checked reservations and their lifecycle.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::{
    Actor, Arena, ArenaId, Booking, BookingId, BookingStatus, DomainEvent, EventBus, Store,
    TeamId, TimeSlot, UserId, has_conflict,
};
use crate::error::ApiError;

/// Fields of a booking request.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Arena to book.
    pub arena_id: ArenaId,
    /// Team playing in the slot.
    pub team_id: Option<TeamId>,
    /// Day of play.
    pub date: NaiveDate,
    /// Requested interval.
    pub slot: TimeSlot,
    /// Amount paid upfront.
    pub advance_payment: f64,
    /// Notes for the arena owner.
    pub notes: Option<String>,
}

/// Orchestration layer for bookings.
///
/// The conflict check and the insert run under one store write lock, so
/// two concurrent requests for overlapping slots cannot both succeed.
#[derive(Debug, Clone)]
pub struct BookingService {
    store: Arc<Store>,
    event_bus: EventBus,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(store: Arc<Store>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Returns `true` if an active booking for `arena_id` on `date`
    /// overlaps `slot`.
    pub async fn has_conflict(&self, arena_id: ArenaId, date: NaiveDate, slot: &TimeSlot) -> bool {
        self.store
            .bookings
            .any(|booking| booking.blocks(arena_id, date, slot))
            .await
    }

    /// Returns `true` if `slot` on `date` is free at an existing arena.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the arena does not exist.
    pub async fn is_available(
        &self,
        arena_id: ArenaId,
        date: NaiveDate,
        slot: &TimeSlot,
    ) -> Result<bool, ApiError> {
        let _ = self.store.arenas.get(arena_id).await?;
        Ok(!self.has_conflict(arena_id, date, slot).await)
    }

    /// Books a slot at an approved arena.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the arena or team does not exist.
    /// - [`ApiError::InvalidRequest`] if the arena is not approved or the
    ///   date is in the past.
    /// - [`ApiError::Forbidden`] if the caller is not on the named team.
    /// - [`ApiError::BookingConflict`] if the slot overlaps an active booking.
    pub async fn create_booking(&self, actor: Actor, new: NewBooking) -> Result<Booking, ApiError> {
        let arena = self.store.arenas.get(new.arena_id).await?;
        if !arena.approved {
            return Err(ApiError::InvalidRequest(
                "arena is not yet approved for bookings".to_string(),
            ));
        }
        if new.date < Utc::now().date_naive() {
            return Err(ApiError::InvalidRequest(
                "cannot book a date in the past".to_string(),
            ));
        }
        if let Some(team_id) = new.team_id {
            let team = self.store.teams.get(team_id).await?;
            if !team.has_member(actor.user_id) {
                return Err(ApiError::Forbidden(
                    "you can only book for a team you belong to".to_string(),
                ));
            }
        }

        let booking = Booking::new(
            new.arena_id,
            actor.user_id,
            new.team_id,
            new.date,
            new.slot,
            arena.price_per_hour,
            new.advance_payment,
            new.notes,
        )?;

        let (arena_id, date, slot) = (booking.arena_id, booking.date, booking.slot);
        let booking_id = self
            .store
            .bookings
            .insert_unless(booking.clone(), |existing| {
                has_conflict(existing, arena_id, date, &slot)
            })
            .await
            .ok_or(ApiError::BookingConflict)?;

        let _ = self.event_bus.publish(DomainEvent::BookingCreated {
            arena_id,
            booking_id,
            user_id: actor.user_id,
            date,
            start_time: slot.start().to_string(),
            end_time: slot.end().to_string(),
            total_amount: booking.total_amount,
            timestamp: Utc::now(),
        });

        tracing::info!(%booking_id, %arena_id, %date, %slot, "booking created");
        Ok(booking)
    }

    /// Returns one booking, visible to the booker, the arena owner and admins.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the booking does not exist and
    /// [`ApiError::Forbidden`] for anyone else.
    pub async fn get_booking(&self, actor: Actor, booking_id: BookingId) -> Result<Booking, ApiError> {
        let booking = self.store.bookings.get(booking_id).await?;
        if actor.is_or_admin(booking.user_id) {
            return Ok(booking);
        }
        let arena = self.store.arenas.get(booking.arena_id).await?;
        if arena.owner_id == actor.user_id {
            Ok(booking)
        } else {
            Err(ApiError::Forbidden("not your booking".to_string()))
        }
    }

    /// Arena owner (or admin) accepts a pending booking.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for anyone else and a 409 domain
    /// error unless the booking is pending.
    pub async fn confirm_booking(&self, actor: Actor, booking_id: BookingId) -> Result<Booking, ApiError> {
        let booking = self.store.bookings.get(booking_id).await?;
        self.require_arena_staff(actor, booking.arena_id).await?;
        self.transition(booking_id, "confirm", |b| b.confirm()).await
    }

    /// Cancels an active booking and frees its slot. Allowed for the
    /// booker, the arena owner and admins.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for anyone else and a 409 domain
    /// error if the booking is already cancelled or completed.
    pub async fn cancel_booking(
        &self,
        actor: Actor,
        booking_id: BookingId,
        reason: Option<String>,
    ) -> Result<Booking, ApiError> {
        let booking = self.store.bookings.get(booking_id).await?;
        if booking.user_id != actor.user_id {
            self.require_arena_staff(actor, booking.arena_id).await?;
        }
        self.transition(booking_id, "cancel", |b| b.cancel(reason)).await
    }

    /// Arena owner (or admin) marks a confirmed booking as played.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for anyone else and a 409 domain
    /// error unless the booking is confirmed.
    pub async fn complete_booking(&self, actor: Actor, booking_id: BookingId) -> Result<Booking, ApiError> {
        let booking = self.store.bookings.get(booking_id).await?;
        self.require_arena_staff(actor, booking.arena_id).await?;
        self.transition(booking_id, "complete", |b| b.complete()).await
    }

    /// Bookings at an arena on one day, in slot order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the arena does not exist.
    pub async fn list_for_arena(&self, arena_id: ArenaId, date: NaiveDate) -> Result<Vec<Booking>, ApiError> {
        let _ = self.store.arenas.get(arena_id).await?;
        let mut bookings = self
            .store
            .bookings
            .filter(|b| b.arena_id == arena_id && b.date == date)
            .await;
        bookings.sort_by_key(|b| (b.slot.start(), b.created_at));
        Ok(bookings)
    }

    /// Bookings made by `user_id`, most recent date first.
    pub async fn list_for_user(&self, user_id: UserId) -> Vec<Booking> {
        let mut bookings = self.store.bookings.filter(|b| b.user_id == user_id).await;
        bookings.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.slot.start().cmp(&b.slot.start()))
        });
        bookings
    }

    async fn require_arena_staff(&self, actor: Actor, arena_id: ArenaId) -> Result<Arena, ApiError> {
        let arena = self.store.arenas.get(arena_id).await?;
        if actor.is_or_admin(arena.owner_id) {
            Ok(arena)
        } else {
            Err(ApiError::Forbidden(
                "only the arena owner or an admin can do this".to_string(),
            ))
        }
    }

    async fn transition<F>(&self, booking_id: BookingId, action: &'static str, apply: F) -> Result<Booking, ApiError>
    where
        F: FnOnce(&mut Booking) -> Result<(), crate::domain::DomainError>,
    {
        let (booking, old_status) = self
            .store
            .bookings
            .update(booking_id, |booking| -> Result<_, ApiError> {
                let old_status: BookingStatus = booking.status;
                apply(booking)?;
                Ok(old_status)
            })
            .await?;

        let _ = self.event_bus.publish(DomainEvent::BookingStatusChanged {
            arena_id: booking.arena_id,
            booking_id,
            old_status,
            new_status: booking.status,
            timestamp: Utc::now(),
        });

        tracing::info!(%booking_id, arena_id = %booking.arena_id, action, status = booking.status.as_str(), "booking updated");
        Ok(booking)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Role, Sport};
    use chrono::Days;

    struct Fixture {
        service: BookingService,
        store: Arc<Store>,
        arena_id: ArenaId,
        owner: Actor,
    }

    async fn setup() -> Fixture {
        let store = Arc::new(Store::new());
        let owner = Actor::new(UserId::new(), Role::ArenaOwner);
        let arena = Arena::new(owner.user_id, "Turf".to_string(), vec![Sport::Futsal], 1000.0, true);
        let arena_id = arena.id;
        let Ok(_) = store.arenas.insert(arena).await else {
            panic!("insert failed");
        };
        Fixture {
            service: BookingService::new(Arc::clone(&store), EventBus::new(100)),
            store,
            arena_id,
            owner,
        }
    }

    fn tomorrow() -> NaiveDate {
        let Some(date) = Utc::now().date_naive().checked_add_days(Days::new(1)) else {
            panic!("valid date");
        };
        date
    }

    fn request(arena_id: ArenaId, start: &str, end: &str) -> NewBooking {
        let Ok(slot) = TimeSlot::parse(start, end) else {
            panic!("valid slot");
        };
        NewBooking {
            arena_id,
            team_id: None,
            date: tomorrow(),
            slot,
            advance_payment: 0.0,
            notes: None,
        }
    }

    fn player() -> Actor {
        Actor::new(UserId::new(), Role::Player)
    }

    #[tokio::test]
    async fn overlapping_request_is_rejected() {
        let fx = setup().await;
        let Ok(first) = fx.service.create_booking(player(), request(fx.arena_id, "09:30", "10:30")).await else {
            panic!("first booking failed");
        };
        assert!((first.total_amount - 1000.0).abs() < f64::EPSILON);
        let second = fx.service.create_booking(player(), request(fx.arena_id, "09:00", "10:00")).await;
        assert!(matches!(second, Err(ApiError::BookingConflict)));
    }

    #[tokio::test]
    async fn adjacent_slots_coexist() {
        let fx = setup().await;
        assert!(fx.service.create_booking(player(), request(fx.arena_id, "10:00", "11:00")).await.is_ok());
        assert!(fx.service.create_booking(player(), request(fx.arena_id, "11:00", "12:00")).await.is_ok());
        let Ok(day) = fx.service.list_for_arena(fx.arena_id, tomorrow()).await else {
            panic!("list failed");
        };
        assert_eq!(day.len(), 2);
    }

    #[tokio::test]
    async fn cancelled_booking_frees_slot() {
        let fx = setup().await;
        let booker = player();
        let Ok(booking) = fx.service.create_booking(booker, request(fx.arena_id, "18:00", "19:00")).await else {
            panic!("booking failed");
        };
        assert!(fx.service.cancel_booking(booker, booking.id, None).await.is_ok());
        let Ok(slot) = TimeSlot::parse("18:00", "19:00") else {
            panic!("valid slot");
        };
        assert!(!fx.service.has_conflict(fx.arena_id, tomorrow(), &slot).await);
        assert!(fx.service.create_booking(player(), request(fx.arena_id, "18:00", "19:00")).await.is_ok());
    }

    #[tokio::test]
    async fn concurrent_overlapping_requests_book_once() {
        let fx = setup().await;
        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = fx.service.clone();
            let req = request(fx.arena_id, "20:00", "21:00");
            handles.push(tokio::spawn(async move { service.create_booking(player(), req).await }));
        }
        let mut booked = 0;
        for handle in handles {
            let Ok(result) = handle.await else {
                panic!("task panicked");
            };
            if result.is_ok() {
                booked += 1;
            }
        }
        assert_eq!(booked, 1);
        assert_eq!(fx.store.bookings.len().await, 1);
    }

    #[tokio::test]
    async fn unapproved_arena_and_past_dates_rejected() {
        let fx = setup().await;
        let pending = Arena::new(fx.owner.user_id, "New".to_string(), vec![], 500.0, false);
        let pending_id = pending.id;
        let _ = fx.store.arenas.insert(pending).await;
        let result = fx.service.create_booking(player(), request(pending_id, "09:00", "10:00")).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));

        let mut past = request(fx.arena_id, "09:00", "10:00");
        let Some(yesterday) = Utc::now().date_naive().checked_sub_days(Days::new(1)) else {
            panic!("valid date");
        };
        past.date = yesterday;
        let result = fx.service.create_booking(player(), past).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn only_staff_confirm_and_complete() {
        let fx = setup().await;
        let booker = player();
        let Ok(booking) = fx.service.create_booking(booker, request(fx.arena_id, "07:00", "08:00")).await else {
            panic!("booking failed");
        };
        let result = fx.service.confirm_booking(booker, booking.id).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));

        let Ok(confirmed) = fx.service.confirm_booking(fx.owner, booking.id).await else {
            panic!("confirm failed");
        };
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        let again = fx.service.confirm_booking(fx.owner, booking.id).await;
        assert!(matches!(again, Err(ApiError::Domain(_))));

        let Ok(done) = fx.service.complete_booking(fx.owner, booking.id).await else {
            panic!("complete failed");
        };
        assert_eq!(done.status, BookingStatus::Completed);
        assert_eq!(fx.service.list_for_user(booker.user_id).await.len(), 1);
    }

    #[tokio::test]
    async fn strangers_cannot_read_or_cancel() {
        let fx = setup().await;
        let booker = player();
        let Ok(booking) = fx.service.create_booking(booker, request(fx.arena_id, "07:00", "08:00")).await else {
            panic!("booking failed");
        };
        let stranger = player();
        assert!(matches!(
            fx.service.get_booking(stranger, booking.id).await,
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            fx.service.cancel_booking(stranger, booking.id, None).await,
            Err(ApiError::Forbidden(_))
        ));
        assert!(fx.service.get_booking(fx.owner, booking.id).await.is_ok());
    }
}
