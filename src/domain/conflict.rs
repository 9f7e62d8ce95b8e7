//! Booking time-slot conflict detection.
//!
//! A proposed slot conflicts with an existing booking when both target the
//! same arena on the same calendar day, the existing booking is active
//! (`pending` or `confirmed`), and the half-open intervals intersect.

use chrono::NaiveDate;

use super::{ArenaId, Booking, TimeSlot};

/// Returns `true` if any booking in `existing` blocks `slot` on `date` at
/// `arena_id`.
///
/// The date is a [`NaiveDate`], so time-of-day components never take part
/// in the comparison.
pub fn has_conflict<'a>(
    existing: impl IntoIterator<Item = &'a Booking>,
    arena_id: ArenaId,
    date: NaiveDate,
    slot: &TimeSlot,
) -> bool {
    existing
        .into_iter()
        .any(|booking| booking.blocks(arena_id, date, slot))
}
