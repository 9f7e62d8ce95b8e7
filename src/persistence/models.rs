//! Database row models.

use uuid::Uuid;

use crate::domain::DomainEvent;

/// Column values of a row appended to the `events` table. `id` and
/// `created_at` are assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Arena the event concerns; `None` for team events.
    pub arena_id: Option<Uuid>,
    /// Event type discriminator (e.g. `"booking_created"`).
    pub event_type: &'static str,
    /// JSONB payload with the serialized event.
    pub payload: serde_json::Value,
}

impl EventRecord {
    /// Builds the row for `event`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the payload cannot be encoded.
    pub fn from_event(event: &DomainEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            arena_id: event.arena_id().map(Uuid::from),
            event_type: event.event_type_str(),
            payload: serde_json::to_value(event)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{ArenaId, TeamId};

    #[test]
    fn arena_event_row() {
        let arena_id = ArenaId::new();
        let event = DomainEvent::ArenaApproved {
            arena_id,
            timestamp: Utc::now(),
        };
        let Ok(row) = EventRecord::from_event(&event) else {
            panic!("row builds");
        };
        assert_eq!(row.arena_id, Some(Uuid::from(arena_id)));
        assert_eq!(row.event_type, "arena_approved");
        assert_eq!(
            row.payload.get("event_type"),
            Some(&serde_json::json!("arena_approved"))
        );
    }

    #[test]
    fn team_event_row_has_no_arena() {
        let team_id = TeamId::new();
        let event = DomainEvent::TeamDeactivated {
            team_id,
            timestamp: Utc::now(),
        };
        let Ok(row) = EventRecord::from_event(&event) else {
            panic!("row builds");
        };
        assert_eq!(row.arena_id, None);
        assert_eq!(row.event_type, "team_deactivated");
        assert_eq!(
            row.payload.get("team_id"),
            Some(&serde_json::json!(Uuid::from(team_id).to_string()))
        );
    }
}
