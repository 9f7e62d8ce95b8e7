//! Per-connection subscription manager.
//!
//! Tracks which arenas a WebSocket client follows and filters events
//! server-side.

use std::collections::HashSet;

use crate::domain::ArenaId;

/// Arena subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    arena_ids: HashSet<ArenaId>,
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds arena IDs to the subscription set, optionally enabling the
    /// wildcard.
    pub fn subscribe(&mut self, ids: &[ArenaId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.arena_ids.extend(ids.iter().copied());
    }

    /// Removes arena IDs, optionally dropping the wildcard.
    pub fn unsubscribe(&mut self, ids: &[ArenaId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for id in ids {
            self.arena_ids.remove(id);
        }
    }

    /// Whether an event scoped to `arena_id` should be forwarded.
    ///
    /// Events without an arena (team roster and stats) only reach
    /// wildcard subscribers.
    #[must_use]
    pub fn matches(&self, arena_id: Option<ArenaId>) -> bool {
        self.subscribe_all || arena_id.is_some_and(|id| self.arena_ids.contains(&id))
    }

    /// Number of explicitly subscribed arenas.
    #[must_use]
    pub fn count(&self) -> usize {
        self.arena_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(Some(ArenaId::new())));
        assert!(!mgr.matches(None));
    }

    #[test]
    fn specific_arena_only() {
        let mut mgr = SubscriptionManager::new();
        let id = ArenaId::new();
        mgr.subscribe(&[id], false);
        assert!(mgr.matches(Some(id)));
        assert!(!mgr.matches(Some(ArenaId::new())));
        assert!(!mgr.matches(None));
    }

    #[test]
    fn wildcard_includes_arenaless_events() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true);
        assert!(mgr.matches(Some(ArenaId::new())));
        assert!(mgr.matches(None));
    }

    #[test]
    fn unsubscribe_removes_arena_and_wildcard() {
        let mut mgr = SubscriptionManager::new();
        let id = ArenaId::new();
        mgr.subscribe(&[id], true);
        mgr.unsubscribe(&[id], true);
        assert!(!mgr.matches(Some(id)));
        assert!(!mgr.is_subscribed_all());
        assert_eq!(mgr.count(), 0);
    }
}
