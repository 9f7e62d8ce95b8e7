//! Team documents.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::standings::{SideResult, Tally, TeamRecord};
use super::{DomainError, Sport, TeamId, UserId};

/// A squad of players led by a captain.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Team {
    /// Team identifier.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Member with authority over the roster.
    pub captain_id: UserId,
    /// Roster, always including the captain.
    pub members: Vec<UserId>,
    /// Sport the team plays.
    pub sport: Sport,
    /// Home city.
    pub city: Option<String>,
    /// Inactive teams are hidden from listings and cannot be challenged.
    pub is_active: bool,
    #[serde(flatten)]
    record: TeamRecord,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates an active team with an empty record. The captain is always
    /// on the roster.
    #[must_use]
    pub fn new(name: String, captain_id: UserId, sport: Sport, members: Vec<UserId>) -> Self {
        let mut roster = vec![captain_id];
        for member in members {
            if !roster.contains(&member) {
                roster.push(member);
            }
        }
        let now = Utc::now();
        Self {
            id: TeamId::new(),
            name,
            captain_id,
            members: roster,
            sport,
            city: None,
            is_active: true,
            record: TeamRecord::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Cumulative results.
    #[must_use]
    pub const fn record(&self) -> &TeamRecord {
        &self.record
    }

    /// Returns `true` if `user_id` is the captain or on the roster.
    #[must_use]
    pub fn has_member(&self, user_id: UserId) -> bool {
        self.captain_id == user_id || self.members.contains(&user_id)
    }

    /// Adds a player to the roster.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] if the player is already a member.
    pub fn add_member(&mut self, user_id: UserId) -> Result<(), DomainError> {
        if self.has_member(user_id) {
            return Err(DomainError::Validation(format!(
                "user {user_id} is already a member of this team"
            )));
        }
        self.members.push(user_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Removes a player from the roster.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when removing the captain.
    pub fn remove_member(&mut self, user_id: UserId) -> Result<(), DomainError> {
        if self.captain_id == user_id {
            return Err(DomainError::Validation(
                "cannot remove the team captain".to_string(),
            ));
        }
        self.members.retain(|m| *m != user_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Retires the team. Its record is kept, but it no longer counts
    /// towards the captain's one-team-per-sport limit.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] if the team is already
    /// inactive.
    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        if !self.is_active {
            return Err(DomainError::InvalidTransition {
                entity: "team",
                from: "inactive",
                action: "deactivate",
            });
        }
        self.is_active = false;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Adds one completed match to the team record.
    pub(crate) fn record_result(&mut self, result: SideResult, tally: Tally) {
        self.record.record(result, self.sport, tally);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captain_is_always_a_member() {
        let captain = UserId::new();
        let team = Team::new("Strikers".to_string(), captain, Sport::Futsal, vec![]);
        assert_eq!(team.members, vec![captain]);
        assert!(team.has_member(captain));
    }

    #[test]
    fn captain_cannot_be_removed() {
        let captain = UserId::new();
        let mut team = Team::new("Strikers".to_string(), captain, Sport::Futsal, vec![]);
        assert!(team.remove_member(captain).is_err());
    }

    #[test]
    fn deactivate_only_once() {
        let mut team = Team::new("Strikers".to_string(), UserId::new(), Sport::Futsal, vec![]);
        assert!(team.is_active);
        assert!(team.deactivate().is_ok());
        assert!(!team.is_active);
        assert!(matches!(
            team.deactivate(),
            Err(DomainError::InvalidTransition { from: "inactive", .. })
        ));
    }

    #[test]
    fn duplicate_member_rejected() {
        let captain = UserId::new();
        let player = UserId::new();
        let mut team = Team::new("Strikers".to_string(), captain, Sport::Cricket, vec![]);
        assert!(team.add_member(player).is_ok());
        assert!(team.add_member(player).is_err());
        assert!(team.remove_member(player).is_ok());
        assert!(!team.has_member(player));
    }

    #[test]
    fn record_uses_team_sport() {
        let mut team = Team::new("XI".to_string(), UserId::new(), Sport::Cricket, vec![]);
        team.record_result(
            SideResult::Win,
            Tally {
                goals: 2,
                runs: 180,
                wickets: 7,
            },
        );
        assert_eq!(team.record().wins(), 1);
        assert_eq!(team.record().total_runs(), 180);
        assert_eq!(team.record().total_goals(), 0);
    }
}
