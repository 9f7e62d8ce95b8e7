//! Team service: rosters, captaincy and the leaderboard.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Actor, DomainEvent, EventBus, RosterChange, Sport, Store, Team, TeamId, UserId,
};
use crate::error::ApiError;

/// Fields of a new team.
#[derive(Debug, Clone)]
pub struct NewTeam {
    /// Display name.
    pub name: String,
    /// Sport played.
    pub sport: Sport,
    /// Home city.
    pub city: Option<String>,
    /// Initial roster besides the captain.
    pub members: Vec<UserId>,
}

/// Orchestration layer for teams.
#[derive(Debug, Clone)]
pub struct TeamService {
    store: Arc<Store>,
    event_bus: EventBus,
}

impl TeamService {
    /// Creates a new `TeamService`.
    #[must_use]
    pub fn new(store: Arc<Store>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Forms a team captained by the caller. A user captains at most one
    /// active team per sport.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for a blank name and
    /// [`ApiError::Conflict`] if the caller already captains a team in
    /// that sport.
    pub async fn create_team(&self, actor: Actor, new: NewTeam) -> Result<Team, ApiError> {
        if new.name.trim().is_empty() {
            return Err(ApiError::InvalidRequest("name is required".to_string()));
        }
        let mut team = Team::new(new.name, actor.user_id, new.sport, new.members);
        team.city = new.city;

        let (captain_id, sport) = (team.captain_id, team.sport);
        let team_id = self
            .store
            .teams
            .insert_unless(team.clone(), |mut existing| {
                existing.any(|t| t.is_active && t.captain_id == captain_id && t.sport == sport)
            })
            .await
            .ok_or_else(|| {
                ApiError::Conflict(format!(
                    "you already captain an active {} team",
                    sport.as_str()
                ))
            })?;

        let _ = self.event_bus.publish(DomainEvent::TeamCreated {
            team_id,
            captain_id,
            name: team.name.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(%team_id, %captain_id, sport = sport.as_str(), "team created");
        Ok(team)
    }

    /// Returns one team.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the team does not exist.
    pub async fn get_team(&self, team_id: TeamId) -> Result<Team, ApiError> {
        Ok(self.store.teams.get(team_id).await?)
    }

    /// Active teams, optionally of one sport, newest first.
    pub async fn list_teams(&self, sport: Option<Sport>) -> Vec<Team> {
        let mut teams = self
            .store
            .teams
            .filter(|t| t.is_active && sport.is_none_or(|s| t.sport == s))
            .await;
        teams.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        teams
    }

    /// Adds a player to the roster (captain or admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for anyone else and a validation
    /// error if the player is already a member.
    pub async fn add_member(&self, actor: Actor, team_id: TeamId, user_id: UserId) -> Result<Team, ApiError> {
        let (team, ()) = self
            .store
            .teams
            .update(team_id, |team| -> Result<(), ApiError> {
                if !actor.is_or_admin(team.captain_id) {
                    return Err(ApiError::Forbidden(
                        "only the captain can add members".to_string(),
                    ));
                }
                team.add_member(user_id)?;
                Ok(())
            })
            .await?;
        self.publish_roster(team_id, user_id, RosterChange::Added);
        Ok(team)
    }

    /// Removes a player from the roster. The captain and admins may remove
    /// anyone but the captain; players may remove themselves.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for anyone else and a validation
    /// error when removing the captain.
    pub async fn remove_member(&self, actor: Actor, team_id: TeamId, user_id: UserId) -> Result<Team, ApiError> {
        let (team, ()) = self
            .store
            .teams
            .update(team_id, |team| -> Result<(), ApiError> {
                if !actor.is_or_admin(team.captain_id) && actor.user_id != user_id {
                    return Err(ApiError::Forbidden(
                        "only the captain can remove other members".to_string(),
                    ));
                }
                if !team.has_member(user_id) {
                    return Err(ApiError::not_found("team member", user_id.into()));
                }
                team.remove_member(user_id)?;
                Ok(())
            })
            .await?;
        self.publish_roster(team_id, user_id, RosterChange::Removed);
        Ok(team)
    }

    /// Retires a team (captain or admin). The captain may then form a new
    /// team in the same sport.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown team,
    /// [`ApiError::Forbidden`] for anyone but the captain or an admin, and
    /// a transition error if the team is already inactive.
    pub async fn deactivate_team(&self, actor: Actor, team_id: TeamId) -> Result<Team, ApiError> {
        let (team, ()) = self
            .store
            .teams
            .update(team_id, |team| -> Result<(), ApiError> {
                if !actor.is_or_admin(team.captain_id) {
                    return Err(ApiError::Forbidden(
                        "only the captain can deactivate a team".to_string(),
                    ));
                }
                team.deactivate()?;
                Ok(())
            })
            .await?;

        let _ = self.event_bus.publish(DomainEvent::TeamDeactivated {
            team_id,
            timestamp: Utc::now(),
        });

        tracing::info!(%team_id, captain_id = %team.captain_id, "team deactivated");
        Ok(team)
    }

    /// Active teams ranked by wins, then by matches played.
    pub async fn leaderboard(&self, sport: Option<Sport>, limit: usize) -> Vec<Team> {
        let mut teams = self.list_teams(sport).await;
        teams.sort_by(|a, b| {
            b.record()
                .wins()
                .cmp(&a.record().wins())
                .then_with(|| b.record().total_matches().cmp(&a.record().total_matches()))
        });
        teams.truncate(limit);
        teams
    }

    fn publish_roster(&self, team_id: TeamId, user_id: UserId, change: RosterChange) {
        let _ = self.event_bus.publish(DomainEvent::TeamRosterChanged {
            team_id,
            user_id,
            change,
            timestamp: Utc::now(),
        });
        tracing::info!(%team_id, %user_id, ?change, "team roster changed");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::standings::{SideResult, Tally};
    use crate::domain::{Role, StoreError};

    fn make_service() -> (TeamService, Arc<Store>) {
        let store = Arc::new(Store::new());
        (TeamService::new(Arc::clone(&store), EventBus::new(100)), store)
    }

    fn player() -> Actor {
        Actor::new(UserId::new(), Role::Player)
    }

    fn new_team(name: &str, sport: Sport) -> NewTeam {
        NewTeam {
            name: name.to_string(),
            sport,
            city: None,
            members: vec![],
        }
    }

    #[tokio::test]
    async fn one_captaincy_per_sport() {
        let (service, _) = make_service();
        let captain = player();
        assert!(service.create_team(captain, new_team("A", Sport::Futsal)).await.is_ok());
        let again = service.create_team(captain, new_team("B", Sport::Futsal)).await;
        assert!(matches!(again, Err(ApiError::Conflict(_))));
        assert!(service.create_team(captain, new_team("C", Sport::Cricket)).await.is_ok());
    }

    #[tokio::test]
    async fn deactivated_team_frees_the_captaincy() {
        let (service, _) = make_service();
        let captain = player();
        let Ok(team) = service.create_team(captain, new_team("A", Sport::Futsal)).await else {
            panic!("create failed");
        };

        let stranger = service.deactivate_team(player(), team.id).await;
        assert!(matches!(stranger, Err(ApiError::Forbidden(_))));

        let Ok(retired) = service.deactivate_team(captain, team.id).await else {
            panic!("deactivate failed");
        };
        assert!(!retired.is_active);
        assert!(service.list_teams(Some(Sport::Futsal)).await.is_empty());
        assert!(service.leaderboard(None, 10).await.is_empty());

        let twice = service.deactivate_team(captain, team.id).await;
        assert!(matches!(twice, Err(ApiError::Domain(_))));

        let Ok(successor) = service.create_team(captain, new_team("B", Sport::Futsal)).await else {
            panic!("captain should be free to form a new team");
        };
        let listed = service.list_teams(Some(Sport::Futsal)).await;
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|t| t.id == successor.id));
    }

    #[tokio::test]
    async fn roster_management() {
        let (service, _) = make_service();
        let captain = player();
        let Ok(team) = service.create_team(captain, new_team("A", Sport::Futsal)).await else {
            panic!("create failed");
        };
        let newcomer = UserId::new();

        let denied = service.add_member(player(), team.id, newcomer).await;
        assert!(matches!(denied, Err(ApiError::Forbidden(_))));

        let Ok(team) = service.add_member(captain, team.id, newcomer).await else {
            panic!("add failed");
        };
        assert!(team.has_member(newcomer));

        let leaver = Actor::new(newcomer, Role::Player);
        let Ok(team) = service.remove_member(leaver, team.id, newcomer).await else {
            panic!("leave failed");
        };
        assert!(!team.has_member(newcomer));

        let captain_removal = service.remove_member(captain, team.id, captain.user_id).await;
        assert!(matches!(captain_removal, Err(ApiError::Domain(_))));
    }

    #[tokio::test]
    async fn leaderboard_orders_by_wins_then_matches() {
        let (service, store) = make_service();
        let mut ids = Vec::new();
        for name in ["A", "B", "C"] {
            let Ok(team) = service.create_team(player(), new_team(name, Sport::Futsal)).await else {
                panic!("create failed");
            };
            ids.push(team.id);
        }
        let results: [&[SideResult]; 3] = [
            &[SideResult::Win, SideResult::Loss],
            &[SideResult::Win, SideResult::Win],
            &[SideResult::Win],
        ];
        for (id, outcomes) in ids.iter().zip(results) {
            let Ok(_) = store
                .teams
                .update(*id, |team| -> Result<(), StoreError> {
                    for outcome in outcomes {
                        team.record_result(*outcome, Tally::default());
                    }
                    Ok(())
                })
                .await
            else {
                panic!("update failed");
            };
        }

        let board = service.leaderboard(Some(Sport::Futsal), 10).await;
        let names: Vec<&str> = board.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(service.leaderboard(None, 1).await.len(), 1);
        assert!(service.leaderboard(Some(Sport::Cricket), 10).await.is_empty());
    }
}
