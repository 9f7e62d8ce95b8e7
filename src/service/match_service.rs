//! Match service: challenges, the match state machine, and team
//! statistics.
//!
//! Team records are only touched by [`MatchService::complete_match`],
//! after the match has moved from in-progress to completed under the
//! store lock. A second completion fails that transition, so results are
//! applied exactly once per match.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Actor, BookingId, BookingStatus, Completion, DomainEvent, DrawPolicy, EventBus, Match,
    MatchId, Store, Team, TeamId,
};
use crate::error::ApiError;

/// Fields of a match challenge.
#[derive(Debug, Clone)]
pub struct NewMatch {
    /// Confirmed booking of the challenging team.
    pub booking_id: BookingId,
    /// Challenged team.
    pub away_team_id: TeamId,
    /// Message to the challenged captain.
    pub challenge_message: Option<String>,
}

/// Orchestration layer for matches.
#[derive(Debug, Clone)]
pub struct MatchService {
    store: Arc<Store>,
    event_bus: EventBus,
    draw_policy: DrawPolicy,
}

impl MatchService {
    /// Creates a new `MatchService` that settles level scores per
    /// `draw_policy`.
    #[must_use]
    pub fn new(store: Arc<Store>, event_bus: EventBus, draw_policy: DrawPolicy) -> Self {
        Self {
            store,
            event_bus,
            draw_policy,
        }
    }

    /// Returns the configured draw policy.
    #[must_use]
    pub const fn draw_policy(&self) -> DrawPolicy {
        self.draw_policy
    }

    /// Challenges another team to a match on a confirmed booking.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the booking or a team does not exist.
    /// - [`ApiError::InvalidRequest`] if the booking is not confirmed or
    ///   has no team, the teams are the same, either team is inactive, or
    ///   they play different sports.
    /// - [`ApiError::Forbidden`] unless the caller captains the home team
    ///   or is an admin.
    /// - [`ApiError::Conflict`] if the booking already hosts a match.
    pub async fn create_match(&self, actor: Actor, new: NewMatch) -> Result<Match, ApiError> {
        let booking = self.store.bookings.get(new.booking_id).await?;
        if booking.status != BookingStatus::Confirmed {
            return Err(ApiError::InvalidRequest(
                "matches can only be scheduled on confirmed bookings".to_string(),
            ));
        }
        let Some(home_team_id) = booking.team_id else {
            return Err(ApiError::InvalidRequest(
                "booking is not associated with a team".to_string(),
            ));
        };
        if home_team_id == new.away_team_id {
            return Err(ApiError::InvalidRequest(
                "a team cannot challenge itself".to_string(),
            ));
        }
        let home = self.store.teams.get(home_team_id).await?;
        let away = self.store.teams.get(new.away_team_id).await?;
        if !actor.is_or_admin(home.captain_id) {
            return Err(ApiError::Forbidden(
                "only the home captain can issue a challenge".to_string(),
            ));
        }
        if !home.is_active || !away.is_active {
            return Err(ApiError::InvalidRequest(
                "inactive teams cannot play matches".to_string(),
            ));
        }
        if home.sport != away.sport {
            return Err(ApiError::InvalidRequest(format!(
                "cannot match a {} team against a {} team",
                home.sport.as_str(),
                away.sport.as_str()
            )));
        }

        let fixture = Match::new(
            home.id,
            away.id,
            booking.arena_id,
            booking.id,
            home.sport,
            booking.date,
            booking.slot,
            new.challenge_message,
        );
        let booking_id = booking.id;
        let match_id = self
            .store
            .matches
            .insert_unless(fixture.clone(), |mut existing| {
                existing.any(|m| m.booking_id == booking_id)
            })
            .await
            .ok_or_else(|| ApiError::Conflict("booking already hosts a match".to_string()))?;

        let _ = self.event_bus.publish(DomainEvent::MatchScheduled {
            arena_id: fixture.arena_id,
            match_id,
            home_team_id: fixture.home_team_id,
            away_team_id: fixture.away_team_id,
            timestamp: Utc::now(),
        });

        tracing::info!(%match_id, home = %fixture.home_team_id, away = %fixture.away_team_id, "match scheduled");
        Ok(fixture)
    }

    /// Returns one match.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the match does not exist.
    pub async fn get_match(&self, match_id: MatchId) -> Result<Match, ApiError> {
        Ok(self.store.matches.get(match_id).await?)
    }

    /// Away captain accepts the challenge.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] unless the caller captains the away
    /// team, and a 409 domain error unless the match is scheduled.
    pub async fn accept_challenge(&self, actor: Actor, match_id: MatchId) -> Result<Match, ApiError> {
        let fixture = self.store.matches.get(match_id).await?;
        self.require_captain(actor, fixture.away_team_id, false).await?;
        self.transition(match_id, "accept", Match::accept).await
    }

    /// Away captain turns the challenge down, which cancels the match.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] unless the caller captains the away
    /// team, and a 409 domain error unless the match is scheduled.
    pub async fn reject_challenge(&self, actor: Actor, match_id: MatchId) -> Result<Match, ApiError> {
        let fixture = self.store.matches.get(match_id).await?;
        self.require_captain(actor, fixture.away_team_id, false).await?;
        self.transition(match_id, "reject", |m| {
            if m.challenge_accepted {
                return Err(ApiError::Conflict(
                    "challenge was already accepted; cancel the match instead".to_string(),
                ));
            }
            m.cancel()?;
            Ok(())
        })
        .await
    }

    /// Kicks off an accepted match. Either captain or an admin may start it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for anyone else,
    /// [`ApiError::Conflict`] if the challenge was not accepted, and a 409
    /// domain error unless the match is scheduled.
    pub async fn start_match(&self, actor: Actor, match_id: MatchId) -> Result<Match, ApiError> {
        let fixture = self.store.matches.get(match_id).await?;
        self.require_either_captain(actor, &fixture).await?;
        self.transition(match_id, "start", |m| {
            if !m.challenge_accepted {
                return Err(ApiError::Conflict(
                    "challenge has not been accepted yet".to_string(),
                ));
            }
            m.start()?;
            Ok(())
        })
        .await
    }

    /// Calls off a match before completion (home captain or admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for anyone else and a 409 domain
    /// error if the match is already completed or cancelled.
    pub async fn cancel_match(&self, actor: Actor, match_id: MatchId) -> Result<Match, ApiError> {
        let fixture = self.store.matches.get(match_id).await?;
        self.require_captain(actor, fixture.home_team_id, true).await?;
        self.transition(match_id, "cancel", Match::cancel).await
    }

    /// Records the final score of an in-progress match and updates both
    /// teams' records.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Forbidden`] unless the caller captains either team or
    ///   is an admin.
    /// - [`ApiError::InvalidRequest`] if player stats name a third team.
    /// - A 409 domain error unless the match is in progress.
    /// - A 400 domain error for level scores when draws are rejected.
    pub async fn complete_match(
        &self,
        actor: Actor,
        match_id: MatchId,
        completion: Completion,
    ) -> Result<Match, ApiError> {
        let fixture = self.store.matches.get(match_id).await?;
        self.require_either_captain(actor, &fixture).await?;

        let policy = self.draw_policy;
        let (fixture, result) = self
            .store
            .matches
            .update(match_id, |m| -> Result<_, ApiError> {
                if let Some(stray) = completion
                    .player_stats
                    .iter()
                    .find(|s| s.team_id != m.home_team_id && s.team_id != m.away_team_id)
                {
                    return Err(ApiError::InvalidRequest(format!(
                        "player {} is listed for team {} which is not playing",
                        stray.player_id, stray.team_id
                    )));
                }
                Ok(m.complete(completion, policy)?)
            })
            .await?;

        let _ = self.event_bus.publish(DomainEvent::MatchCompleted {
            arena_id: fixture.arena_id,
            match_id,
            result: result.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!(
            %match_id,
            home_score = result.home_team_score,
            away_score = result.away_team_score,
            outcome = ?result.outcome,
            "match completed"
        );

        self.apply_match_result(&fixture).await?;
        Ok(fixture)
    }

    /// Adds a completed match to both teams' records.
    ///
    /// Only reachable from [`MatchService::complete_match`] right after the
    /// in-progress to completed transition succeeded.
    async fn apply_match_result(&self, fixture: &Match) -> Result<(), ApiError> {
        let Some(updates) = fixture.team_updates() else {
            return Err(ApiError::Internal(format!(
                "match {} has no result to apply",
                fixture.id
            )));
        };
        for (team_id, side_result, tally) in updates {
            let (team, ()) = self
                .store
                .teams
                .update(team_id, |team| -> Result<(), ApiError> {
                    team.record_result(side_result, tally);
                    Ok(())
                })
                .await?;
            let record = team.record();
            let _ = self.event_bus.publish(DomainEvent::TeamStatsUpdated {
                team_id,
                match_id: fixture.id,
                wins: record.wins(),
                losses: record.losses(),
                draws: record.draws(),
                total_matches: record.total_matches(),
                timestamp: Utc::now(),
            });
            tracing::info!(%team_id, match_id = %fixture.id, ?side_result, "team stats updated");
        }
        Ok(())
    }

    async fn require_captain(&self, actor: Actor, team_id: TeamId, admin_allowed: bool) -> Result<Team, ApiError> {
        let team = self.store.teams.get(team_id).await?;
        if team.captain_id == actor.user_id || (admin_allowed && actor.is_admin()) {
            Ok(team)
        } else {
            Err(ApiError::Forbidden(format!(
                "only the captain of {} can do this",
                team.name
            )))
        }
    }

    async fn require_either_captain(&self, actor: Actor, fixture: &Match) -> Result<(), ApiError> {
        if actor.is_admin() {
            return Ok(());
        }
        let home = self.store.teams.get(fixture.home_team_id).await?;
        let away = self.store.teams.get(fixture.away_team_id).await?;
        if actor.user_id == home.captain_id || actor.user_id == away.captain_id {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "only a captain of the playing teams can do this".to_string(),
            ))
        }
    }

    async fn transition<F, E>(&self, match_id: MatchId, action: &'static str, apply: F) -> Result<Match, ApiError>
    where
        F: FnOnce(&mut Match) -> Result<(), E>,
        ApiError: From<E>,
    {
        let (fixture, ()) = self
            .store
            .matches
            .update(match_id, |m| -> Result<(), ApiError> { Ok(apply(m)?) })
            .await?;

        let status = fixture.state().as_str();
        let _ = self.event_bus.publish(DomainEvent::MatchStatusChanged {
            arena_id: fixture.arena_id,
            match_id,
            action,
            status,
            timestamp: Utc::now(),
        });

        tracing::info!(%match_id, action, status, "match updated");
        Ok(fixture)
    }
}
