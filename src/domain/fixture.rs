//! Matches between two teams and their lifecycle state machine.
//!
//! ```text
//! Scheduled ──start──▶ InProgress ──complete──▶ Completed(result)
//!     │                    │
//!     └──────cancel────────┴───────▶ Cancelled
//! ```
//!
//! `Completed` and `Cancelled` are terminal. Team statistics are derived
//! from the [`MatchResult`] carried by `Completed`; because the transition
//! into it can succeed only once, a result can never be applied twice.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::standings::{DrawPolicy, Outcome, Side, SideResult, Tally};
use super::{ArenaId, BookingId, DomainError, MatchId, Sport, TeamId, TimeSlot, UserId};

/// Final result of a completed match.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MatchResult {
    /// Home team's final score (goals or runs).
    pub home_team_score: u32,
    /// Away team's final score (goals or runs).
    pub away_team_score: u32,
    /// Who won, if anyone.
    pub outcome: Outcome,
    /// Winning team, `None` for a draw.
    pub winner: Option<TeamId>,
    /// Home side sport totals.
    pub home_stats: Tally,
    /// Away side sport totals.
    pub away_stats: Tally,
}

/// Lifecycle state of a match.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchState {
    /// Challenge issued, not yet played.
    Scheduled,
    /// Being played.
    InProgress,
    /// Finished with a result.
    Completed(MatchResult),
    /// Called off before completion.
    Cancelled,
}

impl MatchState {
    /// Returns the state name as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed(_) => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Per-player numbers from one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlayerStat {
    /// Player.
    pub player_id: UserId,
    /// Team the player appeared for.
    pub team_id: TeamId,
    /// Goals (futsal).
    #[serde(default)]
    pub goals: u32,
    /// Runs (cricket).
    #[serde(default)]
    pub runs: u32,
    /// Wickets (cricket).
    #[serde(default)]
    pub wickets: u32,
    /// Most valuable player of the match.
    #[serde(default)]
    pub is_mvp: bool,
}

/// Scores and statistics reported when completing a match.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    /// Home team score: goals in futsal, runs in cricket.
    pub home_team_score: u32,
    /// Away team score: goals in futsal, runs in cricket.
    pub away_team_score: u32,
    /// Wickets taken by the home side (cricket only).
    pub home_team_wickets: u32,
    /// Wickets taken by the away side (cricket only).
    pub away_team_wickets: u32,
    /// Individual player statistics.
    pub player_stats: Vec<PlayerStat>,
    /// Player to flag as MVP.
    pub mvp_player_id: Option<UserId>,
}

/// A challenge match hosted on a confirmed booking.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Match {
    /// Match identifier.
    pub id: MatchId,
    /// Challenging team, owner of the booking.
    pub home_team_id: TeamId,
    /// Challenged team.
    pub away_team_id: TeamId,
    /// Venue.
    pub arena_id: ArenaId,
    /// Booking that reserves the venue.
    pub booking_id: BookingId,
    /// Sport played.
    pub sport: Sport,
    /// Day of play.
    pub date: NaiveDate,
    /// Time of play.
    #[serde(flatten)]
    pub slot: TimeSlot,
    #[serde(flatten)]
    state: MatchState,
    /// Message sent with the challenge.
    pub challenge_message: Option<String>,
    /// Set once the away captain accepts.
    pub challenge_accepted: bool,
    /// Individual statistics, filled on completion.
    pub player_stats: Vec<PlayerStat>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// Schedules a new match.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        home_team_id: TeamId,
        away_team_id: TeamId,
        arena_id: ArenaId,
        booking_id: BookingId,
        sport: Sport,
        date: NaiveDate,
        slot: TimeSlot,
        challenge_message: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: MatchId::new(),
            home_team_id,
            away_team_id,
            arena_id,
            booking_id,
            sport,
            date,
            slot,
            state: MatchState::Scheduled,
            challenge_message,
            challenge_accepted: false,
            player_stats: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &MatchState {
        &self.state
    }

    /// The final result, once completed.
    #[must_use]
    pub const fn result(&self) -> Option<&MatchResult> {
        match &self.state {
            MatchState::Completed(result) => Some(result),
            _ => None,
        }
    }

    /// Records the away captain's acceptance of the challenge.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] unless the match is scheduled.
    pub fn accept(&mut self) -> Result<(), DomainError> {
        self.require(matches!(self.state, MatchState::Scheduled), "accept")?;
        self.challenge_accepted = true;
        self.touch();
        Ok(())
    }

    /// Kicks off a scheduled match.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] unless the match is scheduled.
    pub fn start(&mut self) -> Result<(), DomainError> {
        self.require(matches!(self.state, MatchState::Scheduled), "start")?;
        self.state = MatchState::InProgress;
        self.touch();
        Ok(())
    }

    /// Calls off a match that has not been completed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] if the match is already
    /// completed or cancelled.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.require(
            matches!(self.state, MatchState::Scheduled | MatchState::InProgress),
            "cancel",
        )?;
        self.state = MatchState::Cancelled;
        self.touch();
        Ok(())
    }

    /// Finishes an in-progress match with its final scores.
    ///
    /// Futsal scores are goals. Cricket scores are runs, with wickets
    /// reported separately. The MVP flag is set on exactly the player
    /// named by `mvp_player_id`, and on nobody when none is named.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] unless the match is in
    /// progress, and [`DomainError::DrawNotAllowed`] for level scores under
    /// [`DrawPolicy::Reject`]. The match is left untouched on error.
    pub fn complete(
        &mut self,
        completion: Completion,
        policy: DrawPolicy,
    ) -> Result<MatchResult, DomainError> {
        self.require(matches!(self.state, MatchState::InProgress), "complete")?;
        let outcome = Outcome::decide(
            completion.home_team_score,
            completion.away_team_score,
            policy,
        )?;
        let winner = match outcome {
            Outcome::HomeWin => Some(self.home_team_id),
            Outcome::AwayWin => Some(self.away_team_id),
            Outcome::Draw => None,
        };
        let (home_stats, away_stats) = match self.sport {
            Sport::Futsal => (
                Tally {
                    goals: completion.home_team_score,
                    ..Tally::default()
                },
                Tally {
                    goals: completion.away_team_score,
                    ..Tally::default()
                },
            ),
            Sport::Cricket => (
                Tally {
                    runs: completion.home_team_score,
                    wickets: completion.home_team_wickets,
                    ..Tally::default()
                },
                Tally {
                    runs: completion.away_team_score,
                    wickets: completion.away_team_wickets,
                    ..Tally::default()
                },
            ),
        };

        let mut player_stats = completion.player_stats;
        for stat in &mut player_stats {
            stat.is_mvp = completion.mvp_player_id == Some(stat.player_id);
        }
        let result = MatchResult {
            home_team_score: completion.home_team_score,
            away_team_score: completion.away_team_score,
            outcome,
            winner,
            home_stats,
            away_stats,
        };
        self.player_stats = player_stats;
        self.state = MatchState::Completed(result.clone());
        self.touch();
        Ok(result)
    }

    /// Record updates owed to each team by the final result, or `None`
    /// while the match is not completed.
    #[must_use]
    pub fn team_updates(&self) -> Option<[(TeamId, SideResult, Tally); 2]> {
        let result = self.result()?;
        Some([
            (
                self.home_team_id,
                result.outcome.for_side(Side::Home),
                result.home_stats,
            ),
            (
                self.away_team_id,
                result.outcome.for_side(Side::Away),
                result.away_stats,
            ),
        ])
    }

    fn require(&self, allowed: bool, action: &'static str) -> Result<(), DomainError> {
        if allowed {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                entity: "match",
                from: self.state.as_str(),
                action,
            })
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn make_match(sport: Sport) -> Match {
        let Some(date) = NaiveDate::from_ymd_opt(2024, 6, 1) else {
            panic!("valid date");
        };
        let Ok(slot) = TimeSlot::parse("18:00", "19:00") else {
            panic!("valid slot");
        };
        Match::new(
            TeamId::new(),
            TeamId::new(),
            ArenaId::new(),
            BookingId::new(),
            sport,
            date,
            slot,
            None,
        )
    }

    fn scores(home: u32, away: u32) -> Completion {
        Completion {
            home_team_score: home,
            away_team_score: away,
            ..Completion::default()
        }
    }

    #[test]
    fn futsal_win_records_goals() {
        let mut m = make_match(Sport::Futsal);
        assert!(m.start().is_ok());
        let Ok(result) = m.complete(scores(3, 1), DrawPolicy::Reject) else {
            panic!("completion failed");
        };
        assert_eq!(result.outcome, Outcome::HomeWin);
        assert_eq!(result.home_stats.goals, 3);
        assert_eq!(result.away_stats.goals, 1);

        let Some([home, away]) = m.team_updates() else {
            panic!("expected updates");
        };
        assert_eq!(home.0, m.home_team_id);
        assert_eq!(home.1, SideResult::Win);
        assert_eq!(away.1, SideResult::Loss);
    }

    #[test]
    fn cannot_complete_without_starting() {
        let mut m = make_match(Sport::Futsal);
        let err = m.complete(scores(1, 0), DrawPolicy::Reject);
        assert!(matches!(err, Err(DomainError::InvalidTransition { from: "scheduled", .. })));
        assert!(m.team_updates().is_none());
    }

    #[test]
    fn completed_match_cannot_complete_again() {
        let mut m = make_match(Sport::Futsal);
        assert!(m.start().is_ok());
        assert!(m.complete(scores(2, 0), DrawPolicy::Reject).is_ok());
        let again = m.complete(scores(5, 0), DrawPolicy::Reject);
        assert!(matches!(again, Err(DomainError::InvalidTransition { from: "completed", .. })));
        assert_eq!(m.result().map(|r| r.home_team_score), Some(2));
    }

    #[test]
    fn rejected_draw_leaves_match_in_progress() {
        let mut m = make_match(Sport::Futsal);
        assert!(m.start().is_ok());
        assert_eq!(
            m.complete(scores(1, 1), DrawPolicy::Reject).err(),
            Some(DomainError::DrawNotAllowed)
        );
        assert_eq!(m.state(), &MatchState::InProgress);
    }

    #[test]
    fn allowed_draw_has_no_winner() {
        let mut m = make_match(Sport::Futsal);
        assert!(m.start().is_ok());
        let Ok(result) = m.complete(scores(2, 2), DrawPolicy::Allow) else {
            panic!("draw should be allowed");
        };
        assert_eq!(result.winner, None);
        let Some([home, away]) = m.team_updates() else {
            panic!("expected updates");
        };
        assert_eq!(home.1, SideResult::Draw);
        assert_eq!(away.1, SideResult::Draw);
    }

    #[test]
    fn cricket_tracks_runs_and_wickets() {
        let mut m = make_match(Sport::Cricket);
        assert!(m.start().is_ok());
        let completion = Completion {
            home_team_score: 120,
            away_team_score: 150,
            home_team_wickets: 4,
            away_team_wickets: 10,
            ..Completion::default()
        };
        let Ok(result) = m.complete(completion, DrawPolicy::Reject) else {
            panic!("completion failed");
        };
        assert_eq!(result.winner, Some(m.away_team_id));
        assert_eq!(result.home_stats.runs, 120);
        assert_eq!(result.away_stats.wickets, 10);
        assert_eq!(result.home_stats.goals, 0);
    }

    #[test]
    fn mvp_flag_is_exclusive() {
        let mut m = make_match(Sport::Futsal);
        assert!(m.start().is_ok());
        let star = UserId::new();
        let other = UserId::new();
        let stat = |player_id| PlayerStat {
            player_id,
            team_id: m.home_team_id,
            goals: 1,
            runs: 0,
            wickets: 0,
            is_mvp: true,
        };
        let completion = Completion {
            home_team_score: 2,
            away_team_score: 0,
            player_stats: vec![stat(star), stat(other)],
            mvp_player_id: Some(star),
            ..Completion::default()
        };
        assert!(m.complete(completion, DrawPolicy::Reject).is_ok());
        let mvps: Vec<_> = m.player_stats.iter().filter(|s| s.is_mvp).collect();
        assert_eq!(mvps.len(), 1);
        assert_eq!(mvps.first().map(|s| s.player_id), Some(star));
    }

    #[test]
    fn no_named_mvp_clears_submitted_flags() {
        let mut m = make_match(Sport::Cricket);
        assert!(m.start().is_ok());
        let team_id = m.home_team_id;
        let claimed = |player_id| PlayerStat {
            player_id,
            team_id,
            goals: 0,
            runs: 40,
            wickets: 1,
            is_mvp: true,
        };
        let completion = Completion {
            home_team_score: 160,
            away_team_score: 120,
            player_stats: vec![claimed(UserId::new()), claimed(UserId::new())],
            mvp_player_id: None,
            ..Completion::default()
        };
        assert!(m.complete(completion, DrawPolicy::Reject).is_ok());
        assert_eq!(m.player_stats.len(), 2);
        assert!(m.player_stats.iter().all(|s| !s.is_mvp));
    }

    #[test]
    fn cancel_only_before_completion() {
        let mut scheduled = make_match(Sport::Futsal);
        assert!(scheduled.cancel().is_ok());
        assert!(scheduled.start().is_err());

        let mut done = make_match(Sport::Futsal);
        assert!(done.start().is_ok());
        assert!(done.complete(scores(1, 0), DrawPolicy::Reject).is_ok());
        assert!(done.cancel().is_err());
    }

    #[test]
    fn serializes_status_tag() {
        let m = make_match(Sport::Futsal);
        let Ok(json) = serde_json::to_value(&m) else {
            panic!("serialization failed");
        };
        assert_eq!(json["status"], "scheduled");
        assert_eq!(json["start_time"], "18:00");
    }
}
