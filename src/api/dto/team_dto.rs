//! Team and leaderboard DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::MAX_LIMIT;
use crate::domain::{Sport, Team, TeamId, UserId};
use crate::service::NewTeam;

/// Request body for `POST /teams`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTeamRequest {
    /// Display name.
    pub name: String,
    /// Sport played.
    pub sport: Sport,
    /// Home city.
    #[serde(default)]
    pub city: Option<String>,
    /// Initial roster besides the captain.
    #[serde(default)]
    pub members: Vec<UserId>,
}

impl From<CreateTeamRequest> for NewTeam {
    fn from(req: CreateTeamRequest) -> Self {
        Self {
            name: req.name,
            sport: req.sport,
            city: req.city,
            members: req.members,
        }
    }
}

/// Request body for `POST /teams/{id}/members`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddMemberRequest {
    /// Player to add.
    pub user_id: UserId,
}

/// Filter for `GET /teams`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SportQuery {
    /// Only teams of this sport.
    #[serde(default)]
    pub sport: Option<Sport>,
}

/// Query for `GET /leaderboard`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Only teams of this sport.
    #[serde(default)]
    pub sport: Option<Sport>,
    /// Number of teams (default 10, max 100).
    #[serde(default)]
    pub limit: Option<u32>,
}

impl LeaderboardQuery {
    /// Requested size clamped to `1..=100`.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(10).clamp(1, MAX_LIMIT) as usize
    }
}

/// One row of the leaderboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: u32,
    /// Team identifier.
    pub team_id: TeamId,
    /// Team name.
    pub name: String,
    /// Sport played.
    pub sport: Sport,
    /// Matches won.
    pub wins: u32,
    /// Matches lost.
    pub losses: u32,
    /// Matches drawn.
    pub draws: u32,
    /// Matches completed.
    pub total_matches: u32,
    /// Goals scored (futsal).
    pub total_goals: u32,
    /// Runs scored (cricket).
    pub total_runs: u32,
    /// Wickets taken (cricket).
    pub total_wickets: u32,
}

impl LeaderboardEntry {
    /// Builds the row for `team` at `rank`.
    #[must_use]
    pub fn new(rank: u32, team: &Team) -> Self {
        let record = team.record();
        Self {
            rank,
            team_id: team.id,
            name: team.name.clone(),
            sport: team.sport,
            wins: record.wins(),
            losses: record.losses(),
            draws: record.draws(),
            total_matches: record.total_matches(),
            total_goals: record.total_goals(),
            total_runs: record.total_runs(),
            total_wickets: record.total_wickets(),
        }
    }
}
