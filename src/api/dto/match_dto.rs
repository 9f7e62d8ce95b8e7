//! Match DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{BookingId, Completion, PlayerStat, TeamId, UserId};
use crate::service::NewMatch;

/// Request body for `POST /matches`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMatchRequest {
    /// Confirmed booking of the challenging team.
    pub booking_id: BookingId,
    /// Challenged team.
    pub away_team_id: TeamId,
    /// Message to the challenged captain.
    #[serde(default)]
    pub challenge_message: Option<String>,
}

impl From<CreateMatchRequest> for NewMatch {
    fn from(req: CreateMatchRequest) -> Self {
        Self {
            booking_id: req.booking_id,
            away_team_id: req.away_team_id,
            challenge_message: req.challenge_message,
        }
    }
}

/// Request body for `POST /matches/{id}/complete`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteMatchRequest {
    /// Home score: goals in futsal, runs in cricket.
    pub home_team_score: u32,
    /// Away score: goals in futsal, runs in cricket.
    pub away_team_score: u32,
    /// Wickets taken by the home side (cricket).
    #[serde(default)]
    pub home_team_wickets: u32,
    /// Wickets taken by the away side (cricket).
    #[serde(default)]
    pub away_team_wickets: u32,
    /// Individual statistics.
    #[serde(default)]
    pub player_stats: Vec<PlayerStat>,
    /// Most valuable player.
    #[serde(default)]
    pub mvp_player_id: Option<UserId>,
}

impl From<CompleteMatchRequest> for Completion {
    fn from(req: CompleteMatchRequest) -> Self {
        Self {
            home_team_score: req.home_team_score,
            away_team_score: req.away_team_score,
            home_team_wickets: req.home_team_wickets,
            away_team_wickets: req.away_team_wickets,
            player_stats: req.player_stats,
            mvp_player_id: req.mvp_player_id,
        }
    }
}
