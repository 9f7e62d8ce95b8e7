//! Match outcomes and cumulative team records.
//!
//! [`TeamRecord`] counters are derived from completed matches and can only
//! move through [`TeamRecord::record`]. Each call adds exactly one match.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DomainError, Sport};

/// How a completed match with level scores is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// Level scores cannot complete a match.
    #[default]
    Reject,
    /// Level scores complete the match as a draw with no winner.
    Allow,
}

impl FromStr for DrawPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" | "disallow" => Ok(Self::Reject),
            "allow" | "permit" => Ok(Self::Allow),
            other => Err(DomainError::Validation(format!(
                "unknown draw policy {other:?}: expected \"reject\" or \"allow\""
            ))),
        }
    }
}

impl fmt::Display for DrawPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Allow => f.write_str("allow"),
        }
    }
}

/// Result of a match from the fixture's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Home team scored more.
    HomeWin,
    /// Away team scored more.
    AwayWin,
    /// Level scores under [`DrawPolicy::Allow`].
    Draw,
}

impl Outcome {
    /// Decides the outcome from final scores.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DrawNotAllowed`] for level scores under
    /// [`DrawPolicy::Reject`].
    pub fn decide(home_score: u32, away_score: u32, policy: DrawPolicy) -> Result<Self, DomainError> {
        match home_score.cmp(&away_score) {
            std::cmp::Ordering::Greater => Ok(Self::HomeWin),
            std::cmp::Ordering::Less => Ok(Self::AwayWin),
            std::cmp::Ordering::Equal => match policy {
                DrawPolicy::Allow => Ok(Self::Draw),
                DrawPolicy::Reject => Err(DomainError::DrawNotAllowed),
            },
        }
    }

    /// The result seen by one side of the fixture.
    #[must_use]
    pub const fn for_side(self, side: Side) -> SideResult {
        match (self, side) {
            (Self::Draw, _) => SideResult::Draw,
            (Self::HomeWin, Side::Home) | (Self::AwayWin, Side::Away) => SideResult::Win,
            (Self::HomeWin, Side::Away) | (Self::AwayWin, Side::Home) => SideResult::Loss,
        }
    }
}

/// One side of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The challenging team, owner of the booking.
    Home,
    /// The challenged team.
    Away,
}

/// Result for a single team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideResult {
    /// The team won.
    Win,
    /// The team lost.
    Loss,
    /// Nobody won.
    Draw,
}

/// Sport-specific numbers one team produced in one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Tally {
    /// Goals scored (futsal).
    pub goals: u32,
    /// Runs scored (cricket).
    pub runs: u32,
    /// Wickets taken (cricket).
    pub wickets: u32,
}

/// Cumulative results of a team.
///
/// Invariant: `total_matches == wins + losses + draws`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct TeamRecord {
    wins: u32,
    losses: u32,
    draws: u32,
    total_matches: u32,
    total_goals: u32,
    total_runs: u32,
    total_wickets: u32,
}

impl TeamRecord {
    /// Adds one completed match to the record.
    ///
    /// Only the totals that belong to `sport` are incremented: goals for
    /// futsal, runs and wickets for cricket.
    pub(crate) fn record(&mut self, result: SideResult, sport: Sport, tally: Tally) {
        match result {
            SideResult::Win => self.wins = self.wins.saturating_add(1),
            SideResult::Loss => self.losses = self.losses.saturating_add(1),
            SideResult::Draw => self.draws = self.draws.saturating_add(1),
        }
        self.total_matches = self.total_matches.saturating_add(1);
        match sport {
            Sport::Futsal => self.total_goals = self.total_goals.saturating_add(tally.goals),
            Sport::Cricket => {
                self.total_runs = self.total_runs.saturating_add(tally.runs);
                self.total_wickets = self.total_wickets.saturating_add(tally.wickets);
            }
        }
    }

    /// Matches won.
    #[must_use]
    pub const fn wins(&self) -> u32 {
        self.wins
    }

    /// Matches lost.
    #[must_use]
    pub const fn losses(&self) -> u32 {
        self.losses
    }

    /// Matches drawn.
    #[must_use]
    pub const fn draws(&self) -> u32 {
        self.draws
    }

    /// Matches completed.
    #[must_use]
    pub const fn total_matches(&self) -> u32 {
        self.total_matches
    }

    /// Goals scored across all futsal matches.
    #[must_use]
    pub const fn total_goals(&self) -> u32 {
        self.total_goals
    }

    /// Runs scored across all cricket matches.
    #[must_use]
    pub const fn total_runs(&self) -> u32 {
        self.total_runs
    }

    /// Wickets taken across all cricket matches.
    #[must_use]
    pub const fn total_wickets(&self) -> u32 {
        self.total_wickets
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn higher_score_wins() {
        assert_eq!(Outcome::decide(3, 1, DrawPolicy::Reject), Ok(Outcome::HomeWin));
        assert_eq!(Outcome::decide(0, 2, DrawPolicy::Reject), Ok(Outcome::AwayWin));
    }

    #[test]
    fn level_scores_follow_policy() {
        assert_eq!(Outcome::decide(2, 2, DrawPolicy::Reject), Err(DomainError::DrawNotAllowed));
        assert_eq!(Outcome::decide(2, 2, DrawPolicy::Allow), Ok(Outcome::Draw));
    }

    #[test]
    fn side_results() {
        assert_eq!(Outcome::HomeWin.for_side(Side::Home), SideResult::Win);
        assert_eq!(Outcome::HomeWin.for_side(Side::Away), SideResult::Loss);
        assert_eq!(Outcome::AwayWin.for_side(Side::Away), SideResult::Win);
        assert_eq!(Outcome::Draw.for_side(Side::Home), SideResult::Draw);
    }

    #[test]
    fn futsal_records_goals_only() {
        let mut record = TeamRecord::default();
        record.record(
            SideResult::Win,
            Sport::Futsal,
            Tally {
                goals: 3,
                runs: 50,
                wickets: 4,
            },
        );
        assert_eq!(record.wins(), 1);
        assert_eq!(record.total_matches(), 1);
        assert_eq!(record.total_goals(), 3);
        assert_eq!(record.total_runs(), 0);
        assert_eq!(record.total_wickets(), 0);
    }

    #[test]
    fn cricket_records_runs_and_wickets() {
        let mut record = TeamRecord::default();
        record.record(
            SideResult::Loss,
            Sport::Cricket,
            Tally {
                goals: 9,
                runs: 142,
                wickets: 6,
            },
        );
        assert_eq!(record.losses(), 1);
        assert_eq!(record.total_runs(), 142);
        assert_eq!(record.total_wickets(), 6);
        assert_eq!(record.total_goals(), 0);
    }

    #[test]
    fn total_matches_is_sum_of_results() {
        let mut record = TeamRecord::default();
        for result in [SideResult::Win, SideResult::Loss, SideResult::Draw, SideResult::Win] {
            record.record(result, Sport::Futsal, Tally::default());
        }
        assert_eq!(
            record.total_matches(),
            record.wins() + record.losses() + record.draws()
        );
        assert_eq!(record.wins(), 2);
    }

    #[test]
    fn draw_policy_parses() {
        assert_eq!("allow".parse::<DrawPolicy>(), Ok(DrawPolicy::Allow));
        assert_eq!("REJECT".parse::<DrawPolicy>(), Ok(DrawPolicy::Reject));
        assert!("coin_toss".parse::<DrawPolicy>().is_err());
    }
}
