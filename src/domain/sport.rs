//! Supported sports.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sport played at an arena or by a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    /// Bat-and-ball; tallies runs and wickets.
    Cricket,
    /// Indoor football; tallies goals.
    Futsal,
}

impl Sport {
    /// Returns the sport as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cricket => "cricket",
            Self::Futsal => "futsal",
        }
    }
}
