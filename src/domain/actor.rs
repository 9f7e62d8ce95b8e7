//! The authenticated caller of an operation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DomainError, UserId};

/// Platform role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Books arenas, joins teams, plays matches.
    #[default]
    Player,
    /// Lists and manages arenas.
    ArenaOwner,
    /// Moderates the platform.
    Admin,
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "player" | "user" => Ok(Self::Player),
            "arena_owner" | "owner" => Ok(Self::ArenaOwner),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::Validation(format!("unknown role {other:?}"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Player => "player",
            Self::ArenaOwner => "arena_owner",
            Self::Admin => "admin",
        })
    }
}

/// Identity and role of whoever issued a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Calling user.
    pub user_id: UserId,
    /// Calling user's role.
    pub role: Role,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns `true` for platform admins.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns `true` if the actor is `user_id` or an admin.
    #[must_use]
    pub fn is_or_admin(&self, user_id: UserId) -> bool {
        self.user_id == user_id || self.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("arena_owner".parse::<Role>(), Ok(Role::ArenaOwner));
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn admin_acts_for_anyone() {
        let admin = Actor::new(UserId::new(), Role::Admin);
        let player = Actor::new(UserId::new(), Role::Player);
        assert!(admin.is_or_admin(UserId::new()));
        assert!(player.is_or_admin(player.user_id));
        assert!(!player.is_or_admin(UserId::new()));
    }
}
