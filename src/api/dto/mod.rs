//! Data Transfer Objects for REST request/response serialization.
//!
//! Requests carry raw wire values (`"HH:MM"` strings, integer ratings) and
//! convert into service inputs with `From`/`TryFrom`, so malformed values
//! surface as structured 400 errors.

pub mod arena_dto;
pub mod booking_dto;
pub mod common_dto;
pub mod match_dto;
pub mod review_dto;
pub mod team_dto;

pub use arena_dto::*;
pub use booking_dto::*;
pub use common_dto::*;
pub use match_dto::*;
pub use review_dto::*;
pub use team_dto::*;
