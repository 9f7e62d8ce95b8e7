//! OpenAPI document aggregating every annotated handler.

use utoipa::OpenApi;

use super::dto;
use super::handlers::{arena, booking, matches, review, system, team};
use crate::domain;
use crate::error::{ErrorBody, ErrorResponse};

/// The service's OpenAPI description, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "PlayBookr API",
        description = "Arena booking, reviews, teams and matches. Identity is taken from the `x-user-id` and `x-user-role` headers."
    ),
    paths(
        system::health_handler,
        arena::create_arena,
        arena::list_arenas,
        arena::get_arena,
        arena::approve_arena,
        arena::check_availability,
        arena::arena_bookings,
        arena::arena_reviews,
        arena::recompute_rating,
        booking::create_booking,
        booking::my_bookings,
        booking::get_booking,
        booking::confirm_booking,
        booking::cancel_booking,
        booking::complete_booking,
        review::create_review,
        review::update_review,
        review::delete_review,
        team::create_team,
        team::list_teams,
        team::get_team,
        team::add_member,
        team::remove_member,
        team::deactivate_team,
        team::leaderboard,
        matches::create_match,
        matches::get_match,
        matches::accept_match,
        matches::reject_match,
        matches::start_match,
        matches::complete_match,
        matches::cancel_match,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        dto::PaginationMeta,
        domain::Arena,
        domain::Booking,
        domain::BookingStatus,
        domain::Review,
        domain::Rating,
        domain::RatingSummary,
        domain::Team,
        domain::TeamRecord,
        domain::Match,
        domain::MatchState,
        domain::MatchResult,
        domain::PlayerStat,
        domain::Sport,
        domain::Role,
    )),
    tags(
        (name = "Arenas", description = "Arena listings, availability and ratings"),
        (name = "Bookings", description = "Slot bookings and their lifecycle"),
        (name = "Reviews", description = "Arena reviews"),
        (name = "Teams", description = "Teams, rosters and the leaderboard"),
        (name = "Matches", description = "Challenges, results and standings"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_core_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/v1/arenas",
            "/api/v1/bookings",
            "/api/v1/matches/{id}/complete",
            "/api/v1/leaderboard",
            "/api/v1/teams/{id}/deactivate",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn rating_component_carries_bounds() {
        let Ok(doc) = serde_json::to_value(ApiDoc::openapi()) else {
            panic!("document serializes");
        };
        let Some(rating) = doc.pointer("/components/schemas/Rating") else {
            panic!("Rating component missing");
        };
        assert_eq!(rating.get("minimum"), Some(&serde_json::json!(1)));
        assert_eq!(rating.get("maximum"), Some(&serde_json::json!(5)));
    }
}
