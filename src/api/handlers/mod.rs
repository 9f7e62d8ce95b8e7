//! REST endpoint handlers organized by resource.

pub mod arena;
pub mod booking;
pub mod matches;
pub mod review;
pub mod system;
pub mod team;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(arena::routes())
        .merge(booking::routes())
        .merge(review::routes())
        .merge(team::routes())
        .merge(matches::routes())
}
