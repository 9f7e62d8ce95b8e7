//! Persistence layer: append-only PostgreSQL event log.
//!
//! The in-memory [`crate::domain::Store`] is authoritative; when enabled,
//! every [`crate::domain::DomainEvent`] is also appended to the `events`
//! table by a background task fed from the event bus.

pub mod models;
pub mod postgres;

pub use postgres::PostgresPersistence;
