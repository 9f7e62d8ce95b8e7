//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The endpoint at `/ws` streams domain events for the arenas a client
//! subscribes to and answers a few read-only commands.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
