//! # playbookr
//!
//! REST API and WebSocket event feed for booking sports arenas, reviewing
//! them, and playing team matches.
//!
//! The service keeps three pieces of derived state consistent with their
//! source collections: the booking calendar (no two active bookings of an
//! arena overlap on the same day), arena ratings (a rounded mean over all
//! reviews), and team records (wins, losses, draws, and sport totals
//! accumulated from completed matches).
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Feed (ws/)
//!     │
//!     ├── Services (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── Store: document collections (domain/)
//!     ├── Conflict / Rating / Standings logic (domain/)
//!     │
//!     └── PostgreSQL event log (optional)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
