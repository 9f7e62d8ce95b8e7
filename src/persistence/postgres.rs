//! PostgreSQL implementation of the event log.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::models::EventRecord;
use crate::config::AppConfig;
use crate::domain::{DomainEvent, EventBus};
use crate::error::ApiError;

/// PostgreSQL-backed event log using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with the configured pool limits and applies the embedded
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`ApiError::PersistenceError`] if the database is
    /// unreachable or a migration fails.
    pub async fn connect(config: &AppConfig) -> Result<Self, ApiError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| ApiError::PersistenceError(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| ApiError::PersistenceError(e.to_string()))?;

        Ok(Self::new(pool))
    }

    /// Appends an event to the event log.
    ///
    /// # Errors
    ///
    /// Returns a [`ApiError::PersistenceError`] on serialization or
    /// database failure.
    pub async fn save_event(&self, event: &DomainEvent) -> Result<i64, ApiError> {
        let row =
            EventRecord::from_event(event).map_err(|e| ApiError::PersistenceError(e.to_string()))?;

        sqlx::query_scalar::<_, i64>(
            "INSERT INTO events (arena_id, event_type, payload) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(row.arena_id)
        .bind(row.event_type)
        .bind(&row.payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::PersistenceError(e.to_string()))
    }

    /// Spawns the background task that appends every published event.
    ///
    /// Write failures and lag are logged; the task ends when the bus closes.
    #[must_use]
    pub fn spawn_event_log(self, event_bus: &EventBus) -> JoinHandle<()> {
        let mut rx = event_bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if let Err(e) = self.save_event(&event).await {
                            tracing::warn!(
                                event_type = event.event_type_str(),
                                error = %e,
                                "failed to append event to log"
                            );
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "event log lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            tracing::debug!("event log task stopped");
        })
    }
}
