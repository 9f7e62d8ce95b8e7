//! playbookr server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use playbookr::api;
use playbookr::app_state::AppState;
use playbookr::config::AppConfig;
use playbookr::domain::{EventBus, Store};
use playbookr::persistence::PostgresPersistence;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        draw_policy = %config.draw_policy,
        persistence = config.persistence_enabled,
        "starting playbookr"
    );

    let store = Arc::new(Store::default());
    let event_bus = EventBus::new(config.event_bus_capacity);

    if config.persistence_enabled {
        let persistence = PostgresPersistence::connect(&config).await?;
        let _log_task = persistence.spawn_event_log(&event_bus);
        tracing::info!("event log enabled");
    }

    let app_state = AppState::new(store, event_bus, config.draw_policy);
    let app = api::app(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
