//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{ArenaId, DomainEvent};
use crate::service::ArenaService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and answers each one.
/// - Forwards events the client subscribed to from the
///   [`broadcast::Receiver`].
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<DomainEvent>,
    arena_service: Arc<ArenaService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();
    tracing::debug!("ws connection opened");

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(text.as_str(), &mut subs, &arena_service).await;
                        if let Some(json) = to_json(&reply)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(event) => {
                        if !subs.matches(event.arena_id()) {
                            continue;
                        }
                        let Ok(payload) = serde_json::to_value(&event) else {
                            tracing::warn!(event_type = event.event_type_str(), "failed to serialize event");
                            continue;
                        };
                        let msg = WsMessage::new(uuid::Uuid::new_v4().to_string(), WsMessageType::Event, payload);
                        if let Some(json) = to_json(&msg)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

fn to_json(msg: &WsMessage) -> Option<String> {
    serde_json::to_string(msg)
        .inspect_err(|e| tracing::warn!(error = %e, "failed to serialize ws message"))
        .ok()
}

/// Splits raw subscription targets into arena IDs and the wildcard flag.
fn parse_targets(raw: &[String]) -> Result<(Vec<ArenaId>, bool), String> {
    let mut ids = Vec::with_capacity(raw.len());
    let mut wildcard = false;
    for s in raw {
        if s == "*" {
            wildcard = true;
        } else {
            let uuid = s
                .parse::<uuid::Uuid>()
                .map_err(|_| format!("invalid arena id: {s}"))?;
            ids.push(ArenaId::from_uuid(uuid));
        }
    }
    Ok((ids, wildcard))
}

fn id_strings(ids: &[ArenaId]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

/// Handles a text frame from the client and builds the reply.
pub async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    arena_service: &ArenaService,
) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 400, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command message");
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return WsMessage::error(msg.id, 404, "unknown command");
    };

    match command {
        WsCommand::Subscribe { arena_ids } => match parse_targets(&arena_ids) {
            Ok((ids, wildcard)) => {
                subs.subscribe(&ids, wildcard);
                tracing::debug!(count = subs.count(), wildcard = subs.is_subscribed_all(), "ws subscribe");
                WsMessage::new(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::json!({
                        "subscribed": id_strings(&ids),
                        "count": subs.count(),
                        "wildcard": subs.is_subscribed_all(),
                    }),
                )
            }
            Err(e) => WsMessage::error(msg.id, 400, &e),
        },
        WsCommand::Unsubscribe { arena_ids } => match parse_targets(&arena_ids) {
            Ok((ids, wildcard)) => {
                subs.unsubscribe(&ids, wildcard);
                WsMessage::new(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::json!({
                        "unsubscribed": id_strings(&ids),
                        "remaining_count": subs.count(),
                        "wildcard": subs.is_subscribed_all(),
                    }),
                )
            }
            Err(e) => WsMessage::error(msg.id, 400, &e),
        },
        WsCommand::GetArena { arena_id } => {
            let Ok(uuid) = arena_id.parse::<uuid::Uuid>() else {
                return WsMessage::error(msg.id, 400, "invalid arena id");
            };
            match arena_service.get_arena(ArenaId::from_uuid(uuid)).await {
                Ok(arena) => match serde_json::to_value(&arena) {
                    Ok(payload) => WsMessage::new(msg.id, WsMessageType::Response, payload),
                    Err(_) => WsMessage::error(msg.id, 500, "failed to serialize arena"),
                },
                Err(_) => WsMessage::error(msg.id, 404, "arena not found"),
            }
        }
    }
}
