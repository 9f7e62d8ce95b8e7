//! WebSocket feed test against a server bound to an ephemeral port.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use playbookr::api;
use playbookr::app_state::AppState;
use playbookr::domain::{DrawPolicy, EventBus, Store};

async fn spawn_server() -> std::net::SocketAddr {
    let state = AppState::new(
        Arc::new(Store::default()),
        EventBus::new(256),
        DrawPolicy::Reject,
    );
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, api::app(state)).await;
    });
    addr
}

async fn next_json<S>(ws: &mut S) -> Value
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let Ok(Some(Ok(frame))) = tokio::time::timeout(Duration::from_secs(5), ws.next()).await
        else {
            panic!("no frame received");
        };
        if let Message::Text(text) = frame {
            let Ok(value) = serde_json::from_str::<Value>(text.as_str()) else {
                panic!("frame is not JSON");
            };
            return value;
        }
    }
}

#[tokio::test]
async fn subscribers_receive_events_for_their_arenas() {
    let addr = spawn_server().await;
    let Ok((mut ws, _)) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws connect failed");
    };

    let subscribe = json!({
        "id": "sub-1",
        "type": "command",
        "timestamp": "2026-01-01T00:00:00Z",
        "payload": { "command": "subscribe", "arena_ids": ["*"] },
    });
    let Ok(()) = ws.send(Message::text(subscribe.to_string())).await else {
        panic!("send failed");
    };
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["type"], "response");
    assert_eq!(reply["id"], "sub-1");
    assert_eq!(reply["payload"]["wildcard"], true);

    let client = reqwest::Client::new();
    let Ok(response) = client
        .post(format!("http://{addr}/api/v1/arenas"))
        .header("x-user-id", Uuid::new_v4().to_string())
        .header("x-user-role", "admin")
        .json(&json!({ "name": "Night Court", "price_per_hour": 50.0 }))
        .send()
        .await
    else {
        panic!("http request failed");
    };
    assert_eq!(response.status().as_u16(), 201);

    let event = next_json(&mut ws).await;
    assert_eq!(event["type"], "event");
    assert_eq!(event["payload"]["event_type"], "arena_created");
    assert_eq!(event["payload"]["name"], "Night Court");
}

#[tokio::test]
async fn unknown_commands_get_an_error_frame() {
    let addr = spawn_server().await;
    let Ok((mut ws, _)) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws connect failed");
    };
    let Ok(()) = ws.send(Message::text("{not json")).await else {
        panic!("send failed");
    };
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["payload"]["code"], 400);
}
