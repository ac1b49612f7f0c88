use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::chat::{ChatMessage, Destination};
use crate::models::player::PlayerId;
use crate::services::game_service;
use crate::state::AppState;
use crate::utils::auth::{self, AuthError, Claims};

/// `?token=` (issued at join) adds that player's private messages to the
/// channel feed and lets the socket send commands as that player.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub token: Option<String>,
}

/// Inbound frame: a chat command sent over the socket.
#[derive(Debug, Serialize, Deserialize)]
struct CommandFrame {
    text: String,
}

/// The player a socket speaks for.
#[derive(Debug, Clone)]
struct Seat {
    player_id: PlayerId,
    name: String,
}

impl Seat {
    fn from_claims(claims: Claims) -> Result<Self, AuthError> {
        Ok(Seat {
            player_id: claims.player_id()?,
            name: claims.name,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ReplyFrame {
    message_type: String,
    room_id: String,
    content: String,
}

/// Whether a subscriber should see `message`.
pub fn visible_to(message: &ChatMessage, player_id: Option<PlayerId>) -> bool {
    match (&message.destination, player_id) {
        (Destination::Channel(_), _) => true,
        (Destination::Player(_), None) => false,
        (Destination::Player(target), Some(player_id)) => *target == player_id,
    }
}

pub async fn handler(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(query): Query<FeedQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let seat = match query.token {
        None => None,
        Some(token) => match auth::authorize(&token, &room_id).and_then(Seat::from_claims) {
            Ok(seat) => Some(seat),
            Err(e) => {
                log::warn!("Refused feed for room {}: {}", room_id, e);
                let status = match e {
                    AuthError::WrongRoom => StatusCode::FORBIDDEN,
                    _ => StatusCode::UNAUTHORIZED,
                };
                return (status, Json(e.to_string())).into_response();
            }
        },
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, room_id, seat))
}

async fn handle_socket(ws: WebSocket, state: AppState, room_id: String, seat: Option<Seat>) {
    info!("New WebSocket connection established for room: {}", room_id);
    let tx = state.get_or_create_room_channel(&room_id).await;

    let (mut sender, mut receiver) = ws.split();
    let mut rx = tx.subscribe();
    let (reply_tx, mut reply_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let player_id = seat.as_ref().map(|s| s.player_id);

    let room_id_for_receive = room_id.clone();
    let receive_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            let Message::Text(text) = msg else {
                continue;
            };
            let reply = match (serde_json::from_str::<CommandFrame>(&text), &seat) {
                (Ok(_), None) => ReplyFrame {
                    message_type: "error".to_string(),
                    room_id: room_id_for_receive.clone(),
                    content: AuthError::MissingToken.to_string(),
                },
                (Ok(frame), Some(seat)) => {
                    match game_service::handle_command(
                        state.clone(),
                        &room_id_for_receive,
                        seat.player_id,
                        &seat.name,
                        &frame.text,
                    )
                    .await
                    {
                        Ok(content) => ReplyFrame {
                            message_type: "ok".to_string(),
                            room_id: room_id_for_receive.clone(),
                            content,
                        },
                        Err(e) => ReplyFrame {
                            message_type: "error".to_string(),
                            room_id: room_id_for_receive.clone(),
                            content: e.to_string(),
                        },
                    }
                }
                (Err(e), _) => ReplyFrame {
                    message_type: "error".to_string(),
                    room_id: room_id_for_receive.clone(),
                    content: format!("Malformed command frame: {}", e),
                },
            };
            match serde_json::to_string(&reply) {
                Ok(json) => {
                    if reply_tx.send(json).is_err() {
                        break;
                    }
                }
                Err(e) => log::warn!("Could not encode reply: {}", e),
            }
        }
    });

    let room_id_for_send = room_id.clone();
    let send_task = tokio::spawn(async move {
        loop {
            let outgoing = tokio::select! {
                received = rx.recv() => match received {
                    Ok(message) if visible_to(&message, player_id) => serde_json::to_string(&message).ok(),
                    Ok(_) => None,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        log::warn!("Subscriber in room {} skipped {} messages", room_id_for_send, skipped);
                        None
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
                reply = reply_rx.recv() => match reply {
                    Some(json) => Some(json),
                    None => break,
                },
            };

            if let Some(json) = outgoing {
                if let Err(e) = sender.send(Message::Text(json)).await {
                    log::warn!("Error sending message in room {}: {}", room_id_for_send, e);
                    break;
                }
            }
        }
    });

    let _ = tokio::join!(receive_task, send_task);
    info!("WebSocket connection closed for room: {}", room_id);
}
