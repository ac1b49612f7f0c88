use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Where an outbound message goes: one player's private chat or the room channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Destination {
    Player(PlayerId),
    Channel(String),
}

/// Oldest messages are dropped once a room's log holds this many.
pub const MAX_LOGGED_MESSAGES: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLog {
    pub room_id: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message_id: String,
    pub room_id: String,
    pub destination: Destination,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatLog {
    pub fn new(room_id: String) -> Self {
        ChatLog {
            room_id,
            messages: Vec::new(),
        }
    }

    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > MAX_LOGGED_MESSAGES {
            let excess = self.messages.len() - MAX_LOGGED_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn public_messages(&self) -> Vec<&ChatMessage> {
        self.messages
            .iter()
            .filter(|m| matches!(m.destination, Destination::Channel(_)))
            .collect()
    }

    pub fn private_messages(&self, player_id: PlayerId) -> Vec<&ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.destination == Destination::Player(player_id))
            .collect()
    }
}

impl ChatMessage {
    pub fn new(room_id: &str, destination: Destination, content: String) -> Self {
        ChatMessage {
            message_id: uuid::Uuid::new_v4().to_string(),
            room_id: room_id.to_string(),
            destination,
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn broadcast(room_id: &str, content: impl Into<String>) -> Self {
        Self::new(room_id, Destination::Channel(room_id.to_string()), content.into())
    }

    pub fn private(room_id: &str, player_id: PlayerId, content: impl Into<String>) -> Self {
        Self::new(room_id, Destination::Player(player_id), content.into())
    }

    pub fn is_for(&self, player_id: PlayerId) -> bool {
        self.destination == Destination::Player(player_id)
    }
}
