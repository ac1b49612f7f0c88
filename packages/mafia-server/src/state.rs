use std::{collections::HashMap, sync::Arc};
use tokio::sync::{broadcast, Mutex};

use crate::models::chat::ChatMessage;
use crate::models::config::GameConfig;
use crate::models::room::Room;
use crate::services::scheduler::{PhaseScheduler, TokioScheduler};

/// Shared server state.
///
/// The registry lock is only held long enough to look a room up; all game
/// mutation happens under the room's own lock, which serializes player
/// commands and phase timeouts for that room.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<Mutex<HashMap<String, Arc<Mutex<Room>>>>>,
    pub channel: Arc<Mutex<HashMap<String, broadcast::Sender<ChatMessage>>>>,
    pub game_config: Arc<GameConfig>,
    pub scheduler: Arc<dyn PhaseScheduler>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(game_config: GameConfig) -> Self {
        AppState {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            channel: Arc::new(Mutex::new(HashMap::new())),
            game_config: Arc::new(game_config),
            scheduler: Arc::new(TokioScheduler),
        }
    }

    pub async fn room(&self, room_id: &str) -> Option<Arc<Mutex<Room>>> {
        self.rooms.lock().await.get(room_id).cloned()
    }

    pub async fn get_or_create_room(&self, room_id: &str) -> Arc<Mutex<Room>> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room_id.to_string())
            .or_insert_with(|| {
                log::info!("Opening room {}", room_id);
                Arc::new(Mutex::new(Room::new(room_id.to_string())))
            })
            .clone()
    }

    pub async fn get_or_create_room_channel(&self, room_id: &str) -> broadcast::Sender<ChatMessage> {
        let mut channels = self.channel.lock().await;
        if let Some(channel) = channels.get(room_id) {
            channel.clone()
        } else {
            let (tx, _) = broadcast::channel(1000);
            channels.insert(room_id.to_string(), tx.clone());
            tx
        }
    }

    /// Records outbound messages in the room's log and pushes them to subscribers.
    pub async fn deliver(&self, room: &mut Room, messages: Vec<ChatMessage>) {
        if messages.is_empty() {
            return;
        }
        let tx = self.get_or_create_room_channel(&room.room_id).await;
        for message in messages {
            room.record(message.clone());
            if tx.send(message).is_err() {
                log::trace!("No subscribers in room {}", room.room_id);
            }
        }
    }
}
