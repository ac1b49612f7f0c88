use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    models::room::{Room, RoomSummary},
    state::AppState,
};

/// Opens an empty lobby under the next free numeric id.
pub async fn create_room(state: AppState) -> RoomSummary {
    let mut rooms = state.rooms.lock().await;
    let new_id = rooms
        .keys()
        .filter_map(|k| k.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1;
    let new_room = Room::new(new_id.to_string());
    let summary = new_room.summary();
    rooms.insert(new_id.to_string(), Arc::new(Mutex::new(new_room)));
    log::info!("Created room {}", new_id);
    summary
}

pub async fn get_rooms(state: &AppState) -> Vec<RoomSummary> {
    // ルームごとのロックを取る前にレジストリのロックを解放する
    let rooms: Vec<Arc<Mutex<Room>>> = state.rooms.lock().await.values().cloned().collect();

    let mut summaries = Vec::with_capacity(rooms.len());
    for room in rooms {
        summaries.push(room.lock().await.summary());
    }
    summaries.sort_by(|a, b| a.room_id.cmp(&b.room_id));
    summaries
}

pub async fn get_room_info(state: &AppState, room_id: &str) -> Option<RoomSummary> {
    let room = state.room(room_id).await?;
    let summary = room.lock().await.summary();
    Some(summary)
}

pub async fn delete_room(state: AppState, room_id: &str) -> bool {
    let removed = state.rooms.lock().await.remove(room_id);
    match removed {
        Some(room) => {
            room.lock().await.cancel_timer();
            state.channel.lock().await.remove(room_id);
            log::info!("Deleted room {}", room_id);
            true
        }
        None => false,
    }
}
