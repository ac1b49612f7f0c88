use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};

use crate::{services::room_service, state::AppState, utils::websocket};

pub fn routes(state: AppState) -> Router {
    Router::new()
        // 空のロビーを作成
        // curl -X POST http://localhost:8080/api/room/create
        .route("/create", post(create_room))
        // curl http://localhost:8080/api/room/rooms
        .route("/rooms", get(list_rooms))
        .route("/:roomid", get(room_summary))
        // タイマーも止める
        // curl -X DELETE http://localhost:8080/api/room/{roomid}/delete
        .route("/:roomid/delete", delete(remove_room))
        // 送信メッセージの購読 (?token= で個人宛も受信)
        // websocat ws://localhost:8080/api/room/{roomid}/ws?token={token}
        .route("/:roomid/ws", get(websocket::handler))
        .with_state(state)
}

async fn create_room(State(state): State<AppState>) -> Response {
    let summary = room_service::create_room(state).await;
    (StatusCode::CREATED, Json(summary)).into_response()
}

async fn list_rooms(State(state): State<AppState>) -> Response {
    Json(room_service::get_rooms(&state).await).into_response()
}

async fn room_summary(State(state): State<AppState>, Path(room_id): Path<String>) -> Response {
    room_service::get_room_info(&state, &room_id)
        .await
        .map(|summary| Json(summary).into_response())
        .unwrap_or_else(|| not_found(&room_id))
}

async fn remove_room(State(state): State<AppState>, Path(room_id): Path<String>) -> Response {
    if room_service::delete_room(state, &room_id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found(&room_id)
    }
}

fn not_found(room_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(format!("Room {} not found", room_id)),
    )
        .into_response()
}
