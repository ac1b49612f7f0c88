use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::models::error::GameError;
use crate::services::game_service::{self, ServiceError};
use crate::state::AppState;
use crate::utils::auth::{AuthError, Claims};

pub mod auth_middleware;

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinRequest {
    pub display_name: String,
}

/// A chat command. The sender is whoever the bearer token names.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandRequest {
    pub text: String,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .nest(
            "/:roomid",
            Router::new()
                // 参加するとプレイヤートークンが発行される
                .route("/join", post(join_handler))
                .route(
                    "/command",
                    post(command_handler)
                        .layer(middleware::from_fn(auth_middleware::auth_middleware)),
                )
                .route("/state", get(get_game_state))
                // ゲーム進行の管理
                .route("/phase/next", post(advance_phase_handler))
                .route("/check-winner", get(check_winner_handler)),
        )
        .with_state(state)
}

pub(crate) fn status_of(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::RoomNotFound => StatusCode::NOT_FOUND,
        ServiceError::Command(_) => StatusCode::BAD_REQUEST,
        ServiceError::Auth(AuthError::WrongRoom) => StatusCode::FORBIDDEN,
        ServiceError::Auth(AuthError::TokenCreation) => StatusCode::INTERNAL_SERVER_ERROR,
        ServiceError::Auth(_) => StatusCode::UNAUTHORIZED,
        ServiceError::Game(GameError::Unauthorized) => StatusCode::FORBIDDEN,
        ServiceError::Game(GameError::InvalidPhase(_) | GameError::AlreadyStarted) => {
            StatusCode::CONFLICT
        }
        ServiceError::Game(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn join_handler(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<JoinRequest>,
) -> impl IntoResponse {
    match game_service::join_room(state, &room_id, &request.display_name).await {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(e) => (status_of(&e), Json(e.to_string())).into_response(),
    }
}

async fn command_handler(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CommandRequest>,
) -> impl IntoResponse {
    let result = match claims.player_id() {
        Ok(actor_id) if claims.is_for_room(&room_id) => {
            game_service::handle_command(state, &room_id, actor_id, &claims.name, &request.text)
                .await
        }
        Ok(_) => Err(AuthError::WrongRoom.into()),
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(e) => (status_of(&e), Json(e.to_string())),
    }
}

async fn get_game_state(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    match game_service::get_game_state(state, &room_id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => (status_of(&e), Json(e.to_string())).into_response(),
    }
}

async fn advance_phase_handler(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    match game_service::advance_game_phase(state, &room_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(e) => (status_of(&e), Json(e.to_string())),
    }
}

async fn check_winner_handler(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    match game_service::check_winner(state, &room_id).await {
        Ok(None) => (StatusCode::OK, Json("Game in progress".to_string())),
        Ok(Some(verdict)) => (StatusCode::OK, Json(verdict.to_string())),
        Err(e) => (status_of(&e), Json(e.to_string())),
    }
}
