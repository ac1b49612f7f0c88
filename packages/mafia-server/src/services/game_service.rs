use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{
    models::{
        chat::ChatMessage,
        command::{Command, CommandError},
        error::GameError,
        game::GamePhase,
        outcome::Verdict,
        player::PlayerId,
        role::NightActionKind,
        room::{GameView, PhaseTimer, Room},
    },
    services::announcer,
    state::AppState,
    utils::auth::{self, AuthError},
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Room not found")]
    RoomNotFound,
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// What a player gets back from joining: their id in the room and the token
/// that proves it on later commands and on the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinTicket {
    pub player_id: PlayerId,
    pub token: String,
}

/// Seats a new player under a server-chosen id and issues their token.
pub async fn join_room(
    state: AppState,
    room_id: &str,
    display_name: &str,
) -> Result<JoinTicket, ServiceError> {
    let room = state.get_or_create_room(room_id).await;
    let mut room = room.lock().await;

    let player_id = room.allocate_player_id();
    if let Err(e) = join(&state, &mut room, player_id, display_name).await {
        log::warn!("Room {}: could not seat '{}': {}", room_id, display_name, e);
        return Err(e);
    }
    let token = auth::create_token(room_id, player_id, display_name)?;
    Ok(JoinTicket { player_id, token })
}

/// Entry point for the transport: one chat command from one player.
///
/// Rejections are sent privately to the player and returned; they never touch
/// the game.
pub async fn handle_command(
    state: AppState,
    room_id: &str,
    actor_id: PlayerId,
    display_name: &str,
    text: &str,
) -> Result<String, ServiceError> {
    let room = state.get_or_create_room(room_id).await;
    let mut room = room.lock().await;

    let result = match text.parse::<Command>() {
        Ok(command) => dispatch(&state, &mut room, actor_id, display_name, command).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = &result {
        log::warn!(
            "Room {}: rejected '{}' from player {}: {}",
            room_id,
            text,
            actor_id,
            e
        );
        let notice = announcer::rejection(room_id, actor_id, &e.to_string());
        state.deliver(&mut room, vec![notice]).await;
    }
    result
}

async fn dispatch(
    state: &AppState,
    room: &mut Room,
    actor_id: PlayerId,
    display_name: &str,
    command: Command,
) -> Result<String, ServiceError> {
    match command {
        Command::New => {
            let help = announcer::lobby_help(&room.room_id);
            let text = help.content.clone();
            state.deliver(room, vec![help]).await;
            Ok(text)
        }
        Command::Join => join(state, room, actor_id, display_name).await,
        Command::Start => start_game(state, room, actor_id).await,
        Command::NightAction { kind, target } => {
            night_action(state, room, actor_id, kind, &target).await
        }
        Command::Vote { target } => vote(state, room, actor_id, &target).await,
        Command::Reveal => reveal(state, room, actor_id).await,
        Command::Players => Ok(room.game.roster().alive_names()),
        Command::Reset => reset(state, room, actor_id).await,
    }
}

async fn join(
    state: &AppState,
    room: &mut Room,
    actor_id: PlayerId,
    display_name: &str,
) -> Result<String, ServiceError> {
    let name = room.game.join(actor_id, display_name.to_string())?.name.clone();
    room.reserve_player_id(actor_id);
    if room.game.roster().len() == 1 {
        room.creator = Some(actor_id);
    }
    log::info!("Room {}: {} joined as player {}", room.room_id, name, actor_id);

    let message = announcer::joined(&room.room_id, &name);
    let text = message.content.clone();
    state.deliver(room, vec![message]).await;
    Ok(text)
}

async fn start_game(
    state: &AppState,
    room: &mut Room,
    actor_id: PlayerId,
) -> Result<String, ServiceError> {
    if !room.is_creator(actor_id) {
        return Err(GameError::Unauthorized.into());
    }
    {
        let mut rng = match state.game_config.random_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        room.game.start(&mut rng)?;
    }

    let cards = announcer::role_cards(&room.game);
    state.deliver(room, cards).await;
    enter_phase(state, room).await;
    Ok(format!(
        "Game started with {} players",
        room.game.roster().len()
    ))
}

async fn night_action(
    state: &AppState,
    room: &mut Room,
    actor_id: PlayerId,
    kind: NightActionKind,
    target: &str,
) -> Result<String, ServiceError> {
    let action = room.game.submit_night_action(actor_id, kind, target)?;
    let target_name = room
        .game
        .player(action.target)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    let reply = match kind {
        NightActionKind::Kill => format!("✅ You chose your victim: {}", target_name),
        NightActionKind::Save => format!("✅ You will save: {}", target_name),
        NightActionKind::Check => format!(
            "✅ You will check {}. The result arrives in the morning.",
            target_name
        ),
    };
    let ack = ChatMessage::private(&room.room_id, actor_id, reply.clone());
    state.deliver(room, vec![ack]).await;

    if state.game_config.auto_advance_phases && room.game.is_night_complete() {
        log::info!("Room {}: every night role has acted", room.room_id);
        finish_night(state, room).await?;
    }
    Ok(reply)
}

async fn vote(
    state: &AppState,
    room: &mut Room,
    actor_id: PlayerId,
    target: &str,
) -> Result<String, ServiceError> {
    let target_id = room.game.cast_vote(actor_id, target)?;
    let name_of = |id: PlayerId| {
        room.game
            .player(id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    };
    let reply = format!("🗳️ {} votes for {}", name_of(actor_id), name_of(target_id));
    let message = ChatMessage::broadcast(&room.room_id, reply.clone());
    state.deliver(room, vec![message]).await;

    if state.game_config.auto_advance_phases && room.game.is_day_complete() {
        log::info!("Room {}: every living player has voted", room.room_id);
        finish_day(state, room).await?;
    }
    Ok(reply)
}

async fn reveal(
    state: &AppState,
    room: &mut Room,
    actor_id: PlayerId,
) -> Result<String, ServiceError> {
    let investigation = room.game.reveal_investigation(actor_id)?;
    let message = announcer::revealed(&room.game, actor_id, &investigation);
    let text = message.content.clone();
    state.deliver(room, vec![message]).await;
    Ok(text)
}

async fn reset(
    state: &AppState,
    room: &mut Room,
    actor_id: PlayerId,
) -> Result<String, ServiceError> {
    if room.creator.is_some() && !room.is_creator(actor_id) {
        return Err(GameError::Unauthorized.into());
    }
    room.reset();
    log::info!("Room {}: reset by player {}", room.room_id, actor_id);

    let message = ChatMessage::broadcast(&room.room_id, "🔄 The game was reset. /join to play again.");
    let text = message.content.clone();
    state.deliver(room, vec![message]).await;
    Ok(text)
}

/// Announces the phase the game just entered and arms its timeout.
async fn enter_phase(state: &AppState, room: &mut Room) {
    let config = &state.game_config;
    match room.game.phase() {
        GamePhase::Night => {
            let messages = announcer::night_started(&room.game, config.night_duration_seconds);
            state.deliver(room, messages).await;
        }
        GamePhase::Day => {
            let message = announcer::day_started(&room.game, config.day_duration_seconds);
            state.deliver(room, vec![message]).await;
        }
        GamePhase::Waiting | GamePhase::Ended => return,
    }
    schedule_phase_timeout(state, room);
}

fn schedule_phase_timeout(state: &AppState, room: &mut Room) {
    let phase = room.game.phase();
    let round = room.game.round();
    let delay = match phase {
        GamePhase::Night => state.game_config.night_duration(),
        GamePhase::Day => state.game_config.day_duration(),
        GamePhase::Waiting | GamePhase::Ended => return,
    };

    let timer_state = state.clone();
    let room_id = room.room_id.clone();
    let handle = state.scheduler.schedule_once(
        &room.room_id,
        delay,
        Box::pin(async move {
            on_phase_timeout(timer_state, room_id, phase, round).await;
        }),
    );
    room.set_timer(PhaseTimer {
        phase,
        round,
        handle,
    });
}

/// Timer callback. Does nothing if the phase it was armed for already ended.
pub async fn on_phase_timeout(state: AppState, room_id: String, phase: GamePhase, round: u32) {
    let Some(room) = state.room(&room_id).await else {
        return;
    };
    let mut room = room.lock().await;
    if !room.timer_matches(phase, round) {
        log::debug!(
            "Room {}: stale {} timeout for round {} ignored",
            room_id,
            phase,
            round
        );
        return;
    }
    // this timer has fired; cancelling it now would abort the running task
    room.timer = None;
    log::info!("Room {}: {} {} timed out", room_id, phase, round);

    if let Err(e) = resolve_phase(&state, &mut room).await {
        log::warn!("Room {}: timeout resolution failed: {}", room_id, e);
    }
}

async fn resolve_phase(state: &AppState, room: &mut Room) -> Result<String, ServiceError> {
    match room.game.phase() {
        GamePhase::Night => finish_night(state, room).await,
        GamePhase::Day => finish_day(state, room).await,
        phase => Err(GameError::InvalidPhase(phase).into()),
    }
}

async fn finish_night(state: &AppState, room: &mut Room) -> Result<String, ServiceError> {
    let outcome = room.game.resolve_night()?;
    room.cancel_timer();

    let messages = announcer::night_summary(&room.game, &outcome);
    let summary = headline(&messages);
    state.deliver(room, messages).await;
    conclude_or_continue(state, room).await;
    Ok(summary)
}

async fn finish_day(state: &AppState, room: &mut Room) -> Result<String, ServiceError> {
    let outcome = room.game.resolve_day()?;
    room.cancel_timer();

    let messages = announcer::day_summary(&room.game, &outcome);
    let summary = headline(&messages);
    state.deliver(room, messages).await;
    conclude_or_continue(state, room).await;
    Ok(summary)
}

fn headline(messages: &[ChatMessage]) -> String {
    messages
        .first()
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

async fn conclude_or_continue(state: &AppState, room: &mut Room) {
    match room.game.verdict() {
        Some(verdict) => {
            let message = announcer::game_over(&room.game, verdict);
            state.deliver(room, vec![message]).await;
            room.close_game();
        }
        None => enter_phase(state, room).await,
    }
}

/// Resolves the current phase right away, as if its timer had fired.
pub async fn advance_game_phase(state: AppState, room_id: &str) -> Result<String, ServiceError> {
    let room = state.room(room_id).await.ok_or(ServiceError::RoomNotFound)?;
    let mut room = room.lock().await;
    resolve_phase(&state, &mut room).await
}

pub async fn get_game_state(state: AppState, room_id: &str) -> Result<GameView, ServiceError> {
    let room = state.room(room_id).await.ok_or(ServiceError::RoomNotFound)?;
    let room = room.lock().await;
    Ok(room.view(state.game_config.show_player_roles))
}

/// The running game's verdict, or that of the last finished game in the room.
pub async fn check_winner(state: AppState, room_id: &str) -> Result<Option<Verdict>, ServiceError> {
    let room = state.room(room_id).await.ok_or(ServiceError::RoomNotFound)?;
    let room = room.lock().await;
    Ok(room.game.verdict().or(room.last_result))
}
