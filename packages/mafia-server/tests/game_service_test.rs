use std::time::Duration;

use mafia_server::models::{
    config::GameConfig,
    error::GameError,
    game::GamePhase,
    outcome::Verdict,
    player::PlayerId,
    role::Role,
};
use mafia_server::services::game_service::{self, ServiceError};
use mafia_server::state::AppState;
use mafia_server::utils::{auth, test_setup::setup_test_env};

const ROOM: &str = "1";
const NAMES: [&str; 4] = ["alice", "bob", "carol", "dave"];

fn seeded_state() -> AppState {
    AppState::with_config(GameConfig {
        random_seed: Some(7),
        ..GameConfig::default()
    })
}

async fn send(state: &AppState, actor: PlayerId, text: &str) -> Result<String, ServiceError> {
    let name = NAMES[(actor - 1) as usize];
    game_service::handle_command(state.clone(), ROOM, actor, name, text).await
}

/// Four players join and alice (player 1) starts the game.
async fn started_game(state: &AppState) {
    for id in 1..=4 {
        send(state, id, "/join").await.unwrap();
    }
    send(state, 1, "/start").await.unwrap();
}

/// Id and name of the player holding `role`.
async fn holder(state: &AppState, role: Role) -> (PlayerId, String) {
    let room = state.room(ROOM).await.unwrap();
    let room = room.lock().await;
    let player = room
        .game
        .roster()
        .iter()
        .find(|p| p.role() == role)
        .unwrap();
    (player.id, player.name.clone())
}

async fn phase_and_round(state: &AppState) -> (GamePhase, u32) {
    let view = game_service::get_game_state(state.clone(), ROOM).await.unwrap();
    (view.phase, view.round)
}

#[tokio::test]
async fn test_full_game_mafia_reaches_parity() {
    let state = seeded_state();
    started_game(&state).await;
    assert_eq!(phase_and_round(&state).await, (GamePhase::Night, 1));

    let (mafia, mafia_name) = holder(&state, Role::Mafia).await;
    let (doctor, _) = holder(&state, Role::Doctor).await;
    let (investigator, investigator_name) = holder(&state, Role::Investigator).await;
    let (civilian, civilian_name) = holder(&state, Role::Civilian).await;

    // night 1: the doctor guesses right
    send(&state, mafia, &format!("/kill {}", civilian_name)).await.unwrap();
    send(&state, doctor, &format!("/save {}", civilian_name)).await.unwrap();
    send(&state, investigator, &format!("/check {}", mafia_name)).await.unwrap();

    assert_eq!(phase_and_round(&state).await, (GamePhase::Day, 1));
    {
        let room = state.room(ROOM).await.unwrap();
        let room = room.lock().await;
        assert_eq!(room.game.roster().alive().count(), 4);
        let results = room.chat_log.private_messages(investigator);
        assert!(results.iter().any(|m| m.content.contains("is the mafia")));
        let public = room.chat_log.public_messages();
        assert!(public.iter().any(|m| m.content.contains("Nobody died")));
        assert!(!public.iter().any(|m| m.content.contains("is the mafia")));
    }

    let revealed = send(&state, investigator, "/reveal").await.unwrap();
    assert!(revealed.contains(&mafia_name));

    // day 1: the investigator is lynched 2 to 1 to 1
    send(&state, mafia, &format!("/vote {}", investigator_name)).await.unwrap();
    send(&state, doctor, &format!("/vote {}", investigator_name)).await.unwrap();
    send(&state, civilian, &format!("/vote {}", mafia_name)).await.unwrap();
    send(&state, investigator, &format!("/vote {}", civilian_name)).await.unwrap();

    assert_eq!(phase_and_round(&state).await, (GamePhase::Night, 2));
    {
        let room = state.room(ROOM).await.unwrap();
        let room = room.lock().await;
        assert!(!room.game.player(investigator).unwrap().is_alive());
        assert_eq!(room.game.last_day().unwrap().eliminated, Some(investigator));
    }

    // the dead cannot act
    let err = send(&state, investigator, &format!("/check {}", mafia_name))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::DeadActor)));

    // night 2: the doctor saves themself and the civilian dies
    let doctor_name = NAMES[(doctor - 1) as usize];
    send(&state, mafia, &format!("/kill {}", civilian_name)).await.unwrap();
    send(&state, doctor, &format!("/save {}", doctor_name)).await.unwrap();

    let view = game_service::get_game_state(state.clone(), ROOM).await.unwrap();
    assert_eq!(view.phase, GamePhase::Waiting);
    assert!(view.players.is_empty());
    assert_eq!(view.last_result, Some(Verdict::MafiaWins));
    assert_eq!(
        game_service::check_winner(state.clone(), ROOM).await.unwrap(),
        Some(Verdict::MafiaWins)
    );

    let room = state.room(ROOM).await.unwrap();
    let room = room.lock().await;
    assert!(room.timer.is_none());
    let last = room.chat_log.messages.last().unwrap();
    assert!(last.content.contains("Game over"));
}

#[tokio::test]
async fn test_only_creator_can_start() {
    let state = seeded_state();
    for id in 1..=4 {
        send(&state, id, "/join").await.unwrap();
    }

    let err = send(&state, 2, "/start").await.unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::Unauthorized)));
    assert_eq!(phase_and_round(&state).await.0, GamePhase::Waiting);

    send(&state, 1, "/start").await.unwrap();
    let err = send(&state, 1, "/start").await.unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::AlreadyStarted)));
}

#[tokio::test]
async fn test_start_needs_four_players() {
    let state = seeded_state();
    for id in 1..=3 {
        send(&state, id, "/join").await.unwrap();
    }
    let err = send(&state, 1, "/start").await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Game(GameError::InsufficientPlayers {
            required: 4,
            found: 3
        })
    ));
}

#[tokio::test]
async fn test_rejection_is_private() {
    let state = seeded_state();
    started_game(&state).await;

    let err = send(&state, 2, "/vote alice").await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Game(GameError::InvalidPhase(GamePhase::Night))
    ));

    let room = state.room(ROOM).await.unwrap();
    let room = room.lock().await;
    let last = room.chat_log.messages.last().unwrap();
    assert!(last.is_for(2));
    assert!(last.content.starts_with("⛔"));
    assert!(room.game.votes().is_empty());
}

#[tokio::test]
async fn test_wrong_role_rejected() {
    let state = seeded_state();
    started_game(&state).await;
    let (civilian, _) = holder(&state, Role::Civilian).await;

    let err = send(&state, civilian, "/kill alice").await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Game(GameError::WrongRole {
            role: Role::Civilian,
            ..
        })
    ));
    assert_eq!(phase_and_round(&state).await, (GamePhase::Night, 1));
}

#[tokio::test]
async fn test_no_early_advance_when_disabled() {
    let state = AppState::with_config(GameConfig {
        random_seed: Some(7),
        auto_advance_phases: false,
        ..GameConfig::default()
    });
    started_game(&state).await;

    let (mafia, _) = holder(&state, Role::Mafia).await;
    let (doctor, _) = holder(&state, Role::Doctor).await;
    let (investigator, _) = holder(&state, Role::Investigator).await;
    let (_, civilian_name) = holder(&state, Role::Civilian).await;
    for (actor, verb) in [(mafia, "kill"), (doctor, "save"), (investigator, "check")] {
        send(&state, actor, &format!("/{} {}", verb, civilian_name))
            .await
            .unwrap();
    }
    assert_eq!(phase_and_round(&state).await, (GamePhase::Night, 1));

    // 手動でフェーズを進める
    let summary = game_service::advance_game_phase(state.clone(), ROOM).await.unwrap();
    assert!(summary.contains("Nobody died"));
    assert_eq!(phase_and_round(&state).await, (GamePhase::Day, 1));
}

#[tokio::test]
async fn test_stale_timeout_is_ignored() {
    let state = seeded_state();
    started_game(&state).await;
    game_service::advance_game_phase(state.clone(), ROOM).await.unwrap();
    assert_eq!(phase_and_round(&state).await, (GamePhase::Day, 1));

    // the night 1 timer lost the race against the manual advance
    game_service::on_phase_timeout(state.clone(), ROOM.to_string(), GamePhase::Night, 1).await;
    assert_eq!(phase_and_round(&state).await, (GamePhase::Day, 1));

    game_service::on_phase_timeout(state.clone(), ROOM.to_string(), GamePhase::Day, 2).await;
    assert_eq!(phase_and_round(&state).await, (GamePhase::Day, 1));
}

#[tokio::test(start_paused = true)]
async fn test_phases_advance_on_timeout() {
    let state = seeded_state();
    started_game(&state).await;
    assert_eq!(phase_and_round(&state).await, (GamePhase::Night, 1));

    tokio::time::sleep(state.game_config.night_duration() + Duration::from_secs(1)).await;
    tokio::task::yield_now().await;
    assert_eq!(phase_and_round(&state).await, (GamePhase::Day, 1));

    tokio::time::sleep(state.game_config.day_duration() + Duration::from_secs(1)).await;
    tokio::task::yield_now().await;
    assert_eq!(phase_and_round(&state).await, (GamePhase::Night, 2));

    let room = state.room(ROOM).await.unwrap();
    let room = room.lock().await;
    assert_eq!(room.game.roster().alive().count(), 4);
    let public = room.chat_log.public_messages();
    assert!(public.iter().any(|m| m.content.contains("Nobody voted")));
}

#[tokio::test]
async fn test_reset_by_creator_only() {
    let state = seeded_state();
    started_game(&state).await;

    let err = send(&state, 3, "/reset").await.unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::Unauthorized)));

    send(&state, 1, "/reset").await.unwrap();
    let view = game_service::get_game_state(state.clone(), ROOM).await.unwrap();
    assert_eq!(view.phase, GamePhase::Waiting);
    assert!(view.players.is_empty());
    assert_eq!(view.creator, None);

    let room = state.room(ROOM).await.unwrap();
    assert!(room.lock().await.timer.is_none());
    drop(room);

    // anyone may open the next lobby
    send(&state, 3, "/join").await.unwrap();
    let view = game_service::get_game_state(state.clone(), ROOM).await.unwrap();
    assert_eq!(view.creator, Some(3));
}

#[tokio::test]
async fn test_players_lists_the_living() {
    let state = seeded_state();
    send(&state, 1, "/join").await.unwrap();
    send(&state, 2, "/join").await.unwrap();

    let listing = send(&state, 1, "/players").await.unwrap();
    assert_eq!(listing, "alice\nbob");
}

#[tokio::test]
async fn test_unknown_room() {
    let state = seeded_state();
    let err = game_service::advance_game_phase(state.clone(), "99").await.unwrap_err();
    assert!(matches!(err, ServiceError::RoomNotFound));
    assert!(game_service::check_winner(state, "99").await.is_err());
}

#[tokio::test]
async fn test_unparseable_command_is_answered_privately() {
    let state = seeded_state();
    send(&state, 1, "/join").await.unwrap();

    let err = send(&state, 2, "/dance").await.unwrap_err();
    assert!(matches!(err, ServiceError::Command(_)));

    let room = state.room(ROOM).await.unwrap();
    let room = room.lock().await;
    let last = room.chat_log.messages.last().unwrap();
    assert!(last.is_for(2));
    assert!(last.content.starts_with("⛔"));
    assert_eq!(room.game.roster().len(), 1);
}

#[tokio::test]
async fn test_chat_log_does_not_outlive_resets() {
    let state = seeded_state();
    for _ in 0..3 {
        started_game(&state).await;
        send(&state, 1, "/reset").await.unwrap();
    }

    let room = state.room(ROOM).await.unwrap();
    let room = room.lock().await;
    // only the reset notice of the last cycle is left
    assert_eq!(room.chat_log.messages.len(), 1);
    assert!(room.chat_log.messages[0].content.contains("reset"));
}

#[tokio::test]
async fn test_join_room_seats_under_fresh_ids() {
    setup_test_env();
    let state = seeded_state();
    // プレイヤー 1 はチャット経由で参加済み
    send(&state, 1, "/join").await.unwrap();

    let ticket = game_service::join_room(state.clone(), ROOM, "bob").await.unwrap();
    assert_eq!(ticket.player_id, 2);
    let claims = auth::authorize(&ticket.token, ROOM).unwrap();
    assert_eq!(claims.player_id().unwrap(), 2);
    assert_eq!(claims.name, "bob");

    send(&state, 1, "/reset").await.unwrap();
    let ticket = game_service::join_room(state.clone(), ROOM, "bob").await.unwrap();
    assert_eq!(ticket.player_id, 3);
}
