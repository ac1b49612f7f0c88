use serde::{Deserialize, Serialize};

use super::chat::{ChatLog, ChatMessage};
use super::game::{Game, GamePhase};
use super::outcome::Verdict;
use super::player::PlayerId;
use super::role::Role;
use crate::services::scheduler::TimerHandle;

/// The phase timeout currently pending for a room.
#[derive(Debug)]
pub struct PhaseTimer {
    pub phase: GamePhase,
    pub round: u32,
    pub handle: TimerHandle,
}

/// Everything kept for one chat: the game, who created the lobby, the pending
/// timer and what was sent out.
#[derive(Debug)]
pub struct Room {
    pub room_id: String,
    pub creator: Option<PlayerId>,
    pub game: Game,
    pub timer: Option<PhaseTimer>,
    pub chat_log: ChatLog,
    /// Verdict of the last finished game in this room.
    pub last_result: Option<Verdict>,
    // 部屋ごとに単調増加、リセット後も再利用しない
    next_player_id: PlayerId,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoomSummary {
    pub room_id: String,
    pub creator: Option<PlayerId>,
    pub phase: GamePhase,
    pub players: usize,
    pub alive: usize,
}

/// What a client may see of a room. Roles stay hidden unless asked for.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameView {
    pub room_id: String,
    pub phase: GamePhase,
    pub round: u32,
    pub creator: Option<PlayerId>,
    pub players: Vec<PlayerView>,
    pub votes_cast: usize,
    pub verdict: Option<Verdict>,
    pub last_result: Option<Verdict>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub is_alive: bool,
    pub role: Option<Role>,
}

impl Room {
    pub fn new(room_id: String) -> Self {
        Room {
            game: Game::new(room_id.clone()),
            chat_log: ChatLog::new(room_id.clone()),
            room_id,
            creator: None,
            timer: None,
            last_result: None,
            next_player_id: 1,
        }
    }

    /// A player id no one in this room has held before.
    pub fn allocate_player_id(&mut self) -> PlayerId {
        let id = self.next_player_id;
        self.next_player_id += 1;
        id
    }

    /// Keeps `id` from ever being handed out by [`Room::allocate_player_id`].
    pub fn reserve_player_id(&mut self, id: PlayerId) {
        self.next_player_id = self.next_player_id.max(id + 1);
    }

    pub fn is_creator(&self, player_id: PlayerId) -> bool {
        self.creator == Some(player_id)
    }

    /// Cancels the pending phase timeout, if any.
    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.handle.cancel();
        }
    }

    pub fn set_timer(&mut self, timer: PhaseTimer) {
        self.cancel_timer();
        self.timer = Some(timer);
    }

    /// Whether a timeout for `phase` in `round` is still the current one.
    pub fn timer_matches(&self, phase: GamePhase, round: u32) -> bool {
        self.game.phase() == phase && self.game.round() == round
    }

    /// Archives the finished game and opens a fresh lobby.
    pub fn close_game(&mut self) {
        self.cancel_timer();
        self.last_result = self.game.verdict();
        self.game.reset();
        self.creator = None;
    }

    pub fn reset(&mut self) {
        self.cancel_timer();
        self.game.reset();
        self.creator = None;
        self.chat_log.clear();
    }

    pub fn record(&mut self, message: ChatMessage) {
        self.chat_log.add_message(message);
    }

    pub fn view(&self, show_roles: bool) -> GameView {
        let started = self.game.phase() != GamePhase::Waiting;
        GameView {
            room_id: self.room_id.clone(),
            phase: self.game.phase(),
            round: self.game.round(),
            creator: self.creator,
            players: self
                .game
                .roster()
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    name: p.name.clone(),
                    is_alive: p.is_alive(),
                    role: (show_roles && started).then(|| p.role()),
                })
                .collect(),
            votes_cast: self.game.votes().len(),
            verdict: self.game.verdict(),
            last_result: self.last_result,
        }
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.room_id.clone(),
            creator: self.creator,
            phase: self.game.phase(),
            players: self.game.roster().len(),
            alive: self.game.roster().alive().count(),
        }
    }
}
