use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{
    error::GameError,
    ledger::{NightAction, NightLedger, VoteLedger},
    outcome::{DayOutcome, Investigation, NightOutcome, Verdict},
    player::{Player, PlayerId},
    role::{NightActionKind, Role},
    roster::Roster,
};
use crate::services::{night_resolution, role_assignment, vote_resolution, winning_judgement};

/// One game session tied to one chat channel.
///
/// Every mutation goes through `&mut self`; callers serialize access per room.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Game {
    pub room_id: String,
    roster: Roster,
    phase: GamePhase,
    round: u32,
    night_actions: NightLedger,
    votes: VoteLedger,
    last_night: Option<NightOutcome>,
    last_day: Option<DayOutcome>,
    /// Latest result per investigator, kept until overwritten.
    investigations: BTreeMap<PlayerId, Investigation>,
    verdict: Option<Verdict>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Waiting, // ゲーム開始前
    Night,   // 夜フェーズ
    Day,     // 昼フェーズ
    Ended,   // ゲーム終了
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Waiting => write!(f, "waiting"),
            GamePhase::Night => write!(f, "night"),
            GamePhase::Day => write!(f, "day"),
            GamePhase::Ended => write!(f, "ended"),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Game {{ room_id: {}, phase: {}, round: {}, players: {}, alive: {}, verdict: {:?} }}",
            self.room_id,
            self.phase,
            self.round,
            self.roster.len(),
            self.roster.alive().count(),
            self.verdict
        )
    }
}

impl Game {
    pub fn new(room_id: String) -> Self {
        Game {
            room_id,
            roster: Roster::new(),
            phase: GamePhase::Waiting,
            round: 0,
            night_actions: NightLedger::new(),
            votes: VoteLedger::new(),
            last_night: None,
            last_day: None,
            investigations: BTreeMap::new(),
            verdict: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.roster.get(id)
    }

    pub fn night_actions(&self) -> &NightLedger {
        &self.night_actions
    }

    pub fn votes(&self) -> &VoteLedger {
        &self.votes
    }

    pub fn last_night(&self) -> Option<&NightOutcome> {
        self.last_night.as_ref()
    }

    pub fn last_day(&self) -> Option<&DayOutcome> {
        self.last_day.as_ref()
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn join(&mut self, id: PlayerId, name: String) -> Result<&Player, GameError> {
        match self.phase {
            GamePhase::Waiting => self.roster.push(Player::new(id, name)),
            GamePhase::Night | GamePhase::Day | GamePhase::Ended => Err(GameError::AlreadyStarted),
        }
    }

    /// Assigns roles and enters the first night.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        match self.phase {
            GamePhase::Waiting => {}
            GamePhase::Ended => return Err(GameError::InvalidPhase(self.phase)),
            GamePhase::Night | GamePhase::Day => return Err(GameError::AlreadyStarted),
        }
        role_assignment::assign_roles(&mut self.roster, rng)?;

        self.night_actions.clear();
        self.votes.clear();
        self.round = 1;
        self.phase = GamePhase::Night;
        log::info!(
            "Game in room {} started with {} players",
            self.room_id,
            self.roster.len()
        );
        Ok(())
    }

    pub fn submit_night_action(
        &mut self,
        actor_id: PlayerId,
        kind: NightActionKind,
        target_name: &str,
    ) -> Result<NightAction, GameError> {
        self.require_phase(GamePhase::Night)?;
        let actor = self.living_actor(actor_id)?;
        if actor.role().night_action() != Some(kind) {
            return Err(GameError::WrongRole {
                role: actor.role(),
                action: kind.verb(),
            });
        }
        let target = self.living_target(target_name)?;

        let action = NightAction {
            kind,
            target: target.id,
        };
        self.night_actions.submit(actor_id, action);
        log::debug!(
            "Room {}: player {} will {} player {}",
            self.room_id,
            actor_id,
            kind,
            action.target
        );
        Ok(action)
    }

    /// Casts or switches a vote; returns the target's id.
    pub fn cast_vote(&mut self, voter_id: PlayerId, target_name: &str) -> Result<PlayerId, GameError> {
        self.require_phase(GamePhase::Day)?;
        self.living_actor(voter_id)?;
        let target = self.living_target(target_name)?.id;

        let previous = self.votes.cast(voter_id, target);
        log::debug!(
            "Room {}: player {} votes for {} (previously {:?})",
            self.room_id,
            voter_id,
            target,
            previous
        );
        Ok(target)
    }

    /// The investigator publicly discloses their latest result.
    pub fn reveal_investigation(&self, actor_id: PlayerId) -> Result<Investigation, GameError> {
        self.require_phase(GamePhase::Day)?;
        let actor = self.living_actor(actor_id)?;
        if actor.role() != Role::Investigator {
            return Err(GameError::WrongRole {
                role: actor.role(),
                action: "reveal an investigation",
            });
        }
        self.investigations
            .get(&actor_id)
            .copied()
            .ok_or(GameError::NothingToReveal)
    }

    /// Resolves the night and moves to day, or ends the game.
    pub fn resolve_night(&mut self) -> Result<NightOutcome, GameError> {
        self.require_phase(GamePhase::Night)?;

        let outcome = night_resolution::resolve_night(&mut self.roster, &self.night_actions);
        self.night_actions.clear();
        self.investigations
            .extend(outcome.investigations.iter().map(|(k, v)| (*k, *v)));
        self.last_night = Some(outcome.clone());
        log::info!(
            "Room {}: night {} resolved, killed {:?}, saved {:?}",
            self.room_id,
            self.round,
            outcome.killed,
            outcome.saved
        );

        if !self.conclude() {
            self.votes.clear();
            self.phase = GamePhase::Day;
        }
        Ok(outcome)
    }

    /// Resolves the day's vote and moves to the next night, or ends the game.
    pub fn resolve_day(&mut self) -> Result<DayOutcome, GameError> {
        self.require_phase(GamePhase::Day)?;

        let outcome = vote_resolution::resolve_votes(&mut self.roster, &self.votes);
        self.votes.clear();
        self.last_day = Some(outcome.clone());
        log::info!(
            "Room {}: day {} resolved, eliminated {:?}, tie {}",
            self.room_id,
            self.round,
            outcome.eliminated,
            outcome.tie
        );

        if !self.conclude() {
            self.night_actions.clear();
            self.round += 1;
            self.phase = GamePhase::Night;
        }
        Ok(outcome)
    }

    /// Every living player with a night action has submitted one.
    pub fn is_night_complete(&self) -> bool {
        self.phase == GamePhase::Night
            && self
                .roster
                .alive()
                .filter(|p| p.role().acts_at_night())
                .all(|p| self.night_actions.contains(p.id))
    }

    /// Every living player has voted.
    pub fn is_day_complete(&self) -> bool {
        self.phase == GamePhase::Day && self.roster.alive().all(|p| self.votes.contains(p.id))
    }

    pub fn reset(&mut self) {
        *self = Game::new(std::mem::take(&mut self.room_id));
    }

    /// Runs the win check; returns true when the game is over.
    fn conclude(&mut self) -> bool {
        match winning_judgement::judge(&self.roster) {
            Some(verdict) => {
                log::info!("Room {}: game over, {:?}", self.room_id, verdict);
                self.verdict = Some(verdict);
                self.night_actions.clear();
                self.votes.clear();
                self.phase = GamePhase::Ended;
                true
            }
            None => false,
        }
    }

    fn require_phase(&self, phase: GamePhase) -> Result<(), GameError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(GameError::InvalidPhase(self.phase))
        }
    }

    fn living_actor(&self, id: PlayerId) -> Result<&Player, GameError> {
        let actor = self.roster.get(id).ok_or(GameError::UnknownActor(id))?;
        if !actor.is_alive() {
            return Err(GameError::DeadActor);
        }
        Ok(actor)
    }

    fn living_target(&self, name: &str) -> Result<&Player, GameError> {
        let target = self
            .roster
            .find_by_name(name)
            .ok_or_else(|| GameError::UnknownTarget(name.trim().to_string()))?;
        if !target.is_alive() {
            return Err(GameError::DeadTarget(target.name.clone()));
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn started_game(count: usize) -> Game {
        let mut game = Game::new("room".to_string());
        for id in 1..=count {
            game.join(id as PlayerId, format!("Player{}", id)).unwrap();
        }
        game.start(&mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        game
    }

    fn name_with(game: &Game, role: Role) -> String {
        game.roster()
            .iter()
            .find(|p| p.role() == role)
            .map(|p| p.name.clone())
            .unwrap()
    }

    fn id_with(game: &Game, role: Role) -> PlayerId {
        game.roster().iter().find(|p| p.role() == role).unwrap().id
    }

    #[test]
    fn test_join_only_while_waiting() {
        let mut game = started_game(4);
        assert_eq!(
            game.join(9, "late".to_string()).unwrap_err(),
            GameError::AlreadyStarted
        );
        assert_eq!(game.roster().len(), 4);
    }

    #[test]
    fn test_start_needs_four_players() {
        let mut game = Game::new("room".to_string());
        for id in 1..=3 {
            game.join(id, format!("Player{}", id)).unwrap();
        }
        let err = game.start(&mut ChaCha8Rng::seed_from_u64(1)).unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientPlayers {
                required: 4,
                found: 3
            }
        );
        assert_eq!(game.phase(), GamePhase::Waiting);
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut game = started_game(4);
        assert_eq!(
            game.start(&mut ChaCha8Rng::seed_from_u64(2)).unwrap_err(),
            GameError::AlreadyStarted
        );
    }

    #[test]
    fn test_night_action_validation() {
        let mut game = started_game(5);
        let civilian = id_with(&game, Role::Civilian);
        let mafia = id_with(&game, Role::Mafia);
        let doctor_name = name_with(&game, Role::Doctor);

        assert_eq!(
            game.submit_night_action(civilian, NightActionKind::Kill, &doctor_name),
            Err(GameError::WrongRole {
                role: Role::Civilian,
                action: "kill"
            })
        );
        assert_eq!(
            game.submit_night_action(mafia, NightActionKind::Save, &doctor_name),
            Err(GameError::WrongRole {
                role: Role::Mafia,
                action: "save"
            })
        );
        assert_eq!(
            game.submit_night_action(mafia, NightActionKind::Kill, "nobody"),
            Err(GameError::UnknownTarget("nobody".to_string()))
        );
        assert_eq!(
            game.submit_night_action(42, NightActionKind::Kill, &doctor_name),
            Err(GameError::UnknownActor(42))
        );
        assert!(game.night_actions().is_empty());

        let upper = doctor_name.to_uppercase();
        let action = game
            .submit_night_action(mafia, NightActionKind::Kill, &upper)
            .unwrap();
        assert_eq!(action.target, id_with(&game, Role::Doctor));
    }

    #[test]
    fn test_votes_rejected_at_night() {
        let mut game = started_game(4);
        assert_eq!(
            game.cast_vote(1, "Player2"),
            Err(GameError::InvalidPhase(GamePhase::Night))
        );
    }

    #[test]
    fn test_double_resolution_is_rejected() {
        let mut game = started_game(5);
        game.resolve_night().unwrap();
        assert_eq!(game.phase(), GamePhase::Day);
        assert_eq!(
            game.resolve_night(),
            Err(GameError::InvalidPhase(GamePhase::Day))
        );

        game.resolve_day().unwrap();
        assert_eq!(game.phase(), GamePhase::Night);
        assert_eq!(game.round(), 2);
        assert_eq!(
            game.resolve_day(),
            Err(GameError::InvalidPhase(GamePhase::Night))
        );
    }

    #[test]
    fn test_doctor_negation_changes_nobody() {
        let mut game = started_game(5);
        let civilian_name = name_with(&game, Role::Civilian);
        game.submit_night_action(id_with(&game, Role::Mafia), NightActionKind::Kill, &civilian_name)
            .unwrap();
        game.submit_night_action(id_with(&game, Role::Doctor), NightActionKind::Save, &civilian_name)
            .unwrap();

        let outcome = game.resolve_night().unwrap();
        assert_eq!(outcome.killed, None);
        assert!(outcome.saved.is_some());
        assert!(game.roster().iter().all(|p| p.is_alive()));
    }

    #[test]
    fn test_dead_players_cannot_vote_or_be_voted() {
        let mut game = started_game(5);
        let victim_name = name_with(&game, Role::Investigator);
        let victim = id_with(&game, Role::Investigator);
        game.submit_night_action(id_with(&game, Role::Mafia), NightActionKind::Kill, &victim_name)
            .unwrap();
        game.resolve_night().unwrap();

        assert_eq!(game.cast_vote(victim, "Player1"), Err(GameError::DeadActor));
        let voter = id_with(&game, Role::Doctor);
        assert_eq!(
            game.cast_vote(voter, &victim_name),
            Err(GameError::DeadTarget(victim_name.clone()))
        );
    }

    #[test]
    fn test_reveal_investigation() {
        let mut game = started_game(5);
        let investigator = id_with(&game, Role::Investigator);
        let mafia_name = name_with(&game, Role::Mafia);

        game.submit_night_action(investigator, NightActionKind::Check, &mafia_name)
            .unwrap();
        assert_eq!(
            game.reveal_investigation(investigator),
            Err(GameError::InvalidPhase(GamePhase::Night))
        );
        game.resolve_night().unwrap();

        let revealed = game.reveal_investigation(investigator).unwrap();
        assert_eq!(revealed.target, id_with(&game, Role::Mafia));
        assert!(revealed.is_mafia);

        let doctor = id_with(&game, Role::Doctor);
        assert!(matches!(
            game.reveal_investigation(doctor),
            Err(GameError::WrongRole { .. })
        ));
    }

    #[test]
    fn test_reveal_without_check() {
        let mut game = started_game(5);
        game.resolve_night().unwrap();
        let investigator = id_with(&game, Role::Investigator);
        assert_eq!(
            game.reveal_investigation(investigator),
            Err(GameError::NothingToReveal)
        );
    }

    #[test]
    fn test_ended_game_rejects_everything() {
        let mut game = started_game(4);
        let mafia = id_with(&game, Role::Mafia);
        for _ in 0..2 {
            let target = game
                .roster()
                .alive()
                .find(|p| !p.is_mafia())
                .map(|p| p.name.clone())
                .unwrap();
            game.submit_night_action(mafia, NightActionKind::Kill, &target)
                .unwrap();
            game.resolve_night().unwrap();
            if game.phase() == GamePhase::Ended {
                break;
            }
            game.resolve_day().unwrap();
        }
        assert_eq!(game.phase(), GamePhase::Ended);
        assert_eq!(game.verdict(), Some(Verdict::MafiaWins));

        let ended = Err(GameError::InvalidPhase(GamePhase::Ended));
        assert_eq!(game.resolve_night().map(|_| ()), ended);
        assert_eq!(game.resolve_day().map(|_| ()), ended);
        assert_eq!(game.cast_vote(mafia, "Player1").map(|_| ()), ended);
        assert_eq!(
            game.submit_night_action(mafia, NightActionKind::Kill, "Player1")
                .map(|_| ()),
            ended
        );
        // 参加だけはフェーズに関係なく AlreadyStarted
        assert_eq!(
            game.join(99, "late".to_string()).map(|_| ()),
            Err(GameError::AlreadyStarted)
        );
    }

    #[test]
    fn test_completion_checks() {
        let mut game = started_game(4);
        assert!(!game.is_night_complete());
        let target = name_with(&game, Role::Civilian);
        for role in [Role::Mafia, Role::Doctor, Role::Investigator] {
            let kind = role.night_action().unwrap();
            game.submit_night_action(id_with(&game, role), kind, &target)
                .unwrap();
        }
        assert!(game.is_night_complete());

        game.resolve_night().unwrap();
        assert!(!game.is_day_complete());
        let ids: Vec<PlayerId> = game.roster().alive().map(|p| p.id).collect();
        for id in ids {
            game.cast_vote(id, &target).unwrap();
        }
        assert!(game.is_day_complete());
    }

    #[test]
    fn test_reset_returns_to_waiting() {
        let mut game = started_game(4);
        game.reset();
        assert_eq!(game.phase(), GamePhase::Waiting);
        assert_eq!(game.room_id, "room");
        assert!(game.roster().is_empty());
        assert_eq!(game.round(), 0);
    }
}
