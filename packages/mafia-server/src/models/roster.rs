use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::player::{Player, PlayerId};
use super::role::Faction;

/// Players of one session in join order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, player: Player) -> Result<&Player, GameError> {
        if self.contains(player.id) {
            return Err(GameError::DuplicateIdentity(player.id));
        }
        self.players.push(player);
        Ok(&self.players[self.players.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.answers_to(name))
    }

    /// The first player to join owns the lobby.
    pub fn first(&self) -> Option<&Player> {
        self.players.first()
    }

    pub fn count_alive(&self, faction: Faction) -> usize {
        self.alive().filter(|p| p.role().faction() == faction).count()
    }

    pub fn alive_names(&self) -> String {
        self.alive()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
