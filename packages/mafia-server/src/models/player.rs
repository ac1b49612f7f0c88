use serde::{Deserialize, Serialize};

use super::role::{Faction, Role};

pub type PlayerId = u64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    role: Role,
    is_alive: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            role: Role::Civilian,
            is_alive: true,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    pub fn is_mafia(&self) -> bool {
        self.role.faction() == Faction::Mafia
    }

    /// Case-insensitive display name match, as typed in chat commands.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    pub(crate) fn assign_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Alive only ever goes from true to false.
    pub(crate) fn eliminate(&mut self) {
        self.is_alive = false;
    }
}
