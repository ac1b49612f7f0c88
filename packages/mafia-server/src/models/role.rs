use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Civilian,     // 市民
    Mafia,        // マフィア
    Doctor,       // 医者
    Investigator, // 探偵
}

/// Which side a role plays for. Everyone who is not Mafia is Town.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Town,
    Mafia,
}

/// The covert action a role may submit during the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NightActionKind {
    Kill,  // マフィアの殺害
    Save,  // 医者の保護
    Check, // 探偵の調査
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Civilian,
        Role::Mafia,
        Role::Doctor,
        Role::Investigator,
    ];

    pub fn night_action(&self) -> Option<NightActionKind> {
        match self {
            Role::Civilian => None,
            Role::Mafia => Some(NightActionKind::Kill),
            Role::Doctor => Some(NightActionKind::Save),
            Role::Investigator => Some(NightActionKind::Check),
        }
    }

    pub fn acts_at_night(&self) -> bool {
        self.night_action().is_some()
    }

    pub fn faction(&self) -> Faction {
        match self {
            Role::Mafia => Faction::Mafia,
            Role::Civilian | Role::Doctor | Role::Investigator => Faction::Town,
        }
    }

    /// Whether the night result is delivered privately to the actor.
    pub fn has_private_result(&self) -> bool {
        matches!(self, Role::Investigator)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Civilian => {
                "You are a civilian. Work out who the mafia is and vote them out during the day."
            }
            Role::Mafia => "You are the mafia! Pick a victim every night.",
            Role::Doctor => "You are the doctor. Save one player (yourself included) every night.",
            Role::Investigator => {
                "You are the investigator. Every night you may check one player.\n\
                 Use the command: /check [player_name]"
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Civilian => write!(f, "Civilian"),
            Role::Mafia => write!(f, "Mafia"),
            Role::Doctor => write!(f, "Doctor"),
            Role::Investigator => write!(f, "Investigator"),
        }
    }
}

impl NightActionKind {
    /// The only role allowed to submit this action.
    pub fn role(&self) -> Role {
        match self {
            NightActionKind::Kill => Role::Mafia,
            NightActionKind::Save => Role::Doctor,
            NightActionKind::Check => Role::Investigator,
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            NightActionKind::Kill => "/kill",
            NightActionKind::Save => "/save",
            NightActionKind::Check => "/check",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            NightActionKind::Kill => "🔪 Choose your victim: /kill [name]",
            NightActionKind::Save => "💉 Who will you save: /save [name]",
            NightActionKind::Check => "🕵️ Who will you check: /check [name]",
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            NightActionKind::Kill => "kill",
            NightActionKind::Save => "save",
            NightActionKind::Check => "check",
        }
    }
}

impl fmt::Display for NightActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}
