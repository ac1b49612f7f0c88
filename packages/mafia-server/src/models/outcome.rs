use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::player::PlayerId;

/// Private result of one investigator's check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investigation {
    pub target: PlayerId,
    pub is_mafia: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightOutcome {
    pub killed: Option<PlayerId>,
    /// Set only when the doctor's save cancelled the mafia's kill.
    pub saved: Option<PlayerId>,
    /// investigator id -> result
    pub investigations: BTreeMap<PlayerId, Investigation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOutcome {
    pub eliminated: Option<PlayerId>,
    pub tie: bool,
    /// target id -> votes received
    pub tally: BTreeMap<PlayerId, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    TownWins,  // 市民陣営勝利
    MafiaWins, // マフィア陣営勝利
    Draw,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::TownWins => write!(f, "The town wins!"),
            Verdict::MafiaWins => write!(f, "The mafia wins!"),
            Verdict::Draw => write!(f, "Nobody survived. It's a draw."),
        }
    }
}
