use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::player::PlayerId;
use super::role::NightActionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightAction {
    pub kind: NightActionKind,
    pub target: PlayerId,
}

/// One live night action per actor for the current round.
///
/// Keyed by actor id so iteration runs from the lowest id upwards, which is
/// what the night resolution relies on when several players share a role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NightLedger {
    actions: BTreeMap<PlayerId, NightAction>,
}

impl NightLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the action, replacing any earlier one from the same actor.
    pub fn submit(&mut self, actor: PlayerId, action: NightAction) -> Option<NightAction> {
        self.actions.insert(actor, action)
    }

    pub fn get(&self, actor: PlayerId) -> Option<&NightAction> {
        self.actions.get(&actor)
    }

    pub fn contains(&self, actor: PlayerId) -> bool {
        self.actions.contains_key(&actor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &NightAction)> {
        self.actions.iter().map(|(actor, action)| (*actor, action))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

/// voter id -> target id, at most one live vote per voter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteLedger {
    votes: BTreeMap<PlayerId, PlayerId>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Casts or switches a vote. Returns the previous target, if any.
    pub fn cast(&mut self, voter: PlayerId, target: PlayerId) -> Option<PlayerId> {
        self.votes.insert(voter, target)
    }

    pub fn contains(&self, voter: PlayerId) -> bool {
        self.votes.contains_key(&voter)
    }

    /// Counts per target, recomputed from the live votes.
    pub fn tally(&self) -> BTreeMap<PlayerId, usize> {
        let mut tally = BTreeMap::new();
        for target in self.votes.values() {
            *tally.entry(*target).or_insert(0) += 1;
        }
        tally
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn clear(&mut self) {
        self.votes.clear();
    }
}
