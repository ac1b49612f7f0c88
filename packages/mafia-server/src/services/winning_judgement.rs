use crate::models::{outcome::Verdict, role::Faction, roster::Roster};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliveCount {
    pub mafia: usize,
    pub others: usize,
}

impl AliveCount {
    pub fn of(roster: &Roster) -> Self {
        let mafia = roster.count_alive(Faction::Mafia);
        let others = roster.alive().count() - mafia;
        Self { mafia, others }
    }

    pub fn total(&self) -> usize {
        self.mafia + self.others
    }
}

/// Decides whether the game is over. `None` means play continues.
pub fn judge(roster: &Roster) -> Option<Verdict> {
    judge_counts(AliveCount::of(roster))
}

pub fn judge_counts(count: AliveCount) -> Option<Verdict> {
    if count.total() == 0 {
        Some(Verdict::Draw)
    } else if count.mafia == 0 {
        Some(Verdict::TownWins)
    } else if count.mafia >= count.others {
        Some(Verdict::MafiaWins)
    } else {
        None
    }
}
