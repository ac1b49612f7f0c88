use crate::models::{ledger::VoteLedger, outcome::DayOutcome, player::PlayerId, roster::Roster};

/// Tallies the day's votes and lynches the single front-runner.
///
/// The tally is recomputed from the ledger, so a switched vote only counts for
/// its latest target. A shared maximum is a tie and nobody is eliminated.
pub fn resolve_votes(roster: &mut Roster, ledger: &VoteLedger) -> DayOutcome {
    let tally = ledger.tally();
    let Some(max) = tally.values().copied().max() else {
        return DayOutcome::default();
    };

    let leaders: Vec<PlayerId> = tally
        .iter()
        .filter(|(_, count)| **count == max)
        .map(|(target, _)| *target)
        .collect();

    let eliminated = match leaders.as_slice() {
        [target] => roster
            .get_mut(*target)
            .filter(|p| p.is_alive())
            .map(|p| {
                p.eliminate();
                p.id
            }),
        _ => None,
    };

    DayOutcome {
        eliminated,
        tie: leaders.len() > 1,
        tally,
    }
}
