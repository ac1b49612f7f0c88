use crate::models::{
    ledger::{NightAction, NightLedger},
    outcome::{Investigation, NightOutcome},
    player::PlayerId,
    role::NightActionKind,
    roster::Roster,
};

/// Applies one night's actions to the roster.
///
/// The kill goes through unless the doctor protected the same player.
/// Investigations never affect survival. When several living players share a
/// role, the action of the lowest actor id is the one that counts.
pub fn resolve_night(roster: &mut Roster, ledger: &NightLedger) -> NightOutcome {
    let kill = chosen_target(roster, ledger, NightActionKind::Kill);
    let save = chosen_target(roster, ledger, NightActionKind::Save);

    let mut outcome = NightOutcome {
        investigations: investigations(roster, ledger),
        ..Default::default()
    };

    match (kill, save) {
        (Some(target), Some(protected)) if target == protected => {
            outcome.saved = Some(protected);
        }
        (Some(target), _) => {
            if let Some(victim) = roster.get_mut(target).filter(|p| p.is_alive()) {
                victim.eliminate();
                outcome.killed = Some(target);
            }
        }
        _ => {}
    }

    outcome
}

/// Whether `actor` is alive and holds the role that owns `kind`.
fn may_act(roster: &Roster, actor: PlayerId, kind: NightActionKind) -> bool {
    roster
        .get(actor)
        .map(|p| p.is_alive() && p.role() == kind.role())
        .unwrap_or(false)
}

fn eligible<'a>(
    roster: &'a Roster,
    ledger: &'a NightLedger,
    kind: NightActionKind,
) -> impl Iterator<Item = (PlayerId, &'a NightAction)> + 'a {
    ledger
        .iter()
        .filter(move |(actor, action)| action.kind == kind && may_act(roster, *actor, kind))
}

fn chosen_target(roster: &Roster, ledger: &NightLedger, kind: NightActionKind) -> Option<PlayerId> {
    eligible(roster, ledger, kind)
        .next()
        .map(|(_, action)| action.target)
}

fn investigations(
    roster: &Roster,
    ledger: &NightLedger,
) -> std::collections::BTreeMap<PlayerId, Investigation> {
    eligible(roster, ledger, NightActionKind::Check)
        .filter_map(|(actor, action)| {
            roster.get(action.target).map(|target| {
                (
                    actor,
                    Investigation {
                        target: target.id,
                        is_mafia: target.is_mafia(),
                    },
                )
            })
        })
        .collect()
}
