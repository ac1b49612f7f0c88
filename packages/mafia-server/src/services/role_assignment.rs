use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{error::GameError, role::Role, roster::Roster};

pub const MIN_PLAYERS: usize = 4;

/// Roles handed out to the first positions of the shuffled order.
const SPECIAL_ROLES: [Role; 3] = [Role::Mafia, Role::Doctor, Role::Investigator];

/// Gives every player a role.
///
/// The roster is walked in a uniformly random order (Fisher-Yates through
/// `SliceRandom::shuffle`): the first player drawn is the Mafia, the second the
/// Doctor, the third the Investigator and everybody else a Civilian. The roster's
/// own join order is left untouched.
pub fn assign_roles<R: Rng + ?Sized>(roster: &mut Roster, rng: &mut R) -> Result<(), GameError> {
    if roster.len() < MIN_PLAYERS {
        return Err(GameError::InsufficientPlayers {
            required: MIN_PLAYERS,
            found: roster.len(),
        });
    }

    let mut order: Vec<usize> = (0..roster.len()).collect();
    order.shuffle(rng);

    let players = roster.players_mut();
    for (position, index) in order.into_iter().enumerate() {
        let role = SPECIAL_ROLES
            .get(position)
            .copied()
            .unwrap_or(Role::Civilian);
        players[index].assign_role(role);
    }
    Ok(())
}
