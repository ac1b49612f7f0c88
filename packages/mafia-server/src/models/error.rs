use super::game::GamePhase;
use super::player::PlayerId;
use super::role::Role;

/// Rejections produced by the game engine.
///
/// None of these change session state; they are reported back to the player
/// who issued the command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("The game has already started!")]
    AlreadyStarted,
    #[error("Player {0} is already in the game!")]
    DuplicateIdentity(PlayerId),
    #[error("At least {required} players are needed, only {found} joined")]
    InsufficientPlayers { required: usize, found: usize },
    #[error("Only the lobby creator can do that!")]
    Unauthorized,
    #[error("That is not possible during the {0} phase")]
    InvalidPhase(GamePhase),
    #[error("Player '{0}' not found!")]
    UnknownTarget(String),
    #[error("Player {0} is not part of this game")]
    UnknownActor(PlayerId),
    #[error("Dead players cannot act")]
    DeadActor,
    #[error("Player '{0}' is already dead!")]
    DeadTarget(String),
    #[error("A {role} cannot {action}!")]
    WrongRole { role: Role, action: &'static str },
    #[error("There is no investigation result to reveal")]
    NothingToReveal,
}
