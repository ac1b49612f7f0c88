use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::role::NightActionKind;

/// A chat command as typed by a player, e.g. `/kill bob` or `/vote@MafiaBot alice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    New,
    Join,
    Start,
    NightAction { kind: NightActionKind, target: String },
    Vote { target: String },
    Reveal,
    Players,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Wrong format! Use: {0} [name]")]
    MissingTarget(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let (head, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        // Group chats address bots as `/command@BotName`.
        let name = head.split('@').next().unwrap_or(head).to_lowercase();
        let target = rest.trim();

        let with_target = |usage: &'static str| {
            if target.is_empty() {
                Err(CommandError::MissingTarget(usage))
            } else {
                Ok(target.to_string())
            }
        };

        match name.as_str() {
            "/new" => Ok(Command::New),
            "/join" => Ok(Command::Join),
            "/start" => Ok(Command::Start),
            "/kill" | "/save" | "/check" => {
                let kind = match name.as_str() {
                    "/kill" => NightActionKind::Kill,
                    "/save" => NightActionKind::Save,
                    _ => NightActionKind::Check,
                };
                Ok(Command::NightAction {
                    kind,
                    target: with_target(kind.command())?,
                })
            }
            "/vote" => Ok(Command::Vote {
                target: with_target("/vote")?,
            }),
            "/reveal" => Ok(Command::Reveal),
            "/players" => Ok(Command::Players),
            "/reset" => Ok(Command::Reset),
            _ => Err(CommandError::Unknown(head.to_string())),
        }
    }
}
