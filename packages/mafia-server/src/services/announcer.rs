use crate::models::{
    chat::ChatMessage,
    game::Game,
    outcome::{DayOutcome, Investigation, NightOutcome, Verdict},
    player::PlayerId,
};

fn name_of(game: &Game, id: PlayerId) -> String {
    game.player(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("Player {}", id))
}

fn investigation_line(game: &Game, investigation: &Investigation) -> String {
    let name = name_of(game, investigation.target);
    if investigation.is_mafia {
        format!("🔴 {} is the mafia!", name)
    } else {
        format!("🟢 {} is a civilian", name)
    }
}

pub fn lobby_help(room_id: &str) -> ChatMessage {
    ChatMessage::broadcast(
        room_id,
        "🎮 Mafia\n\n▫️ /join - Join the game\n▫️ /start - Start the game",
    )
}

pub fn joined(room_id: &str, name: &str) -> ChatMessage {
    ChatMessage::broadcast(room_id, format!("✅ {} joined!", name))
}

pub fn role_cards(game: &Game) -> Vec<ChatMessage> {
    game.roster()
        .iter()
        .map(|p| {
            ChatMessage::private(
                &game.room_id,
                p.id,
                format!(
                    "🎭 Your role: {}\n\n{}",
                    p.role(),
                    p.role().description()
                ),
            )
        })
        .collect()
}

pub fn night_started(game: &Game, seconds: u64) -> Vec<ChatMessage> {
    let alive = game.roster().alive_names();
    let mut messages = vec![ChatMessage::broadcast(
        &game.room_id,
        format!(
            "🌙 Night {} has begun! You have {} seconds.\nAlive players:\n{}",
            game.round(),
            seconds,
            alive
        ),
    )];
    messages.extend(game.roster().alive().filter_map(|p| {
        p.role()
            .night_action()
            .map(|kind| ChatMessage::private(&game.room_id, p.id, kind.instruction()))
    }));
    messages
}

pub fn night_summary(game: &Game, outcome: &NightOutcome) -> Vec<ChatMessage> {
    let mut summary = String::from("🌃 Last night:\n");
    match outcome.killed {
        Some(id) => summary.push_str(&format!("☠️ Killed: {}", name_of(game, id))),
        None => summary.push_str("Nobody died."),
    }

    let mut messages = vec![ChatMessage::broadcast(&game.room_id, summary)];
    if let Some(id) = outcome.killed {
        messages.push(ChatMessage::private(
            &game.room_id,
            id,
            "☠️ You were killed during the night. You are out of the game.",
        ));
    }
    if let Some(id) = outcome.saved {
        messages.push(ChatMessage::private(
            &game.room_id,
            id,
            "💉 The doctor saved you tonight.",
        ));
    }
    let private_results = outcome.investigations.iter().filter(|(id, _)| {
        game.player(**id)
            .is_some_and(|p| p.role().has_private_result())
    });
    for (investigator, investigation) in private_results {
        messages.push(ChatMessage::private(
            &game.room_id,
            *investigator,
            investigation_line(game, investigation),
        ));
    }
    messages
}

pub fn day_started(game: &Game, seconds: u64) -> ChatMessage {
    ChatMessage::broadcast(
        &game.room_id,
        format!(
            "☀️ Day {} has begun! Discuss and vote ({} seconds): /vote [name]\n{}",
            game.round(),
            seconds,
            game.roster().alive_names()
        ),
    )
}

pub fn day_summary(game: &Game, outcome: &DayOutcome) -> Vec<ChatMessage> {
    let tally = outcome
        .tally
        .iter()
        .map(|(id, count)| format!("{}: {}", name_of(game, *id), count))
        .collect::<Vec<_>>()
        .join("\n");

    let headline = match (outcome.eliminated, outcome.tie) {
        (Some(id), _) => format!("☠️ Lynched today: {}", name_of(game, id)),
        (None, true) => "⚖️ The vote is tied. Nobody is lynched.".to_string(),
        (None, false) => "Nobody voted. Nobody is lynched.".to_string(),
    };
    let text = if tally.is_empty() {
        headline
    } else {
        format!("{}\n\nVotes:\n{}", headline, tally)
    };

    let mut messages = vec![ChatMessage::broadcast(&game.room_id, text)];
    if let Some(id) = outcome.eliminated {
        messages.push(ChatMessage::private(
            &game.room_id,
            id,
            "☠️ You were lynched. You are out of the game.",
        ));
    }
    messages
}

pub fn revealed(game: &Game, investigator: PlayerId, investigation: &Investigation) -> ChatMessage {
    ChatMessage::broadcast(
        &game.room_id,
        format!(
            "🕵️ {} reveals they are the investigator: {}",
            name_of(game, investigator),
            investigation_line(game, investigation)
        ),
    )
}

pub fn game_over(game: &Game, verdict: Verdict) -> ChatMessage {
    let roles = game
        .roster()
        .iter()
        .map(|p| format!("{} - {}", p.name, p.role()))
        .collect::<Vec<_>>()
        .join("\n");
    ChatMessage::broadcast(
        &game.room_id,
        format!("🏁 Game over! {}\n\n{}", verdict, roles),
    )
}

pub fn rejection(room_id: &str, player_id: PlayerId, reason: &str) -> ChatMessage {
    ChatMessage::private(room_id, player_id, format!("⛔ {}", reason))
}
