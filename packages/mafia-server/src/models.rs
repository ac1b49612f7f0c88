pub mod chat;
pub mod command;
pub mod config;
pub mod error;
pub mod game;
pub mod ledger;
pub mod outcome;
pub mod player;
pub mod role;
pub mod room;
pub mod roster;
