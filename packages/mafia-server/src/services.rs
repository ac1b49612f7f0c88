pub mod announcer;
pub mod game_service;
pub mod night_resolution;
pub mod role_assignment;
pub mod room_service;
pub mod scheduler;
pub mod vote_resolution;
pub mod winning_judgement;
