use once_cell::sync::Lazy;
use std::env;
use std::net::SocketAddr;

pub static CONFIG: Lazy<Config> = Lazy::new(Config::new);

const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Process-level settings. Game rules live in `models::config::GameConfig`.
pub struct Config {
    pub server_addr: SocketAddr,
    pub cors_origin: String,
    /// Signs the player tokens handed out at join.
    pub jwt_secret: String,
}

impl Config {
    fn new() -> Self {
        Self {
            server_addr: parse_addr(env::var("SERVER_ADDR").ok()),
            cors_origin: env::var("CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // 再起動すると発行済みトークンは無効になる
                log::warn!("JWT_SECRET is not set, using a random secret for this process");
                uuid::Uuid::new_v4().simple().to_string()
            }),
        }
    }
}

fn parse_addr(raw: Option<String>) -> SocketAddr {
    let fallback = SocketAddr::from(([127, 0, 0, 1], 8080));
    match raw {
        None => fallback,
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            log::warn!(
                "SERVER_ADDR '{}' is invalid ({}), using {}",
                raw,
                e,
                DEFAULT_SERVER_ADDR
            );
            fallback
        }),
    }
}
