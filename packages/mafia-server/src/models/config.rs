use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub night_duration_seconds: u64,
    pub day_duration_seconds: u64,
    // 全員が行動したらフェーズを自動で進めるかどうか
    pub auto_advance_phases: bool,
    // プレイヤーの役職を状態APIで表示するかどうか
    pub show_player_roles: bool,
    // 固定シードで役職を割り当てる（テスト・デバッグ用）
    pub random_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let debug_mode = cfg!(debug_assertions) || env::var("DEBUG_MODE").is_ok();

        Self {
            night_duration_seconds: 60,
            day_duration_seconds: 90,
            auto_advance_phases: true,
            show_player_roles: debug_mode,
            random_seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let night_duration_seconds = env::var("MAFIA_NIGHT_DURATION_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.night_duration_seconds);
        let day_duration_seconds = env::var("MAFIA_DAY_DURATION_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.day_duration_seconds);
        let auto_advance_phases = env::var("MAFIA_AUTO_ADVANCE_PHASES")
            .map(|v| v == "true")
            .unwrap_or(defaults.auto_advance_phases);
        let show_player_roles = env::var("MAFIA_SHOW_PLAYER_ROLES")
            .map(|v| v == "true")
            .unwrap_or(defaults.show_player_roles);
        let random_seed = env::var("MAFIA_RANDOM_SEED")
            .ok()
            .and_then(|v| v.parse::<u64>().ok());

        Self {
            night_duration_seconds,
            day_duration_seconds,
            auto_advance_phases,
            show_player_roles,
            random_seed,
        }
    }

    pub fn night_duration(&self) -> Duration {
        Duration::from_secs(self.night_duration_seconds)
    }

    pub fn day_duration(&self) -> Duration {
        Duration::from_secs(self.day_duration_seconds)
    }
}
