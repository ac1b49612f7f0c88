use dotenvy::dotenv;
use std::sync::Once;

static INIT: Once = Once::new();

/// Loads `.env` and fills in short phase timers for tests.
pub fn setup_test_env() {
    INIT.call_once(|| {
        dotenv().ok();
        // .envファイルが存在しない場合のデフォルト値
        if std::env::var("MAFIA_NIGHT_DURATION_SECONDS").is_err() {
            std::env::set_var("MAFIA_NIGHT_DURATION_SECONDS", "5");
        }
        if std::env::var("MAFIA_DAY_DURATION_SECONDS").is_err() {
            std::env::set_var("MAFIA_DAY_DURATION_SECONDS", "5");
        }
        if std::env::var("JWT_SECRET").is_err() {
            std::env::set_var("JWT_SECRET", "test-jwt-secret");
        }
        if std::env::var("SERVER_ADDR").is_err() {
            std::env::set_var("SERVER_ADDR", "127.0.0.1:0");
        }
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
