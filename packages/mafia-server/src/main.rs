use axum::http::{self, HeaderValue, Method};
use dotenvy::dotenv;
use env_logger::Builder;
use log::LevelFilter;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use mafia_server::{app, models::config::GameConfig, state::AppState, utils::config::CONFIG};

// ログ設定
fn init_logger() {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .filter_module("tower_http", LevelFilter::Debug)
        .filter_module("axum", LevelFilter::Debug)
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .format_target(true)
        .parse_env("RUST_LOG")
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 環境変数をロード
    if let Err(e) = dotenv() {
        eprintln!("Warning: could not load .env: {}", e);
    }

    init_logger();

    let game_config = GameConfig::from_env();
    log::info!(
        "Night lasts {}s, day lasts {}s, auto advance: {}",
        game_config.night_duration_seconds,
        game_config.day_duration_seconds,
        game_config.auto_advance_phases
    );
    let state = AppState::with_config(game_config);

    // CORSレイヤーの設定
    let origin = CONFIG.cors_origin.parse::<HeaderValue>()?;
    let cors = CorsLayer::new()
        .allow_origin([origin])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);

    let app = app::create_app_with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
                tracing::info_span!(
                    "HTTP request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        );

    // サーバーの起動
    let addr = CONFIG.server_addr;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Mafia server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
