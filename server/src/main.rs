use std::sync::Arc;

use server::bot::{MovePicker, RandomPicker, ScriptedPicker};
use server::config::ServerConfig;
use server::routes;
use server::state::AppState;
use server::store::LeaderboardStore;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env().expect("invalid server configuration");

    let bot: Arc<dyn MovePicker> = match config.bot_script.clone() {
        Some(script) => {
            tracing::warn!(moves = script.len(), "BOT_MOVES set, bot plays a fixed script");
            Arc::new(ScriptedPicker::new(script))
        }
        None => Arc::new(RandomPicker),
    };

    let store = LeaderboardStore::new(&config.leaderboard_file);
    let state = AppState::new(store, bot, config.leaderboard_limit);

    let app = routes::app(state, config.static_dir.as_deref());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(
        port = config.port,
        leaderboard = %config.leaderboard_file.display(),
        "rps server listening"
    );
    axum::serve(listener, app).await.expect("server failed");
}
