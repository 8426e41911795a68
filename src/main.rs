use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spyfall::{api, llm, state::AppState, ws};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spyfall=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Spyfall backend...");

    let hint_config = llm::HintConfig::from_env();
    let hints = match hint_config.build_generator() {
        Ok(generator) => {
            tracing::info!("Hint provider initialized");
            Some(generator)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to initialize a hint provider: {}. Chat hints will not be available.",
                e
            );
            None
        }
    };

    let state = AppState::new_with_hints(hints);

    let app = Router::new()
        .route("/api/health", get(api::health))
        .route("/api/game/create", post(api::create_game))
        .route("/api/game/{game_id}", get(api::get_state))
        .route("/api/game/{game_id}/join", post(api::join_game))
        .route("/api/game/{game_id}/start", post(api::start_game))
        .route("/api/game/{game_id}/message", post(api::post_message))
        .route("/api/game/{game_id}/vote", post(api::vote))
        .route("/api/game/{game_id}/ws", get(ws::ws_handler))
        .route("/api/stats/{player_name}", get(api::player_stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8787));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
