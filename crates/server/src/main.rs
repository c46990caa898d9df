use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use cadara_studio::challenge::ChallengeCatalog;
use cadara_studio::chat::{ChatConfig, ChatService, HttpBackend};
use cadara_studio::tracking::UserProgress;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

mod routes;

const DEFAULT_ADDR: &str = "0.0.0.0:3001";

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService<HttpBackend>>,
    pub catalog: Arc<ChallengeCatalog>,
    /// Progress per user id, kept in memory only
    pub progress: Arc<RwLock<HashMap<String, UserProgress>>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/chat", post(routes::chat))
        .route("/api/chat/status", get(routes::chat_status))
        .route("/api/challenges", get(routes::list_challenges))
        .route("/api/challenges/{id}", get(routes::get_challenge))
        .route("/api/challenges/{id}/check", post(routes::check_challenge))
        .route("/api/progress/{user}", get(routes::get_progress))
        .route(
            "/api/progress/{user}/challenges/{id}",
            post(routes::complete_challenge),
        )
        .route(
            "/api/progress/{user}/tutorials/{id}",
            post(routes::complete_tutorial),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,cadara_studio=info".into()),
        )
        .init();

    let state = AppState {
        chat: Arc::new(ChatService::new(ChatConfig::load(), HttpBackend::new())),
        catalog: Arc::new(ChallengeCatalog::builtin()),
        progress: Arc::new(RwLock::new(HashMap::new())),
    };

    let addr = std::env::var("CADARA_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            return;
        }
    };
    tracing::info!("Server running on http://{addr}");
    if let Err(e) = axum::serve(listener, router(state)).await {
        tracing::error!("Server error: {e}");
    }
}
