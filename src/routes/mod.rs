//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API used by the page and the chat widget:
//! the login gate, the chat relay and the embed config. When `STATIC_DIR`
//! is configured, every other path falls through to the page assets.

pub mod auth;
pub mod chat;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::{self, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any);

    let mut router = Router::new()
        .route("/api/auth", post(auth::login))
        .route("/api/chat", post(chat::chat))
        .route("/api/embed", get(embed))
        .route("/healthz", get(healthz));

    if let Some(dir) = &state.config.static_dir {
        router = router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub url: Option<String>,
}

/// `GET /api/embed`: public URL of the embedded page, `null` if unset.
async fn embed(State(state): State<AppState>) -> Json<EmbedResponse> {
    Json(EmbedResponse { url: state.config.embed_url.clone() })
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
