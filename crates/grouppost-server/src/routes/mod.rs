pub mod api_routes;
pub mod auth_routes;

use std::path::Path;

use crate::state::SharedState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub fn app(state: SharedState, static_dir: impl AsRef<Path>) -> Router {
    let auth = Router::new()
        .route("/login", get(auth_routes::login))
        .route("/code", get(auth_routes::code))
        .route("/me", get(auth_routes::me));

    let api = Router::new()
        .route("/groups", get(api_routes::list_groups))
        .route("/create", post(api_routes::create_post))
        .route("/publish", post(api_routes::start_publish))
        .route("/publish/{publish_id}", get(api_routes::publish_status));

    // Top-level: health at root, OAuth under /auth, JSON under /api, client for everything else
    let static_dir = static_dir.as_ref();
    Router::new()
        .route("/health", get(health_handler))
        .nest("/auth", auth)
        .nest("/api", api)
        .with_state(state)
        .fallback_service(
            ServeDir::new(static_dir).not_found_service(ServeFile::new(static_dir.join("index.html"))),
        )
        .layer(TraceLayer::new_for_http())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "grouppost"
    }))
}
