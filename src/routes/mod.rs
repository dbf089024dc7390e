mod content;
mod health;
mod screens;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router: the screen socket plus the admin
/// API that publishes into it.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ws", get(crate::gateway::ws_upgrade))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/version", get(health::version))
        // Screens
        .route(
            "/screens",
            get(screens::list_screens).post(screens::register_screen),
        )
        // Content
        .route("/save-content", post(content::save_content))
        .route("/contents", get(content::list_contents))
        .route(
            "/contents/{content_id}",
            put(content::update_content).delete(content::delete_content),
        )
}
