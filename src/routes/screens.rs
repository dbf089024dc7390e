use axum::extract::State;
use axum::Json;

use crate::db;
use crate::error::AppError;
use crate::gateway::events::Event;
use crate::models::screen::{RegisterScreen, ScreenStatus};
use crate::state::AppState;

pub async fn list_screens(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let screens: Vec<ScreenStatus> = db::screens::list_screens(&state.db)
        .await?
        .into_iter()
        .map(|screen| ScreenStatus {
            connected: state
                .registry
                .lookup(&screen.id)
                .is_some_and(|conn| conn.is_open()),
            id: screen.id,
            created_at: screen.created_at,
        })
        .collect();
    Ok(Json(serde_json::json!({ "data": screens })))
}

pub async fn register_screen(
    State(state): State<AppState>,
    Json(input): Json<RegisterScreen>,
) -> Result<Json<serde_json::Value>, AppError> {
    let screen_id = input
        .screen_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("screenId is required".to_string()))?;

    let screen = db::screens::create_screen(&state.db, screen_id)
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("screen {screen_id} is already registered"))
            }
            other => other,
        })?;

    state.dispatcher.publish(&Event::ScreenRegistered {
        screen_id: screen.id.clone(),
    });

    Ok(Json(serde_json::json!({
        "data": screen,
        "message": "Screen registered successfully."
    })))
}
