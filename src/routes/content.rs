use axum::extract::{Path, Query, State};
use axum::Json;

use crate::db;
use crate::error::AppError;
use crate::gateway::events::Event;
use crate::models::content::{ContentQuery, SaveContent, UpdateContent};
use crate::state::AppState;

const INVALID_DATA: &str = "Invalid data. Expected a non-empty string.";

fn require_data(data: Option<&serde_json::Value>) -> Result<&str, AppError> {
    data.and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(INVALID_DATA.to_string()))
}

pub async fn save_content(
    State(state): State<AppState>,
    Json(input): Json<SaveContent>,
) -> Result<Json<serde_json::Value>, AppError> {
    let data = require_data(input.data.as_ref())?;
    let screen_id = input
        .screen_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("screenId is required".to_string()))?;

    db::screens::get_screen(&state.db, screen_id).await?;
    let content = db::content::create_content(&state.db, screen_id, data).await?;

    state.dispatcher.publish(&Event::ContentCreated {
        id: content.id,
        screen_id: content.screen_id.clone(),
        data: content.data.clone(),
    });

    Ok(Json(serde_json::json!({
        "data": content,
        "message": "Content saved successfully."
    })))
}

pub async fn list_contents(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let screen_id = query.screen_id.as_deref().map(str::trim);
    let contents = db::content::list_content(&state.db, screen_id).await?;
    Ok(Json(serde_json::json!({ "data": contents })))
}

pub async fn update_content(
    State(state): State<AppState>,
    Path(content_id): Path<i64>,
    Json(input): Json<UpdateContent>,
) -> Result<Json<serde_json::Value>, AppError> {
    let data = require_data(input.data.as_ref())?;
    let content = db::content::update_content(&state.db, content_id, data).await?;

    state.dispatcher.publish(&Event::ContentUpdated {
        id: content.id,
        screen_id: content.screen_id.clone(),
        data: content.data.clone(),
    });

    Ok(Json(serde_json::json!({
        "data": content,
        "message": "Content updated successfully."
    })))
}

pub async fn delete_content(
    State(state): State<AppState>,
    Path(content_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let content = db::content::delete_content(&state.db, content_id).await?;

    state.dispatcher.publish(&Event::ContentDeleted {
        id: content.id,
        screen_id: content.screen_id,
    });

    Ok(Json(serde_json::json!({
        "data": { "id": content_id },
        "message": "Content deleted successfully."
    })))
}
