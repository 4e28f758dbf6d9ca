// src/routes/notifications.rs

use axum::{extract::{Path, State}, Json};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::models::{Notification, NotificationFeed};
use crate::workflow::notifications;
use crate::AppState;
use super::domain_error;

/// GET /api/v1/users/:id/notifications
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Json<NotificationFeed> {
    Json(state.db.read(|s| notifications::for_user(s, user_id)).await)
}

/// DELETE /api/v1/users/:id/notifications
pub async fn clear_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let removed = state
        .db
        .mutate(|s| Ok(notifications::clear_for_user(s, user_id)))
        .await
        .map_err(domain_error)?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

/// POST /api/v1/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, (StatusCode, String)> {
    let n = state.db.mutate(|s| notifications::mark_read(s, id)).await.map_err(domain_error)?;
    Ok(Json(n))
}
