// src/routes/users.rs

use axum::{extract::{Path, Query, State}, Json};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Role, User};
use crate::workflow::users::{self, NewUser};
use crate::AppState;
use super::domain_error;

#[derive(Deserialize)]
pub struct ListUsersQ {
    pub role: Option<Role>,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(b): Json<NewUser>,
) -> Result<Json<User>, (StatusCode, String)> {
    let user = state.db.mutate(|s| users::register(s, b)).await.map_err(domain_error)?;
    Ok(Json(user))
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(q): Query<ListUsersQ>,
) -> Json<Vec<User>> {
    let rows = state
        .db
        .read(|s| {
            s.users
                .iter()
                .filter(|u| q.role.map_or(true, |r| u.role == r))
                .cloned()
                .collect()
        })
        .await;
    Json(rows)
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, (StatusCode, String)> {
    let user = state.db.read(|s| s.user(id).cloned()).await.map_err(domain_error)?;
    Ok(Json(user))
}
