// src/routes/teams.rs

use axum::{extract::{Path, Query, State}, Json};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::models::{Team, TeamStatus};
use crate::workflow::teams;
use crate::AppState;
use super::domain_error;

#[derive(Deserialize)]
pub struct ListTeamsQ {
    pub status: Option<TeamStatus>,
}

/// GET /api/v1/teams?status=free
pub async fn list_teams(
    State(state): State<AppState>,
    Query(q): Query<ListTeamsQ>,
) -> Json<Vec<Team>> {
    let rows = state
        .db
        .read(|s| {
            s.teams
                .iter()
                .filter(|t| q.status.map_or(true, |st| t.status == st))
                .cloned()
                .collect()
        })
        .await;
    Json(rows)
}

/// POST /api/v1/teams/:id/free
pub async fn free_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Team>, (StatusCode, String)> {
    let team = state.db.mutate(|s| teams::free(s, &id)).await.map_err(domain_error)?;
    Ok(Json(team))
}
