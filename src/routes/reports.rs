// src/routes/reports.rs

use axum::{extract::State, Json};

use crate::workflow::reports::{self, DashboardStats};
use crate::AppState;

/// GET /api/v1/reports/dashboard
pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardStats> {
    let catalog = state.catalog.clone();
    Json(state.db.read(|s| reports::dashboard(s, &catalog)).await)
}
