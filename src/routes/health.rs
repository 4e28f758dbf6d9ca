// src/routes/health.rs

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResp {
    pub status: &'static str,
    pub version: &'static str,
    pub durable: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResp> {
    Json(HealthResp { status: "ok", version: "v1", durable: state.db.is_durable() })
}
