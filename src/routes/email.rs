// src/routes/email.rs

use axum::{extract::State, Json};

use crate::mailer::{EmailAck, EmailRequest};
use crate::AppState;

/// POST /api/email
pub async fn send_email(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> Json<EmailAck> {
    Json(state.mailer.send(&body))
}
