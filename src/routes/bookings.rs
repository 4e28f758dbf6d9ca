// src/routes/bookings.rs

use axum::{extract::{Path, Query, State}, Json};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::BookingError;
use crate::models::{BookingStatus, BookingView, Review, Sender};
use crate::workflow::bookings::{self, BookingPatch, NewBooking, SortOrder};
use crate::workflow::reviews::{self, NewReview};
use crate::workflow::transitions::{self, Action};
use crate::workflow::{reports, teams};
use crate::AppState;
use super::domain_error;

// ─────────────────────────────────────────────────────────────────────────────
// Request bodies
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateBookingBody {
    pub client_id: Uuid,
    pub service_id: String,
    #[serde(default)]
    pub selected_features: Vec<String>,
    pub project_details: String,
    pub budget_range: String,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Deserialize)]
pub struct ListBookingsQ {
    pub status: Option<BookingStatus>,
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Deserialize)]
pub struct TransitionBody {
    pub action: Action,
    pub expected_version: Option<u64>,
}

#[derive(Deserialize)]
pub struct MessageBody {
    pub sender: Sender,
    pub message: String,
}

#[derive(Deserialize)]
pub struct AssignBody {
    pub team_id: String,
    pub expected_version: Option<u64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    Json(b): Json<CreateBookingBody>,
) -> Result<Json<BookingView>, (StatusCode, String)> {
    let catalog = state.catalog.clone();
    let mailer = state.mailer.clone();
    let booking = state
        .db
        .mutate(|s| {
            // denormalized copies of the client taken now
            let client = s.user(b.client_id)?;
            let new = NewBooking {
                client_id: client.user_id,
                client_name: client.name.clone(),
                client_email: client.email.clone(),
                service_id: b.service_id,
                selected_features: b.selected_features,
                project_details: b.project_details,
                budget_range: b.budget_range,
                attachments: b.attachments,
            };
            bookings::create(s, &catalog, mailer.as_ref(), new)
        })
        .await
        .map_err(domain_error)?;
    Ok(Json(booking.into()))
}

/// GET /api/v1/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(q): Query<ListBookingsQ>,
) -> Json<Vec<BookingView>> {
    let mut rows = state
        .db
        .read(|s| match (q.status, q.client_id) {
            (Some(status), Some(client)) => bookings::find_by_client(s, client)
                .into_iter()
                .filter(|b| b.status == status)
                .collect(),
            (Some(status), None) => bookings::filter_by_status(s, status),
            (None, Some(client)) => bookings::find_by_client(s, client),
            (None, None) => bookings::all(s),
        })
        .await;
    bookings::sort(&mut rows, q.sort);
    Json(rows.into_iter().map(BookingView::from).collect())
}

/// GET /api/v1/bookings/:id
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, (StatusCode, String)> {
    let booking = state.db.read(|s| bookings::find_by_id(s, id)).await.map_err(domain_error)?;
    Ok(Json(booking.into()))
}

/// PATCH /api/v1/bookings/:id
pub async fn patch_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<BookingPatch>,
) -> Result<Json<BookingView>, (StatusCode, String)> {
    let booking = state
        .db
        .mutate(|s| bookings::update(s, id, patch))
        .await
        .map_err(domain_error)?;
    Ok(Json(booking.into()))
}

/// POST /api/v1/bookings/:id/transition
pub async fn transition_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(b): Json<TransitionBody>,
) -> Result<Json<BookingView>, (StatusCode, String)> {
    let mailer = state.mailer.clone();
    let booking = state
        .db
        .mutate(|s| transitions::apply(s, mailer.as_ref(), id, b.action, b.expected_version))
        .await
        .map_err(domain_error)?;
    Ok(Json(booking.into()))
}

/// POST /api/v1/bookings/:id/messages
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(b): Json<MessageBody>,
) -> Result<Json<BookingView>, (StatusCode, String)> {
    let booking = state
        .db
        .mutate(|s| bookings::append_message(s, id, b.sender, &b.message))
        .await
        .map_err(domain_error)?;
    Ok(Json(booking.into()))
}

/// POST /api/v1/bookings/:id/assign
pub async fn assign_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(b): Json<AssignBody>,
) -> Result<Json<BookingView>, (StatusCode, String)> {
    let booking = state
        .db
        .mutate(|s| teams::assign(s, id, &b.team_id, b.expected_version))
        .await
        .map_err(domain_error)?;
    Ok(Json(booking.into()))
}

/// GET /api/v1/bookings/:id/invoice
pub async fn invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let catalog = state.catalog.clone();
    let text = state
        .db
        .read(|s| bookings::find_by_id(s, id).map(|b| reports::invoice(&b, &catalog)))
        .await
        .map_err(domain_error)?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

/// GET /api/v1/bookings/:id/review
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Review>, (StatusCode, String)> {
    let review = state
        .db
        .read(|s| {
            s.booking(id)?;
            reviews::for_booking(s, id)
                .cloned()
                .ok_or_else(|| BookingError::not_found("review", id))
        })
        .await
        .map_err(domain_error)?;
    Ok(Json(review))
}

/// POST /api/v1/bookings/:id/review
pub async fn post_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(b): Json<NewReview>,
) -> Result<Json<Review>, (StatusCode, String)> {
    let review = state.db.mutate(|s| reviews::submit(s, id, b)).await.map_err(domain_error)?;
    Ok(Json(review))
}
