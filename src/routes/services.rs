// src/routes/services.rs

use axum::{extract::{Path, Query, State}, Json};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::catalog::Quote;
use crate::error::BookingError;
use crate::models::{Review, Service};
use crate::workflow::reviews::{self, RatingSummary};
use crate::AppState;
use super::domain_error;

#[derive(Deserialize)]
pub struct QuoteQ {
    pub features: Option<String>, // comma separated
}

#[derive(Serialize)]
pub struct ServiceReviews {
    pub summary: RatingSummary,
    pub reviews: Vec<Review>,
}

fn lookup<'a>(state: &'a AppState, id: &str) -> Result<&'a Service, (StatusCode, String)> {
    state
        .catalog
        .find(id)
        .ok_or_else(|| domain_error(BookingError::not_found("service", id)))
}

pub async fn list_services(State(state): State<AppState>) -> Json<Vec<Service>> {
    Json(state.catalog.all().to_vec())
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Service>, (StatusCode, String)> {
    Ok(Json(lookup(&state, &id)?.clone()))
}

/// GET /api/v1/services/:id/quote?features=seo,cms
pub async fn quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<QuoteQ>,
) -> Result<Json<Quote>, (StatusCode, String)> {
    let service = lookup(&state, &id)?;
    let selected: Vec<&str> = q
        .features
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    Ok(Json(service.quote(&selected)))
}

pub async fn service_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceReviews>, (StatusCode, String)> {
    lookup(&state, &id)?;
    let out = state
        .db
        .read(|s| ServiceReviews {
            summary: reviews::summary(s, &id),
            reviews: reviews::for_service(s, &id).into_iter().cloned().collect(),
        })
        .await;
    Ok(Json(out))
}
