// src/lib.rs

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod mailer;
pub mod models;
pub mod routes;
pub mod workflow;

use catalog::Catalog;
use db::Db;
use mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub catalog: Arc<Catalog>,
    pub mailer: Arc<dyn Mailer>,
}

pub fn build_router(state: AppState) -> Router {
    // Very permissive CORS for local dev (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // health
        .route("/health", get(routes::health::health))
        // catalog
        .route("/api/v1/services", get(routes::services::list_services))
        .route("/api/v1/services/:id", get(routes::services::get_service))
        .route("/api/v1/services/:id/quote", get(routes::services::quote))
        .route("/api/v1/services/:id/reviews", get(routes::services::service_reviews))
        // users
        .route(
            "/api/v1/users",
            post(routes::users::create_user).get(routes::users::list_users),
        )
        .route("/api/v1/users/:id", get(routes::users::get_user))
        // notifications
        .route(
            "/api/v1/users/:id/notifications",
            get(routes::notifications::list_for_user)
                .delete(routes::notifications::clear_for_user),
        )
        .route(
            "/api/v1/notifications/:id/read",
            post(routes::notifications::mark_read),
        )
        // bookings
        .route(
            "/api/v1/bookings",
            post(routes::bookings::create_booking).get(routes::bookings::list_bookings),
        )
        .route(
            "/api/v1/bookings/:id",
            get(routes::bookings::get_booking).patch(routes::bookings::patch_booking),
        )
        .route(
            "/api/v1/bookings/:id/transition",
            post(routes::bookings::transition_booking),
        )
        .route("/api/v1/bookings/:id/messages", post(routes::bookings::post_message))
        .route("/api/v1/bookings/:id/assign", post(routes::bookings::assign_team))
        .route("/api/v1/bookings/:id/invoice", get(routes::bookings::invoice))
        .route(
            "/api/v1/bookings/:id/review",
            get(routes::bookings::get_review).post(routes::bookings::post_review),
        )
        // teams
        .route("/api/v1/teams", get(routes::teams::list_teams))
        .route("/api/v1/teams/:id/free", post(routes::teams::free_team))
        // reports
        .route("/api/v1/reports/dashboard", get(routes::reports::dashboard))
        // outbound mail stub
        .route("/api/email", post(routes::email::send_email))
        // state & middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
