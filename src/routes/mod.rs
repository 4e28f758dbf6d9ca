use axum::http::StatusCode;

use crate::error::BookingError;

pub mod bookings;
pub mod email;
pub mod health;
pub mod notifications;
pub mod reports;
pub mod services;
pub mod teams;
pub mod users;

// Common error mappers
pub fn internal_error<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("internal error: {e}"))
}

pub fn domain_error(e: BookingError) -> (StatusCode, String) {
    let status = match &e {
        BookingError::NotFound { .. } => StatusCode::NOT_FOUND,
        BookingError::Validation(_) => StatusCode::BAD_REQUEST,
        BookingError::InvalidTransition { .. }
        | BookingError::TeamBusy(_)
        | BookingError::AlreadyAssigned { .. }
        | BookingError::Closed(_)
        | BookingError::Conflict(_)
        | BookingError::StaleVersion { .. } => StatusCode::CONFLICT,
        BookingError::Storage(err) => {
            tracing::error!(error = ?err, "storage error");
            return internal_error(err);
        }
    };
    (status, e.to_string())
}
