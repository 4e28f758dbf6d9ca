// src/error.rs

use thiserror::Error;
use uuid::Uuid;

use crate::models::BookingStatus;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },
    #[error("team {0} is busy")]
    TeamBusy(String),
    #[error("booking {booking_id} is already held by {team}")]
    AlreadyAssigned { booking_id: Uuid, team: String },
    #[error("booking {0} is closed")]
    Closed(Uuid),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("stale write: expected version {expected}, found {actual}")]
    StaleVersion { expected: u64, actual: u64 },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl BookingError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Rejects the write when the caller saw an older version of the record.
pub fn check_version(expected: Option<u64>, actual: u64) -> BookingResult<()> {
    match expected {
        Some(expected) if expected != actual => Err(BookingError::StaleVersion { expected, actual }),
        _ => Ok(()),
    }
}
