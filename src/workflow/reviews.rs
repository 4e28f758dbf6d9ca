// src/workflow/reviews.rs

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::Store;
use crate::error::{BookingError, BookingResult};
use crate::models::{Audience, BookingStatus, NotificationType, Review};
use crate::workflow::notifications;

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub rating: u8,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingBucket {
    pub rating: u8,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingSummary {
    pub service_id: String,
    pub count: usize,
    pub average: Option<f64>,
    pub distribution: Vec<RatingBucket>, // 5 down to 1
}

/// One review per completed booking.
pub fn submit(store: &mut Store, booking_id: Uuid, new: NewReview) -> BookingResult<Review> {
    let booking = store.booking(booking_id)?;
    if booking.status != BookingStatus::Completed {
        return Err(BookingError::validation("only completed bookings can be reviewed"));
    }
    if !(1..=5).contains(&new.rating) {
        return Err(BookingError::validation("rating must be between 1 and 5"));
    }
    if for_booking(store, booking_id).is_some() {
        return Err(BookingError::Conflict(format!("booking {booking_id} already has a review")));
    }

    let review = Review {
        review_id: Uuid::new_v4(),
        booking_id,
        client_id: booking.client_id,
        client_name: booking.client_name.clone(),
        service_id: booking.service_id.clone(),
        rating: new.rating,
        comment: new.comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        created_at: Utc::now(),
    };
    store.reviews.push(review.clone());

    notifications::notify(
        store,
        Audience::All,
        "New Review Submitted",
        format!("{} left a {}-star review", review.client_name, review.rating),
        NotificationType::Success,
    );
    Ok(review)
}

pub fn for_booking(store: &Store, booking_id: Uuid) -> Option<&Review> {
    store.reviews.iter().find(|r| r.booking_id == booking_id)
}

pub fn for_service<'a>(store: &'a Store, service_id: &str) -> Vec<&'a Review> {
    store.reviews.iter().filter(|r| r.service_id == service_id).collect()
}

pub fn summary(store: &Store, service_id: &str) -> RatingSummary {
    let reviews = for_service(store, service_id);
    let count = reviews.len();
    let average = (count > 0)
        .then(|| reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / count as f64);
    let distribution = (1..=5u8)
        .rev()
        .map(|rating| RatingBucket {
            rating,
            count: reviews.iter().filter(|r| r.rating == rating).count(),
        })
        .collect();
    RatingSummary { service_id: service_id.to_string(), count, average, distribution }
}
