// src/workflow/bookings.rs

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::db::Store;
use crate::error::{check_version, BookingError, BookingResult};
use crate::mailer::{EmailData, EmailKind, EmailRequest, Mailer};
use crate::models::{
    Audience, BookingMessage, BookingRequest, BookingStatus, NotificationType, Sender,
    TimelineEntry,
};
use crate::workflow::{notifications, users};

pub const SUBMITTED_MESSAGE: &str = "Service request submitted successfully";

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub client_id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub service_id: String,
    pub selected_features: Vec<String>,
    pub project_details: String,
    pub budget_range: String,
    pub attachments: Vec<String>,
}

/// Fields a caller may edit freely. Workflow state has its own operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPatch {
    pub project_details: Option<String>,
    pub budget_range: Option<String>,
    pub attachments: Option<Vec<String>>,
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Priority,
}

pub fn create(
    store: &mut Store,
    catalog: &Catalog,
    mailer: &dyn Mailer,
    new: NewBooking,
) -> BookingResult<BookingRequest> {
    let service = catalog
        .find(&new.service_id)
        .ok_or_else(|| BookingError::not_found("service", &new.service_id))?;
    if new.project_details.trim().is_empty() {
        return Err(BookingError::validation("project details are required"));
    }
    if new.budget_range.trim().is_empty() {
        return Err(BookingError::validation("budget range is required"));
    }

    let quote = service.quote(&new.selected_features);
    let now = Utc::now();
    let booking = BookingRequest {
        booking_id: Uuid::new_v4(),
        client_id: new.client_id,
        client_name: new.client_name,
        client_email: new.client_email,
        service_id: service.service_id.clone(),
        service_name: service.name.clone(),
        selected_features: quote.feature_ids,
        total_price: quote.total_price,
        estimated_time: quote.estimated_time,
        project_details: new.project_details,
        budget_range: new.budget_range,
        attachments: new.attachments,
        status: BookingStatus::Requested,
        assigned_team: Vec::new(),
        timeline: vec![TimelineEntry {
            date: now,
            status: BookingStatus::Requested,
            message: SUBMITTED_MESSAGE.into(),
        }],
        messages: Vec::new(),
        version: 0,
        created_at: now,
        updated_at: now,
    };
    store.bookings.push(booking.clone());

    notifications::notify_admins(
        store,
        "New Booking Request",
        &format!("{} requested {}", booking.client_name, booking.service_name),
        NotificationType::Info,
    );

    let data = EmailData {
        client_name: Some(booking.client_name.clone()),
        client_email: Some(booking.client_email.clone()),
        service_name: Some(booking.service_name.clone()),
        total_price: Some(booking.total_price),
        estimated_time: Some(booking.estimated_time),
        ..Default::default()
    };
    mailer.send(&EmailRequest {
        to: booking.client_email.clone(),
        subject: None,
        kind: EmailKind::BookingConfirmation,
        data: data.clone(),
    });
    for admin in users::admins(store) {
        mailer.send(&EmailRequest {
            to: admin.email.clone(),
            subject: None,
            kind: EmailKind::AdminNewRequest,
            data: data.clone(),
        });
    }

    tracing::info!(
        booking_id = %booking.booking_id,
        service = %booking.service_id,
        total_price = booking.total_price,
        "booking created"
    );
    Ok(booking)
}

pub fn update(
    store: &mut Store,
    booking_id: Uuid,
    patch: BookingPatch,
) -> BookingResult<BookingRequest> {
    let booking = store.booking_mut(booking_id)?;
    check_version(patch.expected_version, booking.version)?;
    if patch.project_details.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(BookingError::validation("project details cannot be blank"));
    }
    if patch.budget_range.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(BookingError::validation("budget range cannot be blank"));
    }

    if let Some(v) = patch.project_details {
        booking.project_details = v;
    }
    if let Some(v) = patch.budget_range {
        booking.budget_range = v;
    }
    if let Some(v) = patch.attachments {
        booking.attachments = v;
    }
    booking.touch();
    Ok(booking.clone())
}

/// Appends to the thread and the timeline, then notifies the other side.
pub fn append_message(
    store: &mut Store,
    booking_id: Uuid,
    sender: Sender,
    text: &str,
) -> BookingResult<BookingRequest> {
    let text = text.trim();
    if text.is_empty() {
        return Err(BookingError::validation("message cannot be empty"));
    }

    let booking = store.booking_mut(booking_id)?;
    let now = Utc::now();
    booking.messages.push(BookingMessage { sender, message: text.to_string(), date: now });
    let who = match sender {
        Sender::Client => "Client",
        Sender::Admin => "Admin",
    };
    booking.timeline.push(TimelineEntry {
        date: now,
        status: booking.status,
        message: format!("{who} sent a message: \"{text}\""),
    });
    booking.touch();
    let booking = booking.clone();

    match sender {
        Sender::Admin => {
            notifications::notify(
                store,
                Audience::User(booking.client_id),
                "New Message",
                format!("The team replied about your {} project", booking.service_name),
                NotificationType::Info,
            );
        }
        Sender::Client => {
            notifications::notify_admins(
                store,
                "New Message",
                &format!("{} sent a message about {}", booking.client_name, booking.service_name),
                NotificationType::Info,
            );
        }
    }
    Ok(booking)
}

pub fn find_by_id(store: &Store, booking_id: Uuid) -> BookingResult<BookingRequest> {
    store.booking(booking_id).cloned()
}

pub fn find_by_client(store: &Store, client_id: Uuid) -> Vec<BookingRequest> {
    store.bookings.iter().filter(|b| b.client_id == client_id).cloned().collect()
}

pub fn all(store: &Store) -> Vec<BookingRequest> {
    store.bookings.clone()
}

pub fn filter_by_status(store: &Store, status: BookingStatus) -> Vec<BookingRequest> {
    store.bookings.iter().filter(|b| b.status == status).cloned().collect()
}

pub fn sort(bookings: &mut [BookingRequest], order: SortOrder) {
    match order {
        SortOrder::Newest => bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Priority => bookings.sort_by(|a, b| {
            b.priority().cmp(&a.priority()).then(b.created_at.cmp(&a.created_at))
        }),
    }
}
