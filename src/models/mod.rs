// src/models/mod.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ───────────────────────────────────────
// Users
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// ───────────────────────────────────────
// Catalog
// ───────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub feature_id: String,
    pub name: String,
    pub price: u64,
    pub time: u32, // days
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub service_id: String,
    pub name: String,
    pub description: String,
    pub base_price: u64,
    pub base_time: u32, // days
    pub features: Vec<Feature>,
}

// ───────────────────────────────────────
// Bookings
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Requested,
    InProgress,
    Completed,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Forward-only edges: requested → {in_progress, rejected}, in_progress → completed.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Requested, Self::InProgress)
                | (Self::Requested, Self::Rejected)
                | (Self::InProgress, Self::Completed)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Client,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: DateTime<Utc>,
    pub status: BookingStatus,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingMessage {
    pub sender: Sender,
    pub message: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub booking_id: Uuid,
    // denormalized at creation, never re-synced
    pub client_id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub service_id: String,
    pub service_name: String,
    pub selected_features: Vec<String>,
    // computed once at submission
    pub total_price: u64,
    pub estimated_time: u32,
    pub project_details: String,
    pub budget_range: String,
    pub attachments: Vec<String>, // file names only
    pub status: BookingStatus,
    pub assigned_team: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub messages: Vec<BookingMessage>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingRequest {
    pub fn priority(&self) -> Priority {
        Priority::from_total_price(self.total_price)
    }

    pub fn progress_step(&self) -> Option<u8> {
        match self.status {
            BookingStatus::Requested => Some(1),
            BookingStatus::InProgress => Some(2),
            BookingStatus::Completed => Some(3),
            BookingStatus::Rejected => None,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} for {}", self.service_name, self.client_name)
    }

    /// Bumps `updated_at` and the version stamp. Every mutation goes through here.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.version += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

pub const HIGH_PRIORITY_PRICE: u64 = 500_000;
pub const MEDIUM_PRIORITY_PRICE: u64 = 200_000;

impl Priority {
    pub fn from_total_price(total_price: u64) -> Self {
        if total_price >= HIGH_PRIORITY_PRICE {
            Self::High
        } else if total_price >= MEDIUM_PRIORITY_PRICE {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

// ───────────────────────────────────────
// Teams
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    Free,
    Busy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub team_id: String,
    pub name: String,
    pub members: Vec<String>,
    pub status: TeamStatus,         // busy <=> current_project_id is set
    pub current_project_id: Option<Uuid>,
    pub current_project_name: Option<String>,
    pub specialization: String,
    pub version: u64,
}

impl Team {
    pub fn is_free(&self) -> bool {
        self.status == TeamStatus::Free
    }
}

// ───────────────────────────────────────
// Notifications
// ───────────────────────────────────────
pub const BROADCAST: &str = "all";

/// Addressee of a notification: one user, or everybody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Audience {
    All,
    User(Uuid),
}

impl Audience {
    pub fn includes(self, user_id: Uuid) -> bool {
        match self {
            Self::All => true,
            Self::User(id) => id == user_id,
        }
    }
}

impl From<Audience> for String {
    fn from(a: Audience) -> Self {
        match a {
            Audience::All => BROADCAST.to_string(),
            Audience::User(id) => id.to_string(),
        }
    }
}

impl TryFrom<String> for Audience {
    type Error = uuid::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == BROADCAST {
            Ok(Self::All)
        } else {
            Uuid::parse_str(&s).map(Self::User)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: Uuid,
    pub user_id: Audience,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// ───────────────────────────────────────
// Reviews
// ───────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub review_id: Uuid,
    pub booking_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub service_id: String,
    pub rating: u8, // 1..=5
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ───────────────────────────────────────
// DTOs helpful for endpoints
// ───────────────────────────────────────
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: BookingRequest,
    pub priority: Priority,
    pub progress_step: Option<u8>,
}

impl From<BookingRequest> for BookingView {
    fn from(booking: BookingRequest) -> Self {
        Self {
            priority: booking.priority(),
            progress_step: booking.progress_step(),
            booking,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationFeed {
    pub unread: usize,
    pub items: Vec<Notification>,
}
