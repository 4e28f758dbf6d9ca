// src/mailer.rs
//
// Outbound mail is a stub: templates are rendered and logged, never delivered.

use serde::{Deserialize, Serialize};

use crate::models::BookingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    BookingConfirmation,
    StatusUpdate,
    AdminNewRequest,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailData {
    #[serde(alias = "clientName")]
    pub client_name: Option<String>,
    #[serde(alias = "clientEmail")]
    pub client_email: Option<String>,
    #[serde(alias = "serviceName")]
    pub service_name: Option<String>,
    #[serde(alias = "totalPrice")]
    pub total_price: Option<u64>,
    #[serde(alias = "estimatedTime")]
    pub estimated_time: Option<u32>,
    pub status: Option<BookingStatus>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub to: String,
    pub subject: Option<String>,
    #[serde(rename = "type")]
    pub kind: EmailKind,
    #[serde(default)]
    pub data: EmailData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailAckData {
    pub to: String,
    pub subject: String,
    #[serde(rename = "type")]
    pub kind: EmailKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailAck {
    pub success: bool,
    pub message: String,
    pub data: EmailAckData,
}

pub trait Mailer: Send + Sync {
    fn send(&self, email: &EmailRequest) -> EmailAck;
}

/// Renders and logs. Always acknowledges success.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, email: &EmailRequest) -> EmailAck {
        let rendered = render(email);
        tracing::info!(
            to = %email.to,
            kind = ?email.kind,
            subject = %rendered.subject,
            body = %rendered.body,
            "email would be sent"
        );
        EmailAck {
            success: true,
            message: "Email notification queued successfully".into(),
            data: EmailAckData { to: email.to.clone(), subject: rendered.subject, kind: email.kind },
        }
    }
}

fn money(v: Option<u64>) -> String {
    v.map(|v| format!("${v}")).unwrap_or_else(|| "TBD".into())
}

pub fn render(email: &EmailRequest) -> RenderedEmail {
    let d = &email.data;
    let client = d.client_name.as_deref().unwrap_or("Client");
    let service = d.service_name.as_deref().unwrap_or("IT Service");

    match email.kind {
        EmailKind::BookingConfirmation => RenderedEmail {
            subject: format!("Booking Confirmed - {service}"),
            body: format!(
                "Dear {client},\n\n\
                 Thank you for your booking request! We have received your request for {service}.\n\n\
                 Booking Details:\n\
                 - Service: {service}\n\
                 - Estimated Cost: {}\n\
                 - Estimated Timeline: {} days\n\n\
                 Our team will review your request and get back to you within 24 hours.\n\n\
                 Best regards,\nTechFlow Team\n",
                money(d.total_price),
                d.estimated_time.map(|t| t.to_string()).unwrap_or_else(|| "TBD".into()),
            ),
        },
        EmailKind::StatusUpdate => {
            let status = d
                .status
                .map(|s| s.as_str().replace('_', " ").to_uppercase())
                .unwrap_or_default();
            RenderedEmail {
                subject: format!(
                    "Project Status Update - {}",
                    d.service_name.as_deref().unwrap_or("Your Project")
                ),
                body: format!(
                    "Dear {client},\n\n\
                     Your project status has been updated to: {status}\n\n\
                     {}\n\n\
                     Best regards,\nTechFlow Team\n",
                    d.message.as_deref().unwrap_or(""),
                ),
            }
        }
        EmailKind::AdminNewRequest => RenderedEmail {
            subject: format!("New Booking Request - {service}"),
            body: format!(
                "A new booking request has been received.\n\n\
                 Client: {client}\n\
                 Email: {}\n\
                 Service: {service}\n\
                 Estimated Value: {}\n",
                d.client_email.as_deref().unwrap_or(""),
                money(d.total_price),
            ),
        },
        EmailKind::Other => RenderedEmail {
            subject: email.subject.clone().unwrap_or_else(|| "TechFlow Notification".into()),
            body: "You have a new notification from TechFlow.".into(),
        },
    }
}
