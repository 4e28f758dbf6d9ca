// src/workflow/reports.rs

use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::db::Store;
use crate::models::{BookingRequest, BookingStatus};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServiceStats {
    pub service_id: String,
    pub name: String,
    pub bookings: usize,
    pub revenue: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_bookings: usize,
    pub requested: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub rejected: usize,
    pub total_clients: usize,
    pub total_revenue: u64,
    pub completed_revenue: u64,
    pub pipeline_revenue: u64,
    pub avg_project_value: u64,
    pub by_service: Vec<ServiceStats>,
}

pub fn dashboard(store: &Store, catalog: &Catalog) -> DashboardStats {
    let bookings = &store.bookings;
    let count = |status: BookingStatus| bookings.iter().filter(|b| b.status == status).count();
    let total_revenue: u64 = bookings.iter().map(|b| b.total_price).sum();
    let completed_revenue: u64 = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Completed)
        .map(|b| b.total_price)
        .sum();
    let avg_project_value = if bookings.is_empty() {
        0
    } else {
        (total_revenue as f64 / bookings.len() as f64).round() as u64
    };

    let by_service = catalog
        .all()
        .iter()
        .map(|s| {
            let mine = bookings.iter().filter(|b| b.service_id == s.service_id);
            ServiceStats {
                service_id: s.service_id.clone(),
                name: s.name.clone(),
                bookings: mine.clone().count(),
                revenue: mine.map(|b| b.total_price).sum(),
            }
        })
        .collect();

    DashboardStats {
        total_bookings: bookings.len(),
        requested: count(BookingStatus::Requested),
        in_progress: count(BookingStatus::InProgress),
        completed: count(BookingStatus::Completed),
        rejected: count(BookingStatus::Rejected),
        total_clients: bookings.iter().map(|b| b.client_id).collect::<HashSet<_>>().len(),
        total_revenue,
        completed_revenue,
        pipeline_revenue: total_revenue - completed_revenue,
        avg_project_value,
        by_service,
    }
}

/// Human-readable invoice. Feature lines come from the current catalog; the
/// totals are the ones stored at submission.
pub fn invoice(booking: &BookingRequest, catalog: &Catalog) -> String {
    let mut lines = vec![
        "TechFlow Invoice".to_string(),
        "================".to_string(),
        format!("Booking: {}", booking.booking_id),
        format!("Date:    {}", booking.created_at.format("%Y-%m-%d")),
        format!("Client:  {} <{}>", booking.client_name, booking.client_email),
        format!("Status:  {}", booking.status),
        String::new(),
    ];
    match catalog.find(&booking.service_id) {
        Some(s) => {
            lines.push(line_item(&s.name, s.base_price, s.base_time, ""));
            lines.extend(
                booking
                    .selected_features
                    .iter()
                    .filter_map(|id| s.feature(id))
                    .map(|f| line_item(&f.name, f.price, f.time, "  + ")),
            );
        }
        None => lines.push(booking.service_name.clone()),
    }
    lines.push(String::new());
    lines.push(format!("Total:          ${}", booking.total_price));
    lines.push(format!("Estimated time: {} days", booking.estimated_time));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn line_item(name: &str, price: u64, days: u32, prefix: &str) -> String {
    let width = 40 - prefix.len();
    format!(
        "{prefix}{name:<width$} {:>10} {:>6}",
        format!("${price}"),
        format!("{days}d"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::LogMailer;
    use crate::workflow::testing::{fixture, submit};
    use crate::workflow::transitions::{apply, Action};
    use pretty_assertions::assert_eq;

    #[test]
    fn dashboard_splits_revenue() {
        let (mut store, client, _) = fixture();
        let catalog = Catalog::default();
        let done = submit(&mut store, &client, &["seo"]);
        submit(&mut store, &client, &[]);
        let dropped = submit(&mut store, &client, &["cms"]);
        apply(&mut store, &LogMailer, done.booking_id, Action::Approve, None).unwrap();
        apply(&mut store, &LogMailer, done.booking_id, Action::Complete, None).unwrap();
        apply(&mut store, &LogMailer, dropped.booking_id, Action::Reject, None).unwrap();

        let stats = dashboard(&store, &catalog);
        assert_eq!(stats.total_bookings, 3);
        assert_eq!((stats.requested, stats.in_progress, stats.completed, stats.rejected), (1, 0, 1, 1));
        assert_eq!(stats.total_clients, 1);
        assert_eq!(stats.total_revenue, 105_000 + 100_000 + 150_000);
        assert_eq!(stats.completed_revenue, 105_000);
        assert_eq!(stats.pipeline_revenue, 250_000);
        assert_eq!(stats.avg_project_value, 118_333);
        assert_eq!(
            stats.by_service[0],
            ServiceStats {
                service_id: "web-dev".into(),
                name: "Website Development".into(),
                bookings: 3,
                revenue: 355_000,
            }
        );
        assert_eq!(stats.by_service[1].bookings, 0);
    }

    #[test]
    fn empty_dashboard() {
        let stats = dashboard(&Store::default(), &Catalog::default());
        assert_eq!(stats.total_bookings, 0);
        assert_eq!(stats.avg_project_value, 0);
        assert_eq!(stats.by_service.len(), 4);
    }

    #[test]
    fn invoice_lists_features_and_totals() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &["seo"]);
        let text = invoice(&b, &Catalog::default());

        assert!(text.contains("Website Development"));
        assert!(text.contains("SEO Optimization"));
        assert!(text.contains("Total:          $105000"));
        assert!(text.contains("Estimated time: 8 days"));
        assert!(text.contains("Ada <ada@example.com>"));
    }

    #[test]
    fn invoice_line_items_are_aligned() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &["seo"]);
        let text = invoice(&b, &Catalog::default());

        let base = text.lines().find(|l| l.starts_with("Website Development")).unwrap();
        let feature = text.lines().find(|l| l.starts_with("  + SEO Optimization")).unwrap();
        assert_eq!(base.len(), feature.len());
        assert!(base.ends_with("$100000     7d"));
        assert!(feature.ends_with("$5000     1d"));
        assert!(text.ends_with("Estimated time: 8 days\n"));
    }
}
