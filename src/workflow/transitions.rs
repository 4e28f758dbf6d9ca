// src/workflow/transitions.rs

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::Store;
use crate::error::{check_version, BookingError, BookingResult};
use crate::mailer::{EmailData, EmailKind, EmailRequest, Mailer};
use crate::models::{Audience, BookingRequest, BookingStatus, NotificationType, TimelineEntry};
use crate::workflow::{bookings, notifications, teams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Approve,
    Reject,
    Complete,
}

impl Action {
    pub fn target(self) -> BookingStatus {
        match self {
            Self::Approve => BookingStatus::InProgress,
            Self::Reject => BookingStatus::Rejected,
            Self::Complete => BookingStatus::Completed,
        }
    }
}

fn timeline_message(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Requested => bookings::SUBMITTED_MESSAGE,
        BookingStatus::InProgress => "Project has been started by the team",
        BookingStatus::Completed => "Project has been completed successfully",
        BookingStatus::Rejected => "Project request has been declined",
    }
}

fn notification_for(status: BookingStatus) -> (&'static str, NotificationType) {
    match status {
        BookingStatus::Rejected => ("Request Declined", NotificationType::Error),
        BookingStatus::Completed => ("Project Completed", NotificationType::Success),
        BookingStatus::InProgress => ("Project Started", NotificationType::Info),
        BookingStatus::Requested => ("Request Received", NotificationType::Info),
    }
}

/// Moves a booking along the state machine. Status, timeline, team release and
/// the client notification change together or not at all.
///
/// Re-entering the current status is a no-op.
pub fn transition(
    store: &mut Store,
    mailer: &dyn Mailer,
    booking_id: Uuid,
    to: BookingStatus,
    expected_version: Option<u64>,
) -> BookingResult<BookingRequest> {
    let current = store.booking(booking_id)?;
    check_version(expected_version, current.version)?;
    let from = current.status;
    if from == to {
        return Ok(current.clone());
    }
    if !from.can_transition_to(to) {
        return Err(BookingError::InvalidTransition { from, to });
    }

    let message = timeline_message(to);
    let booking = store.booking_mut(booking_id)?;
    booking.timeline.push(TimelineEntry { date: Utc::now(), status: to, message: message.into() });
    booking.status = to;
    booking.touch();
    let booking = booking.clone();

    if to.is_terminal() {
        let released = teams::release_for_booking(store, booking_id);
        if !released.is_empty() {
            tracing::info!(%booking_id, teams = ?released, "released teams on close");
        }
    }

    let (title, kind) = notification_for(to);
    notifications::notify(
        store,
        Audience::User(booking.client_id),
        title,
        format!("{}: {message}", booking.service_name),
        kind,
    );
    mailer.send(&EmailRequest {
        to: booking.client_email.clone(),
        subject: None,
        kind: EmailKind::StatusUpdate,
        data: EmailData {
            client_name: Some(booking.client_name.clone()),
            service_name: Some(booking.service_name.clone()),
            status: Some(to),
            message: Some(message.into()),
            ..Default::default()
        },
    });

    tracing::info!(%booking_id, %from, %to, "booking transitioned");
    Ok(booking)
}

pub fn apply(
    store: &mut Store,
    mailer: &dyn Mailer,
    booking_id: Uuid,
    action: Action,
    expected_version: Option<u64>,
) -> BookingResult<BookingRequest> {
    transition(store, mailer, booking_id, action.target(), expected_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::LogMailer;
    use crate::models::{Sender, TeamStatus};
    use crate::workflow::testing::{fixture, submit};

    #[test]
    fn approve_then_complete() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &[]);

        let started = apply(&mut store, &LogMailer, b.booking_id, Action::Approve, Some(0)).unwrap();
        assert_eq!(started.status, BookingStatus::InProgress);
        assert_eq!(started.timeline.len(), 2);
        assert_eq!(started.timeline[1].message, "Project has been started by the team");

        let done = apply(&mut store, &LogMailer, b.booking_id, Action::Complete, None).unwrap();
        assert_eq!(done.status, BookingStatus::Completed);
        assert_eq!(done.timeline.len(), 3);

        let feed = notifications::for_user(&store, client.user_id);
        assert_eq!(feed.items[0].kind, NotificationType::Success);
        assert_eq!(feed.items[1].kind, NotificationType::Info);
    }

    #[test]
    fn reject_emits_error_notification() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &[]);
        let r = apply(&mut store, &LogMailer, b.booking_id, Action::Reject, None).unwrap();
        assert_eq!(r.status, BookingStatus::Rejected);
        assert_eq!(r.timeline.last().unwrap().message, "Project request has been declined");
        let feed = notifications::for_user(&store, client.user_id);
        assert_eq!(feed.items[0].kind, NotificationType::Error);
    }

    #[test]
    fn terminal_states_admit_nothing() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &[]);
        apply(&mut store, &LogMailer, b.booking_id, Action::Reject, None).unwrap();

        for action in [Action::Approve, Action::Complete] {
            let err = apply(&mut store, &LogMailer, b.booking_id, action, None).unwrap_err();
            assert!(matches!(err, BookingError::InvalidTransition { from: BookingStatus::Rejected, .. }));
        }
        let after = store.booking(b.booking_id).unwrap();
        assert_eq!(after.status, BookingStatus::Rejected);
        assert_eq!(after.timeline.len(), 2);
    }

    #[test]
    fn cannot_skip_or_go_back() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &[]);
        let err = apply(&mut store, &LogMailer, b.booking_id, Action::Complete, None).unwrap_err();
        assert!(matches!(
            err,
            BookingError::InvalidTransition { from: BookingStatus::Requested, to: BookingStatus::Completed }
        ));

        apply(&mut store, &LogMailer, b.booking_id, Action::Approve, None).unwrap();
        assert!(transition(&mut store, &LogMailer, b.booking_id, BookingStatus::Requested, None).is_err());
        assert!(apply(&mut store, &LogMailer, b.booking_id, Action::Reject, None).is_err());
    }

    #[test]
    fn reentry_is_a_noop() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &[]);
        apply(&mut store, &LogMailer, b.booking_id, Action::Approve, None).unwrap();
        let notes = store.notifications.len();

        let same = apply(&mut store, &LogMailer, b.booking_id, Action::Approve, None).unwrap();
        assert_eq!(same.timeline.len(), 2);
        assert_eq!(same.version, 1);
        assert_eq!(store.notifications.len(), notes);
    }

    #[test]
    fn completion_releases_team() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &[]);
        apply(&mut store, &LogMailer, b.booking_id, Action::Approve, None).unwrap();
        teams::assign(&mut store, b.booking_id, "team-alpha", None).unwrap();
        assert_eq!(store.team("team-alpha").unwrap().status, TeamStatus::Busy);

        apply(&mut store, &LogMailer, b.booking_id, Action::Complete, None).unwrap();
        let team = store.team("team-alpha").unwrap();
        assert_eq!(team.status, TeamStatus::Free);
        assert_eq!(team.current_project_id, None);
        assert_eq!(team.current_project_name, None);
        // the booking keeps the historical team name
        assert_eq!(store.booking(b.booking_id).unwrap().assigned_team, vec!["Team Alpha".to_string()]);
    }

    #[test]
    fn timeline_never_shrinks() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &[]);
        let mut last = 1;
        let steps: Vec<Box<dyn Fn(&mut Store) -> BookingResult<BookingRequest>>> = vec![
            Box::new(|s: &mut Store| bookings::append_message(s, b.booking_id, Sender::Client, "hi")),
            Box::new(|s: &mut Store| apply(s, &LogMailer, b.booking_id, Action::Complete, None)),
            Box::new(|s: &mut Store| apply(s, &LogMailer, b.booking_id, Action::Approve, None)),
            Box::new(|s: &mut Store| bookings::update(s, b.booking_id, Default::default())),
            Box::new(|s: &mut Store| apply(s, &LogMailer, b.booking_id, Action::Complete, None)),
        ];
        for step in steps {
            let _ = step(&mut store);
            let len = store.booking(b.booking_id).unwrap().timeline.len();
            assert!(len >= last);
            last = len;
        }
        assert_eq!(last, 4);
    }

    #[test]
    fn stale_version_is_rejected() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &[]);
        bookings::append_message(&mut store, b.booking_id, Sender::Admin, "ping").unwrap();
        let err = apply(&mut store, &LogMailer, b.booking_id, Action::Approve, Some(0)).unwrap_err();
        assert!(matches!(err, BookingError::StaleVersion { expected: 0, actual: 1 }));
        assert_eq!(store.booking(b.booking_id).unwrap().status, BookingStatus::Requested);
    }
}
