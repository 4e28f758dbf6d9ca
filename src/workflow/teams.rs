// src/workflow/teams.rs

use uuid::Uuid;

use crate::db::Store;
use crate::error::{check_version, BookingError, BookingResult};
use crate::models::{Audience, BookingRequest, NotificationType, Team, TeamStatus};
use crate::workflow::notifications;

fn team(id: &str, name: &str, members: &[&str], specialization: &str) -> Team {
    Team {
        team_id: id.into(),
        name: name.into(),
        members: members.iter().map(|m| m.to_string()).collect(),
        status: TeamStatus::Free,
        current_project_id: None,
        current_project_name: None,
        specialization: specialization.into(),
        version: 0,
    }
}

pub fn default_roster() -> Vec<Team> {
    vec![
        team("team-alpha", "Team Alpha", &["Alex Kim", "Jordan Lee", "Sam Park"], "Web Development"),
        team("team-beta", "Team Beta", &["Chris Choi", "Taylor Jung"], "Mobile Apps"),
        team("team-gamma", "Team Gamma", &["Morgan Han", "Riley Yoon", "Casey Lim"], "Cloud & SaaS"),
        team("team-delta", "Team Delta", &["Jamie Seo", "Drew Kang"], "Business Automation"),
    ]
}

pub fn free_teams(store: &Store) -> Vec<&Team> {
    store.teams.iter().filter(|t| t.is_free()).collect()
}

pub fn holder_of(store: &Store, booking_id: Uuid) -> Option<&Team> {
    store.teams.iter().find(|t| t.current_project_id == Some(booking_id))
}

/// Binds a free team to an open booking and records it on the booking.
pub fn assign(
    store: &mut Store,
    booking_id: Uuid,
    team_id: &str,
    expected_version: Option<u64>,
) -> BookingResult<BookingRequest> {
    let booking = store.booking(booking_id)?;
    check_version(expected_version, booking.version)?;
    if booking.status.is_terminal() {
        return Err(BookingError::Closed(booking_id));
    }
    let display_name = booking.display_name();
    let client_id = booking.client_id;

    let team = store.team(team_id)?;
    if !team.is_free() {
        return Err(BookingError::TeamBusy(team.name.clone()));
    }
    if let Some(holder) = holder_of(store, booking_id) {
        return Err(BookingError::AlreadyAssigned { booking_id, team: holder.name.clone() });
    }

    let team = store.team_mut(team_id)?;
    team.status = TeamStatus::Busy;
    team.current_project_id = Some(booking_id);
    team.current_project_name = Some(display_name);
    team.version += 1;
    let team_name = team.name.clone();

    let booking = store.booking_mut(booking_id)?;
    booking.assigned_team = vec![team_name.clone()];
    booking.touch();
    let booking = booking.clone();

    notifications::notify(
        store,
        Audience::User(client_id),
        "Team Assigned",
        format!("{team_name} has been assigned to your {} project", booking.service_name),
        NotificationType::Info,
    );
    tracing::info!(%booking_id, team = %team_name, "team assigned");
    Ok(booking)
}

/// Idempotent.
pub fn free(store: &mut Store, team_id: &str) -> BookingResult<Team> {
    let team = store.team_mut(team_id)?;
    if team.status == TeamStatus::Busy || team.current_project_id.is_some() {
        team.status = TeamStatus::Free;
        team.current_project_id = None;
        team.current_project_name = None;
        team.version += 1;
        tracing::info!(team = %team.name, "team freed");
    }
    Ok(team.clone())
}

/// Frees every team still bound to `booking_id`, returning their names.
pub(crate) fn release_for_booking(store: &mut Store, booking_id: Uuid) -> Vec<String> {
    let ids: Vec<String> = store
        .teams
        .iter()
        .filter(|t| t.current_project_id == Some(booking_id))
        .map(|t| t.team_id.clone())
        .collect();
    ids.iter()
        .filter_map(|id| free(store, id).ok())
        .map(|t| t.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use crate::workflow::testing::{fixture, submit};

    #[test]
    fn assign_marks_team_busy_and_records_name() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &["seo"]);

        let updated = assign(&mut store, b.booking_id, "team-alpha", Some(b.version)).unwrap();
        assert_eq!(updated.assigned_team, vec!["Team Alpha".to_string()]);
        assert_eq!(updated.version, b.version + 1);

        let team = store.team("team-alpha").unwrap();
        assert_eq!(team.status, TeamStatus::Busy);
        assert_eq!(team.current_project_id, Some(b.booking_id));
        assert_eq!(team.current_project_name.as_deref(), Some("Website Development for Ada"));
        assert_eq!(free_teams(&store).len(), 3);
    }

    #[test]
    fn busy_team_is_rejected() {
        let (mut store, client, _) = fixture();
        let first = submit(&mut store, &client, &[]);
        let second = submit(&mut store, &client, &[]);
        assign(&mut store, first.booking_id, "team-alpha", None).unwrap();

        let err = assign(&mut store, second.booking_id, "team-alpha", None).unwrap_err();
        assert!(matches!(err, BookingError::TeamBusy(_)));
        assert!(store.booking(second.booking_id).unwrap().assigned_team.is_empty());
    }

    #[test]
    fn one_team_per_booking() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &[]);
        assign(&mut store, b.booking_id, "team-alpha", None).unwrap();

        let err = assign(&mut store, b.booking_id, "team-beta", None).unwrap_err();
        assert!(matches!(err, BookingError::AlreadyAssigned { .. }));
        assert!(store.team("team-beta").unwrap().is_free());
    }

    #[test]
    fn closed_or_stale_bookings_are_rejected() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &[]);
        let err = assign(&mut store, b.booking_id, "team-alpha", Some(b.version + 7)).unwrap_err();
        assert!(matches!(err, BookingError::StaleVersion { .. }));

        store.booking_mut(b.booking_id).unwrap().status = BookingStatus::Rejected;
        let err = assign(&mut store, b.booking_id, "team-alpha", None).unwrap_err();
        assert!(matches!(err, BookingError::Closed(_)));
        assert!(store.team("team-alpha").unwrap().is_free());
    }

    #[test]
    fn free_is_idempotent() {
        let (mut store, client, _) = fixture();
        let b = submit(&mut store, &client, &[]);
        assign(&mut store, b.booking_id, "team-gamma", None).unwrap();

        let t = free(&mut store, "team-gamma").unwrap();
        assert!(t.is_free());
        assert_eq!(t.current_project_id, None);
        let version = t.version;
        let again = free(&mut store, "team-gamma").unwrap();
        assert_eq!(again.version, version);
        assert!(matches!(free(&mut store, "team-omega"), Err(BookingError::NotFound { .. })));
    }
}
