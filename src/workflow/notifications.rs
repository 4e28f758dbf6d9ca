// src/workflow/notifications.rs

use chrono::Utc;
use uuid::Uuid;

use crate::db::Store;
use crate::error::{BookingError, BookingResult};
use crate::models::{Audience, Notification, NotificationFeed, NotificationType, Role};

pub fn notify(
    store: &mut Store,
    audience: Audience,
    title: impl Into<String>,
    message: impl Into<String>,
    kind: NotificationType,
) -> Notification {
    let n = Notification {
        notification_id: Uuid::new_v4(),
        user_id: audience,
        title: title.into(),
        message: message.into(),
        kind,
        read: false,
        created_at: Utc::now(),
    };
    tracing::debug!(notification_id = %n.notification_id, audience = ?audience, title = %n.title, "notify");
    store.notifications.push(n.clone());
    n
}

/// One notification per registered admin.
pub fn notify_admins(
    store: &mut Store,
    title: &str,
    message: &str,
    kind: NotificationType,
) -> usize {
    let admins: Vec<Uuid> = store
        .users
        .iter()
        .filter(|u| u.role == Role::Admin)
        .map(|u| u.user_id)
        .collect();
    for id in &admins {
        notify(store, Audience::User(*id), title, message, kind);
    }
    admins.len()
}

/// Own and broadcast notifications, newest first.
pub fn for_user(store: &Store, user_id: Uuid) -> NotificationFeed {
    let mut items: Vec<Notification> = store
        .notifications
        .iter()
        .filter(|n| n.user_id.includes(user_id))
        .cloned()
        .collect();
    items.reverse();
    let unread = items.iter().filter(|n| !n.read).count();
    NotificationFeed { unread, items }
}

pub fn mark_read(store: &mut Store, notification_id: Uuid) -> BookingResult<Notification> {
    let n = store
        .notifications
        .iter_mut()
        .find(|n| n.notification_id == notification_id)
        .ok_or_else(|| BookingError::not_found("notification", notification_id))?;
    n.read = true;
    Ok(n.clone())
}

/// Removes notifications addressed to this user. Broadcasts are left alone.
pub fn clear_for_user(store: &mut Store, user_id: Uuid) -> usize {
    let before = store.notifications.len();
    store.notifications.retain(|n| n.user_id != Audience::User(user_id));
    before - store.notifications.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_includes_broadcasts_newest_first() {
        let mut store = Store::default();
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        notify(&mut store, Audience::User(me), "first", "a", NotificationType::Info);
        notify(&mut store, Audience::User(other), "not mine", "b", NotificationType::Info);
        notify(&mut store, Audience::All, "everyone", "c", NotificationType::Success);

        let feed = for_user(&store, me);
        let titles: Vec<&str> = feed.items.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["everyone", "first"]);
        assert_eq!(feed.unread, 2);
    }

    #[test]
    fn mark_read_is_idempotent() {
        let mut store = Store::default();
        let me = Uuid::new_v4();
        let id = notify(&mut store, Audience::User(me), "t", "m", NotificationType::Warning)
            .notification_id;

        assert!(mark_read(&mut store, id).unwrap().read);
        assert!(mark_read(&mut store, id).unwrap().read);
        assert_eq!(for_user(&store, me).unread, 0);
        assert!(matches!(
            mark_read(&mut store, Uuid::new_v4()),
            Err(BookingError::NotFound { .. })
        ));
    }

    #[test]
    fn clear_keeps_broadcasts_and_other_users() {
        let mut store = Store::default();
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        notify(&mut store, Audience::User(me), "1", "", NotificationType::Info);
        notify(&mut store, Audience::User(me), "2", "", NotificationType::Error);
        notify(&mut store, Audience::User(other), "3", "", NotificationType::Info);
        notify(&mut store, Audience::All, "4", "", NotificationType::Info);

        assert_eq!(clear_for_user(&mut store, me), 2);
        assert_eq!(clear_for_user(&mut store, me), 0);
        assert_eq!(store.notifications.len(), 2);
        assert_eq!(for_user(&store, me).items.len(), 1);
    }
}
