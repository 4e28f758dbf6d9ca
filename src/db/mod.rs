// src/db/mod.rs

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};
use crate::models::{BookingRequest, Notification, Review, Team, User};
use crate::workflow::teams;

/// All persisted application state. The catalog is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub bookings: Vec<BookingRequest>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            bookings: Vec::new(),
            notifications: Vec::new(),
            reviews: Vec::new(),
            teams: teams::default_roster(),
        }
    }
}

impl Store {
    pub fn booking(&self, booking_id: Uuid) -> BookingResult<&BookingRequest> {
        self.bookings
            .iter()
            .find(|b| b.booking_id == booking_id)
            .ok_or_else(|| BookingError::not_found("booking", booking_id))
    }

    pub fn booking_mut(&mut self, booking_id: Uuid) -> BookingResult<&mut BookingRequest> {
        self.bookings
            .iter_mut()
            .find(|b| b.booking_id == booking_id)
            .ok_or_else(|| BookingError::not_found("booking", booking_id))
    }

    pub fn team(&self, team_id: &str) -> BookingResult<&Team> {
        self.teams
            .iter()
            .find(|t| t.team_id == team_id)
            .ok_or_else(|| BookingError::not_found("team", team_id))
    }

    pub fn team_mut(&mut self, team_id: &str) -> BookingResult<&mut Team> {
        self.teams
            .iter_mut()
            .find(|t| t.team_id == team_id)
            .ok_or_else(|| BookingError::not_found("team", team_id))
    }

    pub fn user(&self, user_id: Uuid) -> BookingResult<&User> {
        self.users
            .iter()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| BookingError::not_found("user", user_id))
    }
}

/// Shared handle to the store. One logical operation runs under one write lock,
/// and the snapshot is written before the lock is released.
#[derive(Clone)]
pub struct Db {
    store: Arc<RwLock<Store>>,
    path: Option<PathBuf>,
}

pub async fn open(path: Option<PathBuf>) -> anyhow::Result<Db> {
    let store = match &path {
        Some(p) if tokio::fs::try_exists(p).await.unwrap_or(false) => load(p).await?,
        Some(p) => {
            tracing::info!(path = %p.display(), "no snapshot yet, starting empty");
            Store::default()
        }
        None => {
            tracing::warn!("no data path configured, state is memory-only");
            Store::default()
        }
    };

    tracing::info!(
        bookings = store.bookings.len(),
        users = store.users.len(),
        teams = store.teams.len(),
        "store ready"
    );
    Ok(Db { store: Arc::new(RwLock::new(store)), path })
}

async fn load(path: &Path) -> anyhow::Result<Store> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("read snapshot {}", path.display()))?;
    let mut store: Store = serde_json::from_slice(&raw)
        .with_context(|| format!("parse snapshot {}", path.display()))?;
    if store.teams.is_empty() {
        store.teams = teams::default_roster();
    }
    Ok(store)
}

impl Db {
    pub fn in_memory() -> Self {
        Self { store: Arc::new(RwLock::new(Store::default())), path: None }
    }

    pub fn is_durable(&self) -> bool {
        self.path.is_some()
    }

    pub async fn read<T>(&self, f: impl FnOnce(&Store) -> T) -> T {
        let store = self.store.read().await;
        f(&store)
    }

    /// Runs `f` atomically against a working copy. The copy replaces the live
    /// store only once `f` succeeded and the snapshot was written.
    pub async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Store) -> BookingResult<T>,
    ) -> BookingResult<T> {
        let mut store = self.store.write().await;
        let mut next = store.clone();
        let out = f(&mut next)?;
        self.persist(&next).await?;
        *store = next;
        Ok(out)
    }

    async fn persist(&self, store: &Store) -> anyhow::Result<()> {
        let Some(path) = &self.path else { return Ok(()) };
        let bytes = serde_json::to_vec_pretty(store).context("serialize snapshot")?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("rename onto {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, TeamStatus};
    use chrono::Utc;

    fn user(name: &str) -> User {
        User {
            user_id: Uuid::new_v4(),
            email: format!("{name}@example.com"),
            name: name.into(),
            role: Role::Client,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let db = open(Some(path.clone())).await.unwrap();
        let alice = user("alice");
        let alice_id = alice.user_id;
        db.mutate(|s| {
            s.users.push(alice);
            Ok(())
        })
        .await
        .unwrap();

        let reopened = open(Some(path)).await.unwrap();
        let found = reopened.read(|s| s.user(alice_id).map(|u| u.name.clone())).await;
        assert_eq!(found.unwrap(), "alice");
        assert_eq!(reopened.read(|s| s.teams.len()).await, 4);
    }

    #[tokio::test]
    async fn failed_operation_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let db = open(Some(path.clone())).await.unwrap();

        let res: BookingResult<()> = db.mutate(|_| Err(BookingError::validation("nope"))).await;
        assert!(res.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn failed_snapshot_write_keeps_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("state.json");
        let db = open(Some(path.clone())).await.unwrap();

        let res = db
            .mutate(|s| {
                s.teams[0].status = TeamStatus::Busy;
                s.users.push(user("bob"));
                Ok(())
            })
            .await;
        assert!(matches!(res, Err(BookingError::Storage(_))));
        assert!(!path.exists());

        let (free, users) =
            db.read(|s| (s.teams.iter().filter(|t| t.is_free()).count(), s.users.len())).await;
        assert_eq!(free, 4);
        assert_eq!(users, 0);
    }

    #[tokio::test]
    async fn corrupt_snapshot_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert!(open(Some(path)).await.is_err());
    }

    #[tokio::test]
    async fn empty_roster_is_reseeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, br#"{"users": []}"#).unwrap();

        let db = open(Some(path)).await.unwrap();
        let teams = db.read(|s| s.teams.clone()).await;
        assert_eq!(teams.len(), 4);
        assert!(teams.iter().all(|t| t.status == TeamStatus::Free));
    }
}
