// src/workflow/users.rs

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::Store;
use crate::error::{BookingError, BookingResult};
use crate::models::{Role, User};

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

pub fn register(store: &mut Store, new: NewUser) -> BookingResult<User> {
    let name = new.name.trim();
    let email = new.email.trim().to_lowercase();
    if name.is_empty() {
        return Err(BookingError::validation("name is required"));
    }
    if !email.contains('@') {
        return Err(BookingError::validation("email is invalid"));
    }
    if store.users.iter().any(|u| u.email == email) {
        return Err(BookingError::Conflict(format!("email {email} is already registered")));
    }

    let user = User {
        user_id: Uuid::new_v4(),
        email,
        name: name.to_string(),
        role: new.role,
        created_at: Utc::now(),
    };
    tracing::info!(user_id = %user.user_id, role = ?user.role, "user registered");
    store.users.push(user.clone());
    Ok(user)
}

pub fn admins(store: &Store) -> impl Iterator<Item = &User> {
    store.users.iter().filter(|u| u.role == Role::Admin)
}
