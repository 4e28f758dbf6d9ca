// src/workflow/mod.rs
//
// Domain operations over the store. Handlers in `routes` call these through
// `Db::read` / `Db::mutate`; nothing else touches the store directly.

pub mod bookings;
pub mod notifications;
pub mod reports;
pub mod reviews;
pub mod teams;
pub mod transitions;
pub mod users;
