//! Services behind the HTTP handlers.

pub mod auth;
