//! Domain models.

pub mod auth;
