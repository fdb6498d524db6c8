//! # emma_core
//!
//! Core domain logic for Emma: admin credentials, session tokens and CSRF
//! binding, shared by `emma_api` and the operator CLI.

pub mod auth;
pub mod migrate;
pub mod models;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
