//! Custom Axum extractors.

pub mod organizer_auth;

pub use organizer_auth::OrganizerAuth;
