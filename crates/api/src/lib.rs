//! GatePass HTTP API: organizer accounts, events, attendee registration and
//! door verification.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod services;
