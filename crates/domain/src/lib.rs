//! Domain layer for the GatePass backend.
//!
//! This crate contains:
//! - Domain models (Organizer, Event, Ticket) and request types
//! - The ticket lifecycle service and its storage seam
//! - Domain error types

pub mod models;
pub mod services;
