//! HTTP route handlers.

pub mod attendee;
pub mod auth;
pub mod events;
pub mod health;
pub mod tickets;
pub mod verify;

use crate::config::Config;

/// Public page where attendees register for an event.
pub fn registration_url(config: &Config, event_code: &str) -> String {
    format!("{}/register/{}", config.public_base_url(), event_code)
}

/// URL encoded into a ticket's QR code and opened by the door scanner.
pub fn verification_url(config: &Config, ticket_code: &str) -> String {
    format!("{}/verify/{}", config.public_base_url(), ticket_code)
}
