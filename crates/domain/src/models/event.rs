//! Event domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An event owned by one organizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    /// Shareable code used in registration links.
    pub code: String,
    pub name: String,
    /// Date and time as entered by the organizer.
    pub date: String,
    pub venue: String,
    pub max_tickets: i32,
    pub ticket_price: i32,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Seats left given the number of tickets currently held, clamped at zero.
    pub fn tickets_remaining(&self, ticket_count: i64) -> i64 {
        (i64::from(self.max_tickets) - ticket_count).max(0)
    }

    pub fn is_owned_by(&self, organizer_id: Uuid) -> bool {
        self.organizer_id == organizer_id
    }
}

/// Request to create an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "Date must be 1-50 characters"))]
    pub date: String,

    #[validate(length(min = 1, max = 200, message = "Venue must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub venue: String,

    #[validate(range(min = 1, max = 100000, message = "max_tickets must be between 1 and 100000"))]
    pub max_tickets: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "ticket_price must not be negative"))]
    pub ticket_price: i32,
}

/// Ticket counts for one event, grouped by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TicketCounts {
    pub pending: i64,
    pub approved: i64,
    pub used: i64,
}

impl TicketCounts {
    pub fn total(&self) -> i64 {
        self.pending + self.approved + self.used
    }
}

/// Event row on the organizer dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    pub ticket_counts: TicketCounts,
    pub tickets_remaining: i64,
}

impl EventSummary {
    pub fn new(event: Event, ticket_counts: TicketCounts) -> Self {
        let tickets_remaining = event.tickets_remaining(ticket_counts.total());
        Self {
            event,
            ticket_counts,
            tickets_remaining,
        }
    }
}

/// Public view of an event on its registration page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicEventInfo {
    pub code: String,
    pub name: String,
    pub date: String,
    pub venue: String,
    pub ticket_price: i32,
    pub max_tickets: i32,
    pub tickets_remaining: i64,
    /// Organizer phone attendees pay to.
    pub organizer_phone: String,
}

impl PublicEventInfo {
    pub fn new(event: &Event, ticket_count: i64, organizer_phone: String) -> Self {
        Self {
            code: event.code.clone(),
            name: event.name.clone(),
            date: event.date.clone(),
            venue: event.venue.clone(),
            ticket_price: event.ticket_price,
            max_tickets: event.max_tickets,
            tickets_remaining: event.tickets_remaining(ticket_count),
            organizer_phone,
        }
    }
}
