//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod event;
pub mod organizer;
pub mod ticket;

pub use event::{EventEntity, EventWithCountsEntity, EventWithOrganizerEntity};
pub use organizer::OrganizerEntity;
pub use ticket::{TicketEntity, TicketStatusDb};
