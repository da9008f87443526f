//! Repository implementations for database operations.

pub mod event;
pub mod organizer;
pub mod ticket;
pub mod ticket_store;

pub use event::{EventInput, EventRepository};
pub use organizer::OrganizerRepository;
pub use ticket::{GuardedInsert, TicketRepository};
pub use ticket_store::PgTicketStore;
