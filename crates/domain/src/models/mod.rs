//! Domain models for GatePass.

pub mod event;
pub mod organizer;
pub mod ticket;

pub use event::{CreateEventRequest, Event, EventSummary, PublicEventInfo, TicketCounts};
pub use organizer::{LoginRequest, Organizer, RegisterOrganizerRequest};
pub use ticket::{
    AttendeeDetails, NewTicket, RegisterAttendeeRequest, Ticket, TicketStatus, TicketsByStatus,
    VerificationOutcome, VerificationStatus, VerifyTicketRequest,
};
