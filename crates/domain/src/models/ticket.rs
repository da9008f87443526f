//! Ticket domain models and verification outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::event::TicketCounts;

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Pending,
    Approved,
    Used,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Pending => write!(f, "pending"),
            TicketStatus::Approved => write!(f, "approved"),
            TicketStatus::Used => write!(f, "used"),
        }
    }
}

/// A ticket held by an attendee.
///
/// `checked_in_at` is set exactly when `status` is [`TicketStatus::Used`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub code: String,
    pub attendee_name: String,
    pub attendee_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Attendee-supplied details for a new ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeDetails {
    pub name: String,
    pub phone: String,
    pub payment_reference: Option<String>,
}

/// A ticket ready to be inserted; always starts out pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub event_id: Uuid,
    pub code: String,
    pub attendee_name: String,
    pub attendee_phone: String,
    pub payment_reference: Option<String>,
}

impl NewTicket {
    pub fn new(event_id: Uuid, code: String, attendee: &AttendeeDetails) -> Self {
        Self {
            event_id,
            code,
            attendee_name: attendee.name.clone(),
            attendee_phone: attendee.phone.clone(),
            payment_reference: attendee.payment_reference.clone(),
        }
    }
}

/// Request to register for an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RegisterAttendeeRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: String,

    /// Mobile-money or bank transfer reference, if already paid.
    #[serde(default)]
    #[validate(length(max = 100, message = "Payment reference must be at most 100 characters"))]
    pub payment_ref: Option<String>,
}

impl From<RegisterAttendeeRequest> for AttendeeDetails {
    fn from(request: RegisterAttendeeRequest) -> Self {
        let payment_reference = request
            .payment_ref
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        Self {
            name: request.name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            payment_reference,
        }
    }
}

/// Request to verify a ticket code typed in at the door.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifyTicketRequest {
    pub ticket_code: String,
}

lazy_static::lazy_static! {
    /// `<EVENT_CODE>-<8 hex digits>`, after normalization.
    pub static ref TICKET_CODE_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Z0-9_-]+-[0-9A-F]{8}$").unwrap();
}

/// Returns true when a normalized code could have been issued by this service.
pub fn is_well_formed_ticket_code(code: &str) -> bool {
    TICKET_CODE_REGEX.is_match(code)
}

/// Status tag reported to door staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Valid,
    Pending,
    Duplicate,
    Invalid,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationStatus::Valid => write!(f, "valid"),
            VerificationStatus::Pending => write!(f, "pending"),
            VerificationStatus::Duplicate => write!(f, "duplicate"),
            VerificationStatus::Invalid => write!(f, "invalid"),
        }
    }
}

/// Result of scanning or typing a ticket code at the door.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The ticket was approved and has just been checked in.
    Valid(Ticket),
    /// The organizer has not confirmed payment yet.
    Pending(Ticket),
    /// The ticket was already checked in; carries the original check-in time.
    Duplicate(Ticket),
    /// No ticket carries this code.
    Invalid,
}

impl VerificationOutcome {
    pub fn status(&self) -> VerificationStatus {
        match self {
            VerificationOutcome::Valid(_) => VerificationStatus::Valid,
            VerificationOutcome::Pending(_) => VerificationStatus::Pending,
            VerificationOutcome::Duplicate(_) => VerificationStatus::Duplicate,
            VerificationOutcome::Invalid => VerificationStatus::Invalid,
        }
    }

    /// Message shown to door staff.
    pub fn message(&self) -> String {
        match self {
            VerificationOutcome::Valid(_) => "Entry Approved!".to_string(),
            VerificationOutcome::Pending(_) => "Payment not confirmed yet".to_string(),
            VerificationOutcome::Duplicate(ticket) => match ticket.checked_in_at {
                Some(at) => format!("Already used at {}", at.format("%I:%M %p")),
                None => "Already used".to_string(),
            },
            VerificationOutcome::Invalid => "Ticket not found".to_string(),
        }
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        match self {
            VerificationOutcome::Valid(ticket)
            | VerificationOutcome::Pending(ticket)
            | VerificationOutcome::Duplicate(ticket) => Some(ticket),
            VerificationOutcome::Invalid => None,
        }
    }

    pub fn into_ticket(self) -> Option<Ticket> {
        match self {
            VerificationOutcome::Valid(ticket)
            | VerificationOutcome::Pending(ticket)
            | VerificationOutcome::Duplicate(ticket) => Some(ticket),
            VerificationOutcome::Invalid => None,
        }
    }
}

/// An event's tickets split by status, keeping the input order within
/// each group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketsByStatus {
    pub pending: Vec<Ticket>,
    pub approved: Vec<Ticket>,
    pub used: Vec<Ticket>,
}

impl TicketsByStatus {
    pub fn from_tickets(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        let mut grouped = Self::default();
        for ticket in tickets {
            match ticket.status {
                TicketStatus::Pending => grouped.pending.push(ticket),
                TicketStatus::Approved => grouped.approved.push(ticket),
                TicketStatus::Used => grouped.used.push(ticket),
            }
        }
        grouped
    }

    pub fn counts(&self) -> TicketCounts {
        TicketCounts {
            pending: self.pending.len() as i64,
            approved: self.approved.len() as i64,
            used: self.used.len() as i64,
        }
    }
}
