//! Ticket lifecycle: registration under capacity, approval, rejection and
//! one-time check-in at the door.
//!
//! ```text
//! PENDING --approve--> APPROVED --verify--> USED
//!    |
//!  reject
//!    v
//! (removed)
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::store::{CapacityInsert, StoreError, TicketStore};
use crate::models::ticket::is_well_formed_ticket_code;
use crate::models::{AttendeeDetails, Event, NewTicket, Ticket, TicketStatus, VerificationOutcome};

/// Attempts at allocating a fresh ticket code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Rounds of conditional check-in followed by a re-read.
const CHECK_IN_ROUNDS: usize = 2;

/// Reason a transition is not allowed from the ticket's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidState {
    AlreadyUsed,
    NotYetApproved,
}

impl std::fmt::Display for InvalidState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidState::AlreadyUsed => write!(f, "Ticket has already been used"),
            InvalidState::NotYetApproved => write!(f, "Ticket has not been approved yet"),
        }
    }
}

/// Errors raised by lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Not authorized to manage this event")]
    Unauthorized,

    #[error("Event is full ({max_tickets} tickets)")]
    CapacityExceeded { max_tickets: i32 },

    #[error("{0}")]
    InvalidState(InvalidState),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LifecycleError {
    /// Short result tag for logs and metrics labels.
    pub fn tag(&self) -> &'static str {
        match self {
            LifecycleError::NotFound(_) => "not_found",
            LifecycleError::Unauthorized => "unauthorized",
            LifecycleError::CapacityExceeded { .. } => "capacity_full",
            LifecycleError::InvalidState(InvalidState::AlreadyUsed) => "already_used",
            LifecycleError::InvalidState(InvalidState::NotYetApproved) => "not_approved",
            LifecycleError::Store(_) => "store_error",
        }
    }
}

/// Drives ticket state transitions on top of a [`TicketStore`].
pub struct TicketLifecycle<S> {
    store: S,
    generate_code: fn(&str) -> String,
}

impl<S: TicketStore> TicketLifecycle<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            generate_code: shared::codes::generate_ticket_code,
        }
    }

    /// Replaces the ticket code generator (given the event code).
    pub fn with_code_generator(mut self, generate_code: fn(&str) -> String) -> Self {
        self.generate_code = generate_code;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers an attendee for the event with the given code.
    ///
    /// Every existing ticket counts against capacity, pending ones included.
    pub async fn create_ticket(
        &self,
        event_code: &str,
        attendee: AttendeeDetails,
    ) -> Result<Ticket, LifecycleError> {
        let event = self
            .store
            .find_event_by_code(event_code)
            .await?
            .ok_or(LifecycleError::NotFound("Event"))?;

        let mut last_code = String::new();
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = (self.generate_code)(&event.code);
            let new_ticket = NewTicket::new(event.id, code.clone(), &attendee);

            match self.store.insert_ticket_within_capacity(new_ticket).await {
                Ok(CapacityInsert::Created(ticket)) => {
                    info!(
                        ticket_id = %ticket.id,
                        event_id = %event.id,
                        ticket_code = %ticket.code,
                        "Ticket registered"
                    );
                    return Ok(ticket);
                }
                Ok(CapacityInsert::Full { max_tickets }) => {
                    info!(event_id = %event.id, max_tickets, "Registration refused, event full");
                    return Err(LifecycleError::CapacityExceeded { max_tickets });
                }
                Ok(CapacityInsert::EventMissing) => return Err(LifecycleError::NotFound("Event")),
                Err(StoreError::DuplicateCode(_)) => {
                    warn!(event_id = %event.id, attempt, ticket_code = %code, "Ticket code collision, retrying");
                    last_code = code;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::DuplicateCode(last_code).into())
    }

    /// Confirms payment for a pending ticket.
    ///
    /// Approving an approved ticket returns it unchanged; a used ticket
    /// cannot be approved again.
    pub async fn approve_ticket(
        &self,
        ticket_id: Uuid,
        organizer_id: Uuid,
    ) -> Result<Ticket, LifecycleError> {
        let (ticket, event) = self.load_owned_ticket(ticket_id, organizer_id).await?;

        match ticket.status {
            TicketStatus::Approved => return Ok(ticket),
            TicketStatus::Used => {
                return Err(LifecycleError::InvalidState(InvalidState::AlreadyUsed))
            }
            TicketStatus::Pending => {}
        }

        if let Some(approved) = self.store.approve_if_pending(ticket_id).await? {
            info!(
                ticket_id = %ticket_id,
                event_id = %event.id,
                organizer_id = %organizer_id,
                "Ticket approved"
            );
            return Ok(approved);
        }

        // Lost a race against another approve, a reject or a check-in.
        match self.store.find_ticket_by_id(ticket_id).await? {
            None => Err(LifecycleError::NotFound("Ticket")),
            Some(current) => match current.status {
                TicketStatus::Approved => Ok(current),
                TicketStatus::Used => Err(LifecycleError::InvalidState(InvalidState::AlreadyUsed)),
                TicketStatus::Pending => Err(StoreError::Inconsistent(format!(
                    "ticket {} is pending but could not be approved",
                    ticket_id
                ))
                .into()),
            },
        }
    }

    /// Deletes a ticket in any status, freeing its seat.
    pub async fn reject_ticket(
        &self,
        ticket_id: Uuid,
        organizer_id: Uuid,
    ) -> Result<Ticket, LifecycleError> {
        let (_, event) = self.load_owned_ticket(ticket_id, organizer_id).await?;

        let removed = self
            .store
            .delete_ticket(ticket_id)
            .await?
            .ok_or(LifecycleError::NotFound("Ticket"))?;

        info!(
            ticket_id = %ticket_id,
            event_id = %event.id,
            organizer_id = %organizer_id,
            status = %removed.status,
            "Ticket rejected"
        );
        Ok(removed)
    }

    /// Checks a ticket in using the current server time.
    pub async fn verify_and_check_in(
        &self,
        raw_code: &str,
    ) -> Result<VerificationOutcome, LifecycleError> {
        self.verify_and_check_in_at(raw_code, Utc::now()).await
    }

    /// Checks a ticket in, recording `at` as the check-in time.
    ///
    /// Of any number of calls for one approved ticket exactly one returns
    /// [`VerificationOutcome::Valid`]. Non-valid outcomes write nothing.
    pub async fn verify_and_check_in_at(
        &self,
        raw_code: &str,
        at: DateTime<Utc>,
    ) -> Result<VerificationOutcome, LifecycleError> {
        let code = shared::validation::normalize_ticket_code(raw_code);
        if !is_well_formed_ticket_code(&code) {
            info!(ticket_code = %code, outcome = "invalid", "Ticket verification");
            return Ok(VerificationOutcome::Invalid);
        }

        for _ in 0..CHECK_IN_ROUNDS {
            if let Some(ticket) = self.store.check_in_if_approved(&code, at).await? {
                info!(
                    ticket_id = %ticket.id,
                    event_id = %ticket.event_id,
                    outcome = "valid",
                    "Ticket verification"
                );
                return Ok(VerificationOutcome::Valid(ticket));
            }

            let outcome = match self.store.find_ticket_by_code(&code).await? {
                None => VerificationOutcome::Invalid,
                Some(ticket) => match ticket.status {
                    TicketStatus::Pending => VerificationOutcome::Pending(ticket),
                    TicketStatus::Used => VerificationOutcome::Duplicate(ticket),
                    // Approved between the update and the read; try again.
                    TicketStatus::Approved => continue,
                },
            };

            info!(
                ticket_code = %code,
                outcome = %outcome.status(),
                "Ticket verification"
            );
            return Ok(outcome);
        }

        Err(StoreError::Inconsistent(format!("ticket {} stayed approved after check-in", code)).into())
    }

    async fn load_owned_ticket(
        &self,
        ticket_id: Uuid,
        organizer_id: Uuid,
    ) -> Result<(Ticket, Event), LifecycleError> {
        let ticket = self
            .store
            .find_ticket_by_id(ticket_id)
            .await?
            .ok_or(LifecycleError::NotFound("Ticket"))?;

        let event = self
            .store
            .find_event_by_id(ticket.event_id)
            .await?
            .ok_or(LifecycleError::NotFound("Event"))?;

        if !event.is_owned_by(organizer_id) {
            warn!(
                ticket_id = %ticket_id,
                organizer_id = %organizer_id,
                "Organizer does not own the ticket's event"
            );
            return Err(LifecycleError::Unauthorized);
        }

        Ok((ticket, event))
    }
}
