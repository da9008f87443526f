//! Storage seam for the ticket lifecycle.
//!
//! Every state change goes through a single conditional operation so that
//! two requests racing on the same event or ticket cannot both win.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Event, NewTicket, Ticket};

/// Infrastructure failure raised by a [`TicketStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another ticket already carries this code.
    #[error("Ticket code already exists: {0}")]
    DuplicateCode(String),

    /// The store changed underneath an operation in a way it could not settle.
    #[error("Inconsistent store state: {0}")]
    Inconsistent(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result of an insert guarded by the event's capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapacityInsert {
    Created(Ticket),
    /// The event already holds `max_tickets` tickets; nothing was written.
    Full { max_tickets: i32 },
    /// The event disappeared before the insert.
    EventMissing,
}

/// Persistence operations the lifecycle depends on.
#[async_trait::async_trait]
pub trait TicketStore: Send + Sync {
    async fn find_event_by_code(&self, code: &str) -> Result<Option<Event>, StoreError>;

    async fn find_event_by_id(&self, event_id: Uuid) -> Result<Option<Event>, StoreError>;

    async fn find_ticket_by_id(&self, ticket_id: Uuid) -> Result<Option<Ticket>, StoreError>;

    async fn find_ticket_by_code(&self, code: &str) -> Result<Option<Ticket>, StoreError>;

    /// Counts the event's tickets and inserts the new one only while the
    /// count is below `max_tickets`, as one atomic step.
    async fn insert_ticket_within_capacity(
        &self,
        ticket: NewTicket,
    ) -> Result<CapacityInsert, StoreError>;

    /// Moves a pending ticket to approved. Returns `None` when the ticket is
    /// missing or not pending.
    async fn approve_if_pending(&self, ticket_id: Uuid) -> Result<Option<Ticket>, StoreError>;

    /// Removes a ticket and returns its last state.
    async fn delete_ticket(&self, ticket_id: Uuid) -> Result<Option<Ticket>, StoreError>;

    /// Marks an approved ticket as used at `at`. Returns `None` when no
    /// approved ticket carries the code.
    async fn check_in_if_approved(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, StoreError>;
}
