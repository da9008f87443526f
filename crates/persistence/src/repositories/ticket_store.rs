//! PostgreSQL implementation of the lifecycle's [`TicketStore`].

use chrono::{DateTime, Utc};
use domain::models::{Event, NewTicket, Ticket};
use domain::services::{CapacityInsert, StoreError, TicketStore};
use sqlx::PgPool;
use uuid::Uuid;

use super::event::EventRepository;
use super::ticket::{GuardedInsert, TicketRepository};
use crate::db::is_unique_violation;

/// Unique constraint on `tickets.code`.
const TICKET_CODE_CONSTRAINT: &str = "tickets_code_key";

/// Ticket store backed by the `events` and `tickets` tables.
#[derive(Clone)]
pub struct PgTicketStore {
    events: EventRepository,
    tickets: TicketRepository,
}

impl PgTicketStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            tickets: TicketRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl TicketStore for PgTicketStore {
    async fn find_event_by_code(&self, code: &str) -> Result<Option<Event>, StoreError> {
        Ok(self.events.find_by_code(code).await?.map(Into::into))
    }

    async fn find_event_by_id(&self, event_id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(self.events.find_by_id(event_id).await?.map(Into::into))
    }

    async fn find_ticket_by_id(&self, ticket_id: Uuid) -> Result<Option<Ticket>, StoreError> {
        Ok(self.tickets.find_by_id(ticket_id).await?.map(Into::into))
    }

    async fn find_ticket_by_code(&self, code: &str) -> Result<Option<Ticket>, StoreError> {
        Ok(self.tickets.find_by_code(code).await?.map(Into::into))
    }

    async fn insert_ticket_within_capacity(
        &self,
        ticket: NewTicket,
    ) -> Result<CapacityInsert, StoreError> {
        match self.tickets.insert_within_capacity(&ticket).await {
            Ok(GuardedInsert::Created(entity)) => Ok(CapacityInsert::Created(entity.into())),
            Ok(GuardedInsert::Full { max_tickets }) => Ok(CapacityInsert::Full { max_tickets }),
            Ok(GuardedInsert::EventMissing) => Ok(CapacityInsert::EventMissing),
            Err(e) if is_unique_violation(&e, TICKET_CODE_CONSTRAINT) => {
                tracing::debug!(ticket_code = %ticket.code, "Ticket code already taken");
                Err(StoreError::DuplicateCode(ticket.code))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn approve_if_pending(&self, ticket_id: Uuid) -> Result<Option<Ticket>, StoreError> {
        Ok(self.tickets.approve_if_pending(ticket_id).await?.map(Into::into))
    }

    async fn delete_ticket(&self, ticket_id: Uuid) -> Result<Option<Ticket>, StoreError> {
        Ok(self.tickets.delete(ticket_id).await?.map(Into::into))
    }

    async fn check_in_if_approved(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, StoreError> {
        Ok(self
            .tickets
            .check_in_if_approved(code, at)
            .await?
            .map(Into::into))
    }
}
