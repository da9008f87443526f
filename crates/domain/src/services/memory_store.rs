//! In-memory [`TicketStore`] for development and testing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::store::{CapacityInsert, StoreError, TicketStore};
use crate::models::{Event, NewTicket, Ticket, TicketStatus};

#[derive(Debug, Default)]
struct Inner {
    events: HashMap<Uuid, Event>,
    tickets: HashMap<Uuid, Ticket>,
    /// Number of successful ticket writes (insert, update, delete).
    mutations: u64,
}

/// Ticket store kept behind a single mutex.
///
/// Each trait operation takes the lock once, so check-and-write steps are
/// atomic with respect to each other just like the database transactions.
#[derive(Debug, Default)]
pub struct InMemoryTicketStore {
    inner: Mutex<Inner>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event owned by `organizer_id` and returns it.
    pub async fn insert_event(&self, organizer_id: Uuid, code: &str, max_tickets: i32) -> Event {
        let event = Event {
            id: Uuid::new_v4(),
            organizer_id,
            code: code.to_string(),
            name: format!("Event {}", code),
            date: "2026-11-02 19:00".to_string(),
            venue: "Main Hall".to_string(),
            max_tickets,
            ticket_price: 0,
            created_at: Utc::now(),
        };

        self.inner
            .lock()
            .await
            .events
            .insert(event.id, event.clone());
        event
    }

    /// Number of ticket writes performed so far.
    pub async fn mutation_count(&self) -> u64 {
        self.inner.lock().await.mutations
    }

    /// Tickets of one event, in no particular order.
    pub async fn tickets_for_event(&self, event_id: Uuid) -> Vec<Ticket> {
        self.inner
            .lock()
            .await
            .tickets
            .values()
            .filter(|t| t.event_id == event_id)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn find_event_by_code(&self, code: &str) -> Result<Option<Event>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.events.values().find(|e| e.code == code).cloned())
    }

    async fn find_event_by_id(&self, event_id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(self.inner.lock().await.events.get(&event_id).cloned())
    }

    async fn find_ticket_by_id(&self, ticket_id: Uuid) -> Result<Option<Ticket>, StoreError> {
        Ok(self.inner.lock().await.tickets.get(&ticket_id).cloned())
    }

    async fn find_ticket_by_code(&self, code: &str) -> Result<Option<Ticket>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.tickets.values().find(|t| t.code == code).cloned())
    }

    async fn insert_ticket_within_capacity(
        &self,
        ticket: NewTicket,
    ) -> Result<CapacityInsert, StoreError> {
        let mut inner = self.inner.lock().await;

        let max_tickets = match inner.events.get(&ticket.event_id) {
            Some(event) => event.max_tickets,
            None => return Ok(CapacityInsert::EventMissing),
        };

        let held = inner
            .tickets
            .values()
            .filter(|t| t.event_id == ticket.event_id)
            .count() as i64;
        if held >= i64::from(max_tickets) {
            return Ok(CapacityInsert::Full { max_tickets });
        }

        if inner.tickets.values().any(|t| t.code == ticket.code) {
            return Err(StoreError::DuplicateCode(ticket.code));
        }

        let created = Ticket {
            id: Uuid::new_v4(),
            event_id: ticket.event_id,
            code: ticket.code,
            attendee_name: ticket.attendee_name,
            attendee_phone: ticket.attendee_phone,
            payment_reference: ticket.payment_reference,
            status: TicketStatus::Pending,
            checked_in_at: None,
            created_at: Utc::now(),
        };
        inner.tickets.insert(created.id, created.clone());
        inner.mutations += 1;

        Ok(CapacityInsert::Created(created))
    }

    async fn approve_if_pending(&self, ticket_id: Uuid) -> Result<Option<Ticket>, StoreError> {
        let mut inner = self.inner.lock().await;

        let approved = match inner.tickets.get_mut(&ticket_id) {
            Some(ticket) if ticket.status == TicketStatus::Pending => {
                ticket.status = TicketStatus::Approved;
                ticket.clone()
            }
            _ => return Ok(None),
        };
        inner.mutations += 1;

        Ok(Some(approved))
    }

    async fn delete_ticket(&self, ticket_id: Uuid) -> Result<Option<Ticket>, StoreError> {
        let mut inner = self.inner.lock().await;

        let removed = inner.tickets.remove(&ticket_id);
        if removed.is_some() {
            inner.mutations += 1;
        }
        Ok(removed)
    }

    async fn check_in_if_approved(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, StoreError> {
        let mut inner = self.inner.lock().await;

        let used = match inner
            .tickets
            .values_mut()
            .find(|t| t.code == code && t.status == TicketStatus::Approved)
        {
            Some(ticket) => {
                ticket.status = TicketStatus::Used;
                ticket.checked_in_at = Some(at);
                ticket.clone()
            }
            None => return Ok(None),
        };
        inner.mutations += 1;

        Ok(Some(used))
    }
}
