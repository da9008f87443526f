//! Ticket repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::NewTicket;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::TicketEntity;
use crate::metrics::QueryTimer;

/// Outcome of [`TicketRepository::insert_within_capacity`].
#[derive(Debug, Clone)]
pub enum GuardedInsert {
    Created(TicketEntity),
    Full { max_tickets: i32 },
    EventMissing,
}

/// Repository for ticket-related database operations.
#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    /// Creates a new TicketRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_ticket_by_id");
        let result = sqlx::query_as::<_, TicketEntity>(
            r#"
            SELECT id, event_id, code, attendee_name, attendee_phone, payment_reference,
                   status, checked_in_at, created_at
            FROM tickets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<TicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_ticket_by_code");
        let result = sqlx::query_as::<_, TicketEntity>(
            r#"
            SELECT id, event_id, code, attendee_name, attendee_phone, payment_reference,
                   status, checked_in_at, created_at
            FROM tickets
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// List all of an event's tickets in one read.
    ///
    /// Used tickets come most recent check-in first, the others newest first.
    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<TicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_tickets_for_event");
        let result = sqlx::query_as::<_, TicketEntity>(
            r#"
            SELECT id, event_id, code, attendee_name, attendee_phone, payment_reference,
                   status, checked_in_at, created_at
            FROM tickets
            WHERE event_id = $1
            ORDER BY COALESCE(checked_in_at, created_at) DESC, created_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Insert a pending ticket unless the event is already at capacity.
    ///
    /// The event row is locked for the transaction, so concurrent inserts
    /// for one event are serialized.
    pub async fn insert_within_capacity(
        &self,
        ticket: &NewTicket,
    ) -> Result<GuardedInsert, sqlx::Error> {
        let timer = QueryTimer::new("insert_ticket_within_capacity");
        let result = self.insert_within_capacity_tx(ticket).await;
        timer.finish(result)
    }

    async fn insert_within_capacity_tx(
        &self,
        ticket: &NewTicket,
    ) -> Result<GuardedInsert, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let max_tickets = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT max_tickets FROM events WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(ticket.event_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction rolls it back and releases the lock.
        let Some(max_tickets) = max_tickets else {
            return Ok(GuardedInsert::EventMissing);
        };

        let held = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM tickets WHERE event_id = $1
            "#,
        )
        .bind(ticket.event_id)
        .fetch_one(&mut *tx)
        .await?;

        if held >= i64::from(max_tickets) {
            return Ok(GuardedInsert::Full { max_tickets });
        }

        let created = sqlx::query_as::<_, TicketEntity>(
            r#"
            INSERT INTO tickets (event_id, code, attendee_name, attendee_phone, payment_reference)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, event_id, code, attendee_name, attendee_phone, payment_reference,
                      status, checked_in_at, created_at
            "#,
        )
        .bind(ticket.event_id)
        .bind(&ticket.code)
        .bind(&ticket.attendee_name)
        .bind(&ticket.attendee_phone)
        .bind(&ticket.payment_reference)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(GuardedInsert::Created(created))
    }

    /// Approve a ticket only if it is still pending.
    pub async fn approve_if_pending(&self, id: Uuid) -> Result<Option<TicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("approve_ticket_if_pending");
        let result = sqlx::query_as::<_, TicketEntity>(
            r#"
            UPDATE tickets
            SET status = 'approved'
            WHERE id = $1 AND status = 'pending'
            RETURNING id, event_id, code, attendee_name, attendee_phone, payment_reference,
                      status, checked_in_at, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Mark an approved ticket as used.
    pub async fn check_in_if_approved(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<TicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("check_in_ticket_if_approved");
        let result = sqlx::query_as::<_, TicketEntity>(
            r#"
            UPDATE tickets
            SET status = 'used', checked_in_at = $2
            WHERE code = $1 AND status = 'approved'
            RETURNING id, event_id, code, attendee_name, attendee_phone, payment_reference,
                      status, checked_in_at, created_at
            "#,
        )
        .bind(code)
        .bind(at)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Delete a ticket, returning the removed row.
    pub async fn delete(&self, id: Uuid) -> Result<Option<TicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("delete_ticket");
        let result = sqlx::query_as::<_, TicketEntity>(
            r#"
            DELETE FROM tickets
            WHERE id = $1
            RETURNING id, event_id, code, attendee_name, attendee_phone, payment_reference,
                      status, checked_in_at, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }
}
