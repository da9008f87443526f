//! Event repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::entities::{EventEntity, EventWithCountsEntity, EventWithOrganizerEntity};
use crate::metrics::QueryTimer;

/// Maximum event codes tried before giving up.
const MAX_CODE_ATTEMPTS: usize = 100;

/// Unique constraint on `events.code`.
const EVENT_CODE_CONSTRAINT: &str = "events_code_key";

/// Values for a new event row. The code is allocated on insert.
#[derive(Debug, Clone)]
pub struct EventInput<'a> {
    pub organizer_id: Uuid,
    pub name: &'a str,
    pub date: &'a str,
    pub venue: &'a str,
    pub max_tickets: i32,
    pub ticket_price: i32,
}

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an event under a fresh code from `generate_code`.
    ///
    /// A code already taken by another event is replaced and the insert
    /// retried.
    pub async fn create_with_unique_code<F>(
        &self,
        input: &EventInput<'_>,
        generate_code: F,
    ) -> Result<EventEntity, sqlx::Error>
    where
        F: Fn() -> String,
    {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code();
            match self.insert(&code, input).await {
                Err(e) if is_unique_violation(&e, EVENT_CODE_CONSTRAINT) => {
                    tracing::debug!(event_code = %code, attempt, "Event code already taken");
                }
                other => return other,
            }
        }

        Err(sqlx::Error::Protocol(
            "Could not generate unique event code".to_string(),
        ))
    }

    async fn insert(&self, code: &str, input: &EventInput<'_>) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (organizer_id, code, name, date, venue, max_tickets, ticket_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, organizer_id, code, name, date, venue, max_tickets, ticket_price, created_at
            "#,
        )
        .bind(input.organizer_id)
        .bind(code)
        .bind(input.name)
        .bind(input.date)
        .bind(input.venue)
        .bind(input.max_tickets)
        .bind(input.ticket_price)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, organizer_id, code, name, date, venue, max_tickets, ticket_price, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_code");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, organizer_id, code, name, date, venue, max_tickets, ticket_price, created_at
            FROM events
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Find an event by code together with its organizer's phone and ticket count.
    pub async fn find_public_by_code(
        &self,
        code: &str,
    ) -> Result<Option<EventWithOrganizerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_public_event_by_code");
        let result = sqlx::query_as::<_, EventWithOrganizerEntity>(
            r#"
            SELECT e.id, e.organizer_id, e.code, e.name, e.date, e.venue,
                   e.max_tickets, e.ticket_price, e.created_at,
                   o.phone AS organizer_phone,
                   (SELECT COUNT(*) FROM tickets t WHERE t.event_id = e.id) AS ticket_count
            FROM events e
            JOIN organizers o ON o.id = e.organizer_id
            WHERE e.code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Same as [`find_public_by_code`](Self::find_public_by_code), by event ID.
    pub async fn find_public_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<EventWithOrganizerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_public_event_by_id");
        let result = sqlx::query_as::<_, EventWithOrganizerEntity>(
            r#"
            SELECT e.id, e.organizer_id, e.code, e.name, e.date, e.venue,
                   e.max_tickets, e.ticket_price, e.created_at,
                   o.phone AS organizer_phone,
                   (SELECT COUNT(*) FROM tickets t WHERE t.event_id = e.id) AS ticket_count
            FROM events e
            JOIN organizers o ON o.id = e.organizer_id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// List an organizer's events, newest first, with ticket counts by status.
    pub async fn list_for_organizer_with_counts(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<EventWithCountsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_for_organizer");
        let result = sqlx::query_as::<_, EventWithCountsEntity>(
            r#"
            SELECT e.id, e.organizer_id, e.code, e.name, e.date, e.venue,
                   e.max_tickets, e.ticket_price, e.created_at,
                   COUNT(t.id) FILTER (WHERE t.status = 'pending') AS pending_count,
                   COUNT(t.id) FILTER (WHERE t.status = 'approved') AS approved_count,
                   COUNT(t.id) FILTER (WHERE t.status = 'used') AS used_count
            FROM events e
            LEFT JOIN tickets t ON t.event_id = e.id
            WHERE e.organizer_id = $1
            GROUP BY e.id
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }
}
