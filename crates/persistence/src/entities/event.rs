//! Event entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Event, TicketCounts};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub code: String,
    pub name: String,
    pub date: String,
    pub venue: String,
    pub max_tickets: i32,
    pub ticket_price: i32,
    pub created_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            organizer_id: entity.organizer_id,
            code: entity.code,
            name: entity.name,
            date: entity.date,
            venue: entity.venue,
            max_tickets: entity.max_tickets,
            ticket_price: entity.ticket_price,
            created_at: entity.created_at,
        }
    }
}

/// Event row joined with its ticket counts by status.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithCountsEntity {
    #[sqlx(flatten)]
    pub event: EventEntity,
    pub pending_count: i64,
    pub approved_count: i64,
    pub used_count: i64,
}

impl EventWithCountsEntity {
    pub fn counts(&self) -> TicketCounts {
        TicketCounts {
            pending: self.pending_count,
            approved: self.approved_count,
            used: self.used_count,
        }
    }
}

/// Event row joined with the owning organizer's contact phone.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithOrganizerEntity {
    #[sqlx(flatten)]
    pub event: EventEntity,
    pub organizer_phone: String,
    pub ticket_count: i64,
}
