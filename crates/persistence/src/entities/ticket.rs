//! Ticket entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Ticket, TicketStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for ticket status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "lowercase")]
pub enum TicketStatusDb {
    Pending,
    Approved,
    Used,
}

impl From<TicketStatusDb> for TicketStatus {
    fn from(status: TicketStatusDb) -> Self {
        match status {
            TicketStatusDb::Pending => TicketStatus::Pending,
            TicketStatusDb::Approved => TicketStatus::Approved,
            TicketStatusDb::Used => TicketStatus::Used,
        }
    }
}

impl From<TicketStatus> for TicketStatusDb {
    fn from(status: TicketStatus) -> Self {
        match status {
            TicketStatus::Pending => TicketStatusDb::Pending,
            TicketStatus::Approved => TicketStatusDb::Approved,
            TicketStatus::Used => TicketStatusDb::Used,
        }
    }
}

/// Database row mapping for the tickets table.
#[derive(Debug, Clone, FromRow)]
pub struct TicketEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub code: String,
    pub attendee_name: String,
    pub attendee_phone: String,
    pub payment_reference: Option<String>,
    pub status: TicketStatusDb,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<TicketEntity> for Ticket {
    fn from(entity: TicketEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            code: entity.code,
            attendee_name: entity.attendee_name,
            attendee_phone: entity.attendee_phone,
            payment_reference: entity.payment_reference,
            status: entity.status.into(),
            checked_in_at: entity.checked_in_at,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversions() {
        for status in [TicketStatus::Pending, TicketStatus::Approved, TicketStatus::Used] {
            let db: TicketStatusDb = status.into();
            assert_eq!(TicketStatus::from(db), status);
        }
    }

    #[test]
    fn test_entity_to_domain() {
        let now = Utc::now();
        let entity = TicketEntity {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            code: "SPRING26-0A1B2C3D".to_string(),
            attendee_name: "Bo".to_string(),
            attendee_phone: "0712345678".to_string(),
            payment_reference: Some("QJK81XZ".to_string()),
            status: TicketStatusDb::Used,
            checked_in_at: Some(now),
            created_at: now,
        };

        let ticket: Ticket = entity.into();
        assert_eq!(ticket.status, TicketStatus::Used);
        assert_eq!(ticket.checked_in_at, Some(now));
        assert_eq!(ticket.payment_reference.as_deref(), Some("QJK81XZ"));
    }
}
