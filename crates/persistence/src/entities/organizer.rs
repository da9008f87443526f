//! Organizer entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the organizers table.
#[derive(Debug, Clone, FromRow)]
pub struct OrganizerEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<OrganizerEntity> for domain::models::Organizer {
    fn from(entity: OrganizerEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            phone: entity.phone,
            created_at: entity.created_at,
        }
    }
}
