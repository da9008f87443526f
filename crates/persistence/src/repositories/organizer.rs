//! Organizer repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::OrganizerEntity;
use crate::metrics::QueryTimer;

/// Repository for organizer account operations.
#[derive(Clone)]
pub struct OrganizerRepository {
    pool: PgPool,
}

impl OrganizerRepository {
    /// Creates a new OrganizerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an organizer. `email` must already be normalized.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        phone: &str,
    ) -> Result<OrganizerEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_organizer");
        let result = sqlx::query_as::<_, OrganizerEntity>(
            r#"
            INSERT INTO organizers (email, password_hash, phone)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, phone, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(phone)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<OrganizerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_organizer_by_email");
        let result = sqlx::query_as::<_, OrganizerEntity>(
            r#"
            SELECT id, email, password_hash, phone, created_at
            FROM organizers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrganizerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_organizer_by_id");
        let result = sqlx::query_as::<_, OrganizerEntity>(
            r#"
            SELECT id, email, password_hash, phone, created_at
            FROM organizers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Check whether an email is already registered.
    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_organizer_email_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM organizers WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }
}
