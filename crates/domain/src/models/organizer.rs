//! Organizer domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An organizer account. The credential hash never leaves the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Organizer {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Request to register a new organizer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RegisterOrganizerRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 120, message = "Email must be at most 120 characters"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    /// Contact phone shown to attendees for payment.
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: String,
}

/// Request to log in as an organizer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
