//! Organizer registration and login.

use domain::models::Organizer;
use persistence::repositories::OrganizerRepository;
use shared::jwt::{IssuedToken, JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::normalize_email;
use thiserror::Error;

use crate::config::JwtAuthConfig;
use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    /// Same message for unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::DatabaseError(db_err) => ApiError::from(db_err),
            AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
        }
    }
}

/// Builds the token signer/validator from configuration.
pub fn jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, ApiError> {
    JwtConfig::new(
        &config.secret,
        config.access_token_expiry_secs,
        config.leeway_secs,
    )
    .map_err(|e| ApiError::Internal(format!("Failed to initialize JWT config: {}", e)))
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub organizer: Organizer,
    pub token: IssuedToken,
}

/// Authentication service.
pub struct AuthService {
    organizers: OrganizerRepository,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(organizers: OrganizerRepository, jwt: JwtConfig) -> Self {
        Self { organizers, jwt }
    }

    /// Register a new organizer. Input must already be validated.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        phone: &str,
    ) -> Result<AuthResult, AuthError> {
        let email = normalize_email(email);

        if self.organizers.email_exists(&email).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        let entity = match self
            .organizers
            .create(&email, &password_hash, phone.trim())
            .await
        {
            Ok(entity) => entity,
            // Concurrent registration with the same email
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                return Err(AuthError::EmailAlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        let organizer: Organizer = entity.into();
        let token = self.jwt.generate_access_token(organizer.id)?;

        tracing::info!(organizer_id = %organizer.id, jti = %token.jti, "Organizer registered");

        Ok(AuthResult { organizer, token })
    }

    /// Log in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let entity = self
            .organizers
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &entity.password_hash)? {
            tracing::info!(organizer_id = %entity.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let organizer: Organizer = entity.into();
        let token = self.jwt.generate_access_token(organizer.id)?;

        tracing::info!(organizer_id = %organizer.id, jti = %token.jti, "Organizer logged in");

        Ok(AuthResult { organizer, token })
    }
}
