//! Organizer registration and login routes.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{LoginRequest, Organizer, RegisterOrganizerRequest};
use persistence::repositories::OrganizerRepository;
use serde::Serialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{jwt_config, AuthResult, AuthService};

/// Response body for a successful registration or login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthResponse {
    pub organizer: Organizer,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            organizer: result.organizer,
            access_token: result.token.token,
            token_type: "Bearer".to_string(),
            expires_in: result.token.expires_in,
        }
    }
}

fn auth_service(state: &AppState) -> Result<AuthService, ApiError> {
    Ok(AuthService::new(
        OrganizerRepository::new(state.pool.clone()),
        jwt_config(&state.config.jwt)?,
    ))
}

/// Register a new organizer.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterOrganizerRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let result = auth_service(&state)?
        .register(&request.email, &request.password, &request.phone)
        .await?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// Log in with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let result = auth_service(&state)?
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(result.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::jwt::IssuedToken;
    use uuid::Uuid;

    #[test]
    fn test_auth_response_serialization() {
        let result = AuthResult {
            organizer: Organizer {
                id: Uuid::new_v4(),
                email: "host@example.com".to_string(),
                phone: "0712345678".to_string(),
                created_at: Utc::now(),
            },
            token: IssuedToken {
                token: "header.payload.sig".to_string(),
                jti: "jti".to_string(),
                expires_in: 3600,
            },
        };

        let json = serde_json::to_value(AuthResponse::from(result)).unwrap();
        assert_eq!(json["access_token"], "header.payload.sig");
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["expires_in"], 3600);
        assert_eq!(json["organizer"]["email"], "host@example.com");
        assert!(json["organizer"].get("password_hash").is_none());
    }
}
