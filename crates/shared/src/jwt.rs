//! Organizer access tokens signed with HS256.
//!
//! An access token identifies the acting organizer on every organizer-scoped
//! request. There is no refresh flow; clients log in again once it expires.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Minimum accepted signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Default leeway in seconds for clock skew tolerance.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Error type for token operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Claims carried by an organizer access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Organizer ID
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    /// Unique token identifier, logged for correlation.
    pub jti: String,
}

/// A freshly issued access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_in: i64,
}

/// Signing and validation settings for organizer tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    pub access_token_expiry_secs: i64,
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Creates a config from a shared secret.
    ///
    /// Secrets shorter than [`MIN_SECRET_LEN`] bytes are rejected.
    pub fn new(secret: &str, access_token_expiry_secs: i64, leeway_secs: u64) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::InvalidKey(format!(
                "Secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs,
            leeway_secs,
        })
    }

    /// Issues an access token for the given organizer.
    pub fn generate_access_token(&self, organizer_id: Uuid) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: organizer_id.to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            jti,
            expires_in: self.access_token_expiry_secs,
        })
    }

    /// Validates a token and returns its claims.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}

/// Extracts the organizer ID from validated claims.
pub fn extract_organizer_id(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_for_gatepass_tokens_0123456789";

    fn config() -> JwtConfig {
        JwtConfig::new(SECRET, 900, 0).unwrap()
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = JwtConfig::new("too-short", 900, 0);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let config = config();
        let organizer_id = Uuid::new_v4();

        let issued = config.generate_access_token(organizer_id).unwrap();
        let claims = config.validate_access_token(&issued.token).unwrap();

        assert_eq!(claims.jti, issued.jti);
        assert_eq!(extract_organizer_id(&claims).unwrap(), organizer_id);
        assert_eq!(issued.expires_in, 900);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_invalid() {
        let other = JwtConfig::new("another_secret_key_that_is_long_enough_00", 900, 0).unwrap();
        let issued = other.generate_access_token(Uuid::new_v4()).unwrap();

        let result = config().validate_access_token(&issued.token);
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_expired_token() {
        let mut config = config();
        config.access_token_expiry_secs = -120;
        let issued = config.generate_access_token(Uuid::new_v4()).unwrap();

        let result = config.validate_access_token(&issued.token);
        assert!(matches!(result, Err(JwtError::TokenExpired)), "{:?}", result);
    }

    #[test]
    fn test_malformed_token() {
        assert!(config().validate_access_token("not_a_jwt").is_err());
    }

    #[test]
    fn test_unique_jti_per_token() {
        let config = config();
        let organizer_id = Uuid::new_v4();
        let first = config.generate_access_token(organizer_id).unwrap();
        let second = config.generate_access_token(organizer_id).unwrap();
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_claims_timestamps() {
        let config = config();
        let issued = config.generate_access_token(Uuid::new_v4()).unwrap();
        let claims = config.validate_access_token(&issued.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(SECRET));
    }

    #[test]
    fn test_non_uuid_subject() {
        let claims = Claims {
            sub: "organizer-7".to_string(),
            exp: 0,
            iat: 0,
            jti: String::new(),
        };
        assert!(matches!(
            extract_organizer_id(&claims),
            Err(JwtError::InvalidToken)
        ));
    }
}
