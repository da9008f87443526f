use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::{InvalidState, LifecycleError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The event has no seats left.
    #[error("Capacity full: {0}")]
    CapacityFull(String),

    #[error("Already used: {0}")]
    AlreadyUsed(String),

    #[error("Not approved: {0}")]
    NotApproved(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::CapacityFull(msg) => (StatusCode::CONFLICT, "capacity_full", msg),
            ApiError::AlreadyUsed(msg) => (StatusCode::CONFLICT, "already_used", msg),
            ApiError::NotApproved(msg) => (StatusCode::CONFLICT, "not_approved", msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => ApiError::Conflict("Resource already exists".into()),
                Some("23503") => ApiError::NotFound("Referenced resource not found".into()),
                _ => ApiError::Internal(format!("Database error: {}", db_err)),
            },
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotFound(_) => ApiError::NotFound(err.to_string()),
            LifecycleError::Unauthorized => ApiError::Forbidden(err.to_string()),
            LifecycleError::CapacityExceeded { .. } => ApiError::CapacityFull(err.to_string()),
            LifecycleError::InvalidState(InvalidState::AlreadyUsed) => {
                ApiError::AlreadyUsed(err.to_string())
            }
            LifecycleError::InvalidState(InvalidState::NotYetApproved) => {
                ApiError::NotApproved(err.to_string())
            }
            LifecycleError::Store(e) => ApiError::Internal(format!("Ticket store error: {}", e)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .collect();
        messages.sort();

        let message = if messages.len() == 1 {
            messages.remove(0)
        } else {
            format!("{} validation errors: {}", messages.len(), messages.join("; "))
        };

        ApiError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::services::StoreError;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_api_error_statuses() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::CapacityFull("x".into()), StatusCode::CONFLICT),
            (ApiError::AlreadyUsed("x".into()), StatusCode::CONFLICT),
            (ApiError::NotApproved("x".into()), StatusCode::CONFLICT),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::ServiceUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_capacity_full_body() {
        let error: ApiError = LifecycleError::CapacityExceeded { max_tickets: 1 }.into();
        let body = body_json(error.into_response()).await;
        assert_eq!(body["error"], "capacity_full");
        assert_eq!(body["message"], "Event is full (1 tickets)");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let error = ApiError::Internal("password=hunter2 connection refused".into());
        let body = body_json(error.into_response()).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_from_lifecycle_error() {
        assert!(matches!(
            ApiError::from(LifecycleError::NotFound("Ticket")),
            ApiError::NotFound(msg) if msg == "Ticket not found"
        ));
        assert!(matches!(
            ApiError::from(LifecycleError::Unauthorized),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(LifecycleError::InvalidState(InvalidState::AlreadyUsed)),
            ApiError::AlreadyUsed(_)
        ));
        assert!(matches!(
            ApiError::from(LifecycleError::InvalidState(InvalidState::NotYetApproved)),
            ApiError::NotApproved(_)
        ));
        assert!(matches!(
            ApiError::from(LifecycleError::Store(StoreError::DuplicateCode("X-1".into()))),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_from_validation_errors() {
        let request = domain::models::CreateEventRequest {
            name: "Gala".to_string(),
            date: "Friday".to_string(),
            venue: "Hall".to_string(),
            max_tickets: 0,
            ticket_price: 0,
        };
        let error: ApiError = request.validate().unwrap_err().into();
        match error {
            ApiError::Validation(msg) => {
                assert_eq!(msg, "max_tickets must be between 1 and 100000")
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::CapacityFull("Event is full".into()).to_string(),
            "Capacity full: Event is full"
        );
        assert_eq!(ApiError::RateLimited.to_string(), "Rate limited");
    }
}
