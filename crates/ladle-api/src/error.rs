//! API error handling
//!
//! Every failure below the handler boundary is mapped here to a status code
//! and a `{status: "error", message}` JSON body. Internal detail (store
//! driver messages, hashing failures) is logged and never serialized to the
//! client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ladle_core::StoreError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Path of the offending field
    pub field: String,
    /// Human-readable message
    pub message: String,
}

/// JSON body shared by every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `"error"`
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Field-level details, present for validation failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            errors: None,
        }
    }

    fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Application error type.
///
/// All request failures are terminal; nothing is retried.
#[derive(Debug)]
pub enum AppError {
    /// Client payload violated schema rules
    Validation(Vec<FieldError>),
    /// Uniqueness violation; names the colliding field
    Conflict(&'static str),
    /// No access token present
    Unauthenticated,
    /// Token present but malformed, tampered, or expired
    InvalidToken,
    /// Authenticated but not the owner of the target resource
    Forbidden,
    /// Target resource absent; names the resource kind
    NotFound(&'static str),
    /// Login failure, deliberately undifferentiated
    InvalidCredentials,
    /// Unexpected failure (hashing, token issuance, timeouts)
    Internal(String),
    /// Store transport failure
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Validation failed").with_errors(errors),
            ),
            AppError::Conflict(field) => (
                StatusCode::CONFLICT,
                ErrorBody::new(format!("{field} is already taken")),
            ),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Access token is missing"),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Invalid or expired access token"),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorBody::new("You don't have permission to perform this action"),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new(format!("{resource} not found")),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Invalid credentials"),
            ),
            AppError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal server error"),
                )
            }
            AppError::Database(detail) => {
                tracing::error!(%detail, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { field } => AppError::Conflict(field),
            StoreError::Database(detail) => AppError::Database(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_status_codes() {
        assert_eq!(
            body_of(AppError::Validation(vec![])).await.0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            body_of(AppError::Conflict("email")).await.0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            body_of(AppError::Unauthenticated).await.0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            body_of(AppError::InvalidToken).await.0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(body_of(AppError::Forbidden).await.0, StatusCode::FORBIDDEN);
        assert_eq!(
            body_of(AppError::NotFound("Recipe")).await.0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            body_of(AppError::InvalidCredentials).await.0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            body_of(AppError::Internal("boom".to_string())).await.0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_every_body_has_error_status_and_message() {
        let (_, json) = body_of(AppError::NotFound("User")).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "User not found");
    }

    #[tokio::test]
    async fn test_validation_body_carries_field_errors() {
        let (_, json) = body_of(AppError::Validation(vec![FieldError {
            field: "password".to_string(),
            message: "Password must be between 8 and 255 characters".to_string(),
        }]))
        .await;

        assert_eq!(json["errors"][0]["field"], "password");
        assert!(json["errors"][0]["message"]
            .as_str()
            .unwrap()
            .contains("8 and 255"));
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let (_, json) = body_of(AppError::Database("connection refused to 10.0.0.5".into())).await;
        assert_eq!(json["message"], "Internal server error");
        assert!(!json.to_string().contains("10.0.0.5"));
    }

    #[tokio::test]
    async fn test_store_conflict_maps_to_conflict() {
        let err: AppError = StoreError::Conflict { field: "username" }.into();
        let (status, json) = body_of(err).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["message"], "username is already taken");
    }
}
