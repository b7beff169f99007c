use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::utils::response::Envelope;

/// Abstract classification a user service attaches to its errors.
///
/// The router never inspects the service's own error model; it only maps
/// this tag to an envelope code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Unauthenticated,
    NotFound,
    AlreadyExists,
    Conflict,
    Cancelled,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyExists | ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Cancelled => StatusCode::REQUEST_TIMEOUT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error returned by a user service. Displays as its message, verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

// Internal failures inside a service (hashing, token signing) carry their
// context chain as the message.
impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        ServiceError::internal(format!("{:#}", err))
    }
}

/// Unified error type for the HTTP boundary.
///
/// Either the binder rejected the input, or the delegated service call failed.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(err) => err.kind.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Validation(msg) => tracing::warn!("Request rejected by binder: {}", msg),
            ApiError::Service(err) if status.is_server_error() => {
                tracing::error!(kind = ?err.kind, "User service failed: {}", err)
            }
            ApiError::Service(err) => tracing::debug!(kind = ?err.kind, "User service refused: {}", err),
        }

        Envelope::<()>::failed(status, self.to_string()).into_response()
    }
}

// Convert validator::ValidationErrors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn extract_envelope_json(response: Response) -> serde_json::Value {
        let body = response.into_body();
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_response() {
        let error = ApiError::Validation("missing field `name`".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = extract_envelope_json(response).await;
        assert_eq!(json["code"], 400);
        assert!(json["message"].as_str().unwrap().contains("missing field `name`"));
        assert!(json["result"].is_null());
    }

    #[tokio::test]
    async fn test_service_message_passes_through_verbatim() {
        let error = ApiError::from(ServiceError::not_found("user 7 not found"));
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = extract_envelope_json(response).await;
        assert_eq!(json["code"], 404);
        assert_eq!(json["message"], "user 7 not found");
        assert!(json["result"].is_null());
    }

    #[tokio::test]
    async fn test_internal_error_response() {
        let error = ApiError::from(ServiceError::internal("storage offline"));
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = extract_envelope_json(response).await;
        assert_eq!(json["message"], "storage offline");
    }

    #[test]
    fn test_kind_status_mapping() {
        assert_eq!(ErrorKind::InvalidArgument.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::AlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::Cancelled.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(ErrorKind::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_anyhow_error() {
        let anyhow_err = anyhow::anyhow!("disk full").context("Failed to hash password");
        let service_error: ServiceError = anyhow_err.into();

        assert_eq!(service_error.kind, ErrorKind::Internal);
        assert_eq!(service_error.message, "Failed to hash password: disk full");
    }

    #[test]
    fn test_error_display() {
        let error = ApiError::Validation("Invalid URL".to_string());
        assert_eq!(error.to_string(), "Validation error: Invalid URL");

        let error = ApiError::from(ServiceError::conflict("resource version mismatch"));
        assert_eq!(error.to_string(), "resource version mismatch");
    }
}
