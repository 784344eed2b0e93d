use axum::http::StatusCode;
use thiserror::Error;

use crate::{dao::storage::StorageError, dto::common::InvalidId};

/// Outcome of a failed operation, tagged by who is at fault.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required field is missing; reported before touching the store.
    #[error("{0}")]
    InvalidInput(String),
    /// The store failed or rejected a statement.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Anything else that prevented the operation from completing.
    #[error("{0}")]
    Internal(String),
}

impl From<InvalidId> for ServiceError {
    fn from(err: InvalidId) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// No operation matches the request.
    #[error("{0}")]
    NotFound(String),
    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Status code reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Unmatched `(method, action)` pair.
    pub fn route_not_found() -> Self {
        AppError::NotFound("Not found".into())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::Storage(source) => AppError::Internal(source.to_string()),
            ServiceError::Internal(message) => AppError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let invalid: AppError = ServiceError::InvalidInput("Player ID required".into()).into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.to_string(), "Player ID required");

        let storage: AppError = ServiceError::Storage(StorageError::NotConfigured {
            reason: "DATABASE_URL is not set".into(),
        })
        .into();
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            storage.to_string(),
            "storage unavailable: DATABASE_URL is not set"
        );

        assert_eq!(AppError::route_not_found().status(), StatusCode::NOT_FOUND);
    }
}
