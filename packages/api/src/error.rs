// ABOUTME: Application error type returned by API handlers
// ABOUTME: Maps domain errors to HTTP status codes and the JSON error envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, info};

use planforge_planner::PlannerError;
use planforge_storage::StorageError;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found")]
    NotFound,

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Persistence(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => AppError::NotFound,
            StorageError::InvalidInput(msg) => AppError::Validation(msg),
            other => AppError::Persistence(other.to_string()),
        }
    }
}

impl From<PlannerError> for AppError {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::Validation(e) => AppError::Validation(e.to_string()),
            PlannerError::Upstream(e) => AppError::Upstream(e.to_string()),
            PlannerError::Persistence(e) => AppError::from(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Persistence(msg) => error!(storage_error = %msg, "Storage system error"),
            AppError::Upstream(msg) => error!(upstream_error = %msg, "Upstream service error"),
            _ => info!(status = %status, error = %self, "API error response"),
        }

        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use planforge_ai::AIServiceError;
    use planforge_core::ValidationError;
    use std::time::Duration;

    #[test]
    fn test_storage_errors_map_to_status() {
        assert_eq!(
            AppError::from(StorageError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(StorageError::InvalidInput("bad".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(StorageError::InvalidData("corrupt".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_planner_errors_map_to_status() {
        let validation = AppError::from(PlannerError::Validation(ValidationError::Required(
            "businessIdea",
        )));
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.to_string(), "businessIdea is required");

        let timeout = AIServiceError::Timeout(Duration::from_secs(30));
        let upstream = AppError::from(PlannerError::Upstream(timeout));
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(upstream.to_string().contains("timed out"));
    }

    #[test]
    fn test_persistence_keeps_store_message() {
        let err = AppError::from(StorageError::InvalidData("bad sections json".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Invalid stored data: bad sections json");
    }
}
