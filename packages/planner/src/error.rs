// ABOUTME: Error types for the planning pipeline
// ABOUTME: Separates caller mistakes from upstream and persistence failures

use planforge_ai::AIServiceError;
use planforge_core::ValidationError;
use planforge_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Upstream(AIServiceError),

    #[error("{0}")]
    Persistence(#[from] StorageError),
}

impl From<AIServiceError> for PlannerError {
    fn from(err: AIServiceError) -> Self {
        match err {
            AIServiceError::MissingInput(field) => {
                PlannerError::Validation(ValidationError::Required(field))
            }
            other => PlannerError::Upstream(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
