// ABOUTME: Error types for session verification and issuance
// ABOUTME: Distinguishes bad input from storage failures so callers can map them

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
