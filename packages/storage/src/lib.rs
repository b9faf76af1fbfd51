// ABOUTME: Data layer for Planforge backed by SQLite
// ABOUTME: Connection setup, embedded migrations, and the plan and subscription stores

pub mod db;
pub mod plans;
pub mod state;
pub mod subscriptions;

use thiserror::Error;

pub use db::{connect, connect_in_memory, MIGRATOR};
pub use plans::{PlanStorage, MAX_PAGINATION_LIMIT};
pub use state::DbState;
pub use subscriptions::{Subscription, SubscriptionStatus, SubscriptionStorage};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
