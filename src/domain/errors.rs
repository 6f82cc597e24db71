use thiserror::Error;
use uuid::Uuid;

/// Failures of the order-placement transaction.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Product {0} not found")]
    ProductNotFound(Uuid),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Failures of the single-record entity store and the identity capabilities.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid credentials")]
    Unauthorized,
    #[error("Internal error: {0}")]
    Internal(String),
}
