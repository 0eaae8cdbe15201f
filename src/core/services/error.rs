use thiserror::Error;

use crate::data::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Sign in required")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(format!("Snippet {} not found", id)),
            StoreError::Forbidden(id) => {
                ServiceError::Forbidden(format!("Snippet {} belongs to another user", id))
            }
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
