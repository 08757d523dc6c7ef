//! Error types for acuicola storage operations.

use handled::Handle;

use crate::commands::errors::UserError;

/// Errors that can occur during data store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataStoreError {
    /// The requested record was not found in the data store.
    NotFound,
    /// A record with the same identifier already exists.
    AlreadyExists,
    /// The record violates the entity contract (for example `Rmin > Rmax`).
    InvalidData(String),
    /// An internal storage error occurred.
    Internal(String),
}

impl std::fmt::Display for DataStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Record not found in data store"),
            Self::AlreadyExists => write!(f, "Record already exists in data store"),
            Self::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DataStoreError {}

impl Handle<UserError> for DataStoreError {
    fn handle(&self) -> Option<UserError> {
        let usage_hint = match self {
            Self::NotFound => Some("Check the identifier and try again.".to_string()),
            Self::InvalidData(_) => Some("Rmin must be less than or equal to Rmax.".to_string()),
            _ => None,
        };
        Some(UserError {
            message: self.to_string(),
            usage_hint,
        })
    }
}
