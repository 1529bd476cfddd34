//! Session-specific error types
//!
//! # Error Types
//!
//! - **`Store`**: the store failed (wraps `StoreError`)
//! - **`InvalidOperation`**: the intent is not allowed for this item
//! - **`ProtectionDenied`**: the protection gate refused access
//! - **`NotFound`**: the intent referenced an unknown item or tag

use crate::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    InvalidOperation(String),

    #[error("Access to '{0}' was denied")]
    ProtectionDenied(String),

    #[error("Not found: {0}")]
    NotFound(Uuid),
}

impl SessionError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }
}
