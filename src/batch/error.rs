//! Per-item batch failure reasons
//!
//! A `BatchError` never escapes a batch call: each one is counted and its message
//! kept in the `BatchSummary`.

use crate::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BatchError {
    /// The selected id has no record
    #[error("Item not found: {0}")]
    NotFound(Uuid),

    /// The operation is not allowed for this item
    #[error("{0}")]
    InvalidOperation(String),

    /// The store failed while processing the item
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BatchError {
    pub(crate) fn into_folder() -> Self {
        Self::InvalidOperation("Cannot move a folder into itself or its subfolders.".into())
    }

    pub(crate) fn not_a_folder() -> Self {
        Self::InvalidOperation("Can only move files to folders.".into())
    }
}
