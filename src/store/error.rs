//! Store-specific error types
//!
//! This module defines all error types that can occur while reading or writing
//! records and blobs.
//!
//! # Error Types
//!
//! - **`NotFound`**: an operation referenced an id with no record
//! - **`Io`**: a filesystem read, write, copy or rename failed
//! - **`Decode`**: a stored document could not be parsed
//! - **`Encode`**: a record could not be serialized
//! - **`AlreadyExists`**: a blob rename or copy would overwrite another blob
//! - **`InvalidName`**: a blob name would escape the blob root

use crate::model::CodecError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists for the id
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    /// Filesystem failure
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A stored document is not a valid record
    #[error("Unreadable record {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// A record could not be serialized
    #[error("Could not encode record: {0}")]
    Encode(#[source] CodecError),

    /// The destination blob already exists
    #[error("Destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// The name cannot be used for a blob
    #[error("Invalid file name: '{0}'")]
    InvalidName(String),
}

impl StoreError {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the error comes from the filesystem rather than from data
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::AlreadyExists(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
