//! smartfiles - a local file and tag library
//!
//! Files and tags are JSON records in a `metadata/` directory with the file
//! bytes in a sibling blob directory. On top of the store sit the folder
//! hierarchy, the search pipeline that decides what is visible, and a batch
//! coordinator for multi-item move/copy/delete with a single undo.

use thiserror::Error;

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod events;
pub mod hierarchy;
pub mod model;
pub mod output;
pub mod search;
pub mod session;
pub mod store;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum SmartFilesError {
    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),
    /// A record could not be encoded or decoded
    #[error("Record error: {0}")]
    Codec(#[from] model::CodecError),
    /// Batch item failure
    #[error("Batch error: {0}")]
    Batch(#[from] batch::BatchError),
    /// Session intent failure
    #[error("{0}")]
    Session(#[from] session::SessionError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, SmartFilesError>;
