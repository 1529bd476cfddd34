//! Codec error types

use thiserror::Error;

/// Errors raised while encoding or decoding a single record document
#[derive(Debug, Error)]
pub enum CodecError {
    /// The record could not be serialized
    #[error("Error while encoding record: {0}")]
    Encode(#[source] serde_json::Error),

    /// The document is not a valid record
    #[error("Error while decoding record: {0}")]
    Decode(#[source] serde_json::Error),
}
