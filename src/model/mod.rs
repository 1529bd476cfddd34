//! Record types for the file library
//!
//! This module defines the persisted data model and its JSON codec:
//!
//! - **`FileItem`**: a file or folder with metadata, tags and version history
//! - **`Tag`**: a named, optionally colored label
//! - **`FileVersion`**: an append-only history entry attached to a file
//! - **`FileKind`**: the fixed set of content kinds
//! - **`FileTemplate`**: built-in templates for creating new files
//!
//! The codec (`codec`) maps records to their on-disk documents and resolves
//! missing fields to backward-compatible defaults.

pub mod codec;
pub mod error;
pub mod types;

pub use codec::{RecordKey, decode_file, decode_tag, encode_file, encode_tag};
pub use error::CodecError;
pub use types::{FileItem, FileKind, FileTemplate, FileVersion, Tag};
