//! JSON document codec for library records
//!
//! Each record lives in its own document, keyed by record type and id:
//!
//! - `file_<UUID>.json` holds one `FileItem`
//! - `tag_<UUID>.json` holds one `Tag`
//!
//! # Field resolution
//!
//! Documents written by older versions may lack fields. Decoding resolves them as:
//!
//! | Field         | Missing value            |
//! |---------------|--------------------------|
//! | `isFavorite`  | `false`                  |
//! | `tags`        | `[]`                     |
//! | `isProtected` | `false`                  |
//! | `createdAt`   | time of decoding         |
//! | `modifiedAt`  | time of decoding         |
//! | others        | `None`                   |
//!
//! Unknown `type` values decode as `other`; unknown fields are ignored.

use super::error::CodecError;
use super::types::{FileItem, Tag};
use uuid::Uuid;

const FILE_PREFIX: &str = "file_";
const TAG_PREFIX: &str = "tag_";
const EXTENSION: &str = ".json";

/// Key of a record document inside the metadata directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    File(Uuid),
    Tag(Uuid),
}

impl RecordKey {
    /// Document file name for this key
    ///
    /// # Examples
    /// ```
    /// # use smartfiles::model::RecordKey;
    /// # use uuid::Uuid;
    /// let id = Uuid::parse_str("0d5c6a7e-3f1b-4e43-9a55-2f1f1b0c9a10").unwrap();
    /// assert_eq!(
    ///     RecordKey::File(id).file_name(),
    ///     "file_0D5C6A7E-3F1B-4E43-9A55-2F1F1B0C9A10.json"
    /// );
    /// ```
    #[must_use]
    pub fn file_name(&self) -> String {
        let (prefix, id) = match self {
            Self::File(id) => (FILE_PREFIX, id),
            Self::Tag(id) => (TAG_PREFIX, id),
        };
        let mut buf = Uuid::encode_buffer();
        let upper = id.as_hyphenated().encode_upper(&mut buf);
        format!("{prefix}{upper}{EXTENSION}")
    }

    /// Parse a document file name back into a key
    ///
    /// Returns `None` for names that are not record documents, including ids
    /// not spelled the way `file_name` writes them (upper-case, hyphenated).
    #[must_use]
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(EXTENSION)?;
        let key = if let Some(id) = stem.strip_prefix(FILE_PREFIX) {
            Uuid::parse_str(id).ok().map(Self::File)
        } else if let Some(id) = stem.strip_prefix(TAG_PREFIX) {
            Uuid::parse_str(id).ok().map(Self::Tag)
        } else {
            None
        }?;
        (key.file_name() == file_name).then_some(key)
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::File(id) | Self::Tag(id) => *id,
        }
    }
}

/// # Errors
///
/// Returns `CodecError::Encode` if the item cannot be serialized (e.g. a blob path
/// that is not valid UTF-8).
pub fn encode_file(item: &FileItem) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec_pretty(item).map_err(CodecError::Encode)
}

/// # Errors
///
/// Returns `CodecError::Decode` if the bytes are not a valid file record.
pub fn decode_file(bytes: &[u8]) -> Result<FileItem, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}

/// # Errors
///
/// Returns `CodecError::Encode` if the tag cannot be serialized.
pub fn encode_tag(tag: &Tag) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec_pretty(tag).map_err(CodecError::Encode)
}

/// # Errors
///
/// Returns `CodecError::Decode` if the bytes are not a valid tag record.
pub fn decode_tag(bytes: &[u8]) -> Result<Tag, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod codec_tests;
