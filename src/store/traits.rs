//! Storage seams
//!
//! `MetadataStore` is the contract every front end programs against;
//! `BlobBackend` is the capability the store uses to move file bytes around.

use super::error::StoreError;
use crate::events::ChangeBus;
use crate::model::{FileItem, Tag};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A record document that was present but could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of scanning the file records
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub items: Vec<FileItem>,
    /// Records excluded from `items` because they could not be decoded
    pub skipped: Vec<SkippedRecord>,
}

/// Durable, id-addressed storage of file and tag records
///
/// Every successful write is broadcast on `events()`.
pub trait MetadataStore: Send + Sync {
    /// Read every file record, reporting unreadable ones separately
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the metadata directory cannot be read. In strict
    /// mode an unreadable record fails the whole scan with `StoreError::Decode`.
    fn scan_files(&self) -> Result<Listing, StoreError>;

    /// Read every readable file record
    ///
    /// # Errors
    ///
    /// Same as `scan_files`.
    fn list_files(&self) -> Result<Vec<FileItem>, StoreError> {
        Ok(self.scan_files()?.items)
    }

    /// # Errors
    ///
    /// Returns `StoreError::Decode` if the record exists but is unreadable.
    fn get_file(&self, id: Uuid) -> Result<Option<FileItem>, StoreError>;

    /// Upsert a record by id, overwriting any previous version wholesale
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the record cannot be encoded or written.
    fn save_file(&self, item: &FileItem) -> Result<(), StoreError>;

    /// Delete records and their blobs; unknown ids are skipped
    ///
    /// Returns the number of records removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` on the first blob or record that cannot be removed.
    fn delete_files(&self, ids: &[Uuid]) -> Result<usize, StoreError>;

    /// Rename an item and its blob
    ///
    /// Returns `Ok(None)` for an unknown id. If the blob cannot be renamed the
    /// record is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the blob rename or the record write fails.
    fn rename_file(&self, id: Uuid, new_name: &str) -> Result<Option<FileItem>, StoreError>;

    /// Copy an item (and its blob) under a fresh id with a `" copy"` suffix
    ///
    /// Returns the new item, or `Ok(None)` for an unknown id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the blob copy or the record write fails.
    fn duplicate_file(&self, id: Uuid) -> Result<Option<FileItem>, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::Io` if the metadata directory cannot be read.
    fn list_tags(&self) -> Result<Vec<Tag>, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError` if the tag cannot be encoded or written.
    fn save_tag(&self, tag: &Tag) -> Result<(), StoreError>;

    /// Delete a tag record; items keep their assignment
    ///
    /// Returns `false` if no such tag existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the record cannot be removed.
    fn delete_tag(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Remove every blob and every record
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if any entry cannot be removed.
    fn delete_all(&self) -> Result<(), StoreError>;

    fn blobs(&self) -> &dyn BlobBackend;

    fn events(&self) -> &ChangeBus;
}

impl<T: MetadataStore + ?Sized> MetadataStore for std::sync::Arc<T> {
    fn scan_files(&self) -> Result<Listing, StoreError> {
        (**self).scan_files()
    }

    fn list_files(&self) -> Result<Vec<FileItem>, StoreError> {
        (**self).list_files()
    }

    fn get_file(&self, id: Uuid) -> Result<Option<FileItem>, StoreError> {
        (**self).get_file(id)
    }

    fn save_file(&self, item: &FileItem) -> Result<(), StoreError> {
        (**self).save_file(item)
    }

    fn delete_files(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        (**self).delete_files(ids)
    }

    fn rename_file(&self, id: Uuid, new_name: &str) -> Result<Option<FileItem>, StoreError> {
        (**self).rename_file(id, new_name)
    }

    fn duplicate_file(&self, id: Uuid) -> Result<Option<FileItem>, StoreError> {
        (**self).duplicate_file(id)
    }

    fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        (**self).list_tags()
    }

    fn save_tag(&self, tag: &Tag) -> Result<(), StoreError> {
        (**self).save_tag(tag)
    }

    fn delete_tag(&self, id: Uuid) -> Result<bool, StoreError> {
        (**self).delete_tag(id)
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        (**self).delete_all()
    }

    fn blobs(&self) -> &dyn BlobBackend {
        (**self).blobs()
    }

    fn events(&self) -> &ChangeBus {
        (**self).events()
    }
}

/// Physical storage of file bytes
///
/// Blob locations are absolute paths under `root()`. Rename and copy keep the
/// blob next to its source and take a bare file name.
pub trait BlobBackend: Send + Sync {
    fn root(&self) -> &Path;

    /// Write `bytes` to a new blob called `name`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the name is taken,
    /// `StoreError::InvalidName` or `StoreError::Io`.
    fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, StoreError>;

    /// Copy an external file into the blob root under its own file name
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if a blob with that name exists, or
    /// `StoreError::Io` if the source cannot be copied.
    fn import(&self, source: &Path) -> Result<PathBuf, StoreError>;

    fn exists(&self, location: &Path) -> bool;

    /// Remove a blob; a missing blob is not an error
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the blob exists but cannot be removed.
    fn remove(&self, location: &Path) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the destination is taken.
    fn rename(&self, location: &Path, new_name: &str) -> Result<PathBuf, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the destination is taken.
    fn copy(&self, location: &Path, new_name: &str) -> Result<PathBuf, StoreError>;

    /// Remove every blob under the root
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if any blob cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;
}
