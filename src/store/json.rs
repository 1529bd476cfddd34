//! JSON document store
//!
//! Layout under the library root:
//!
//! ```text
//! <root>/metadata/file_<UUID>.json
//! <root>/metadata/tag_<UUID>.json
//! <root>/<files_dir>/<blob name>
//! ```
//!
//! Records are written to a temporary sibling and renamed into place, so a reader
//! never observes a half-written document.

use super::blob::{FsBlobBackend, validate_name};
use super::error::StoreError;
use super::traits::{BlobBackend, Listing, MetadataStore, SkippedRecord};
use crate::events::{ChangeBus, StoreEvent};
use crate::model::{FileItem, RecordKey, Tag, decode_file, decode_tag, encode_file, encode_tag};
use chrono::Utc;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const METADATA_DIR: &str = "metadata";
const DEFAULT_FILES_DIR: &str = "files";

/// File-backed `MetadataStore`
#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
    metadata_dir: PathBuf,
    blobs: FsBlobBackend,
    strict: bool,
    events: ChangeBus,
}

impl JsonStore {
    /// Open (or create) a library at `root` with default settings
    ///
    /// # Examples
    /// ```no_run
    /// use smartfiles::store::{JsonStore, MetadataStore};
    ///
    /// let store = JsonStore::open("my_library").unwrap();
    /// let files = store.list_files().unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directories cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with(root, DEFAULT_FILES_DIR, false)
    }

    /// Open a library with an explicit blob directory name and listing mode
    ///
    /// # Arguments
    /// * `root` - Library root directory
    /// * `files_dir` - Name of the blob directory under `root`
    /// * `strict` - Fail listings on the first unreadable record instead of skipping it
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directories cannot be created, or
    /// `StoreError::InvalidName` if `files_dir` is not a plain directory name.
    pub fn open_with(root: impl Into<PathBuf>, files_dir: &str, strict: bool) -> Result<Self, StoreError> {
        validate_name(files_dir)?;
        let root = root.into();
        let metadata_dir = root.join(METADATA_DIR);
        fs::create_dir_all(&metadata_dir).map_err(|e| StoreError::io(&metadata_dir, e))?;
        let blobs = FsBlobBackend::open(root.join(files_dir))?;
        tracing::debug!(root = %root.display(), strict, "opened library");
        Ok(Self {
            root,
            metadata_dir,
            blobs,
            strict,
            events: ChangeBus::new(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    fn record_path(&self, key: RecordKey) -> PathBuf {
        self.metadata_dir.join(key.file_name())
    }

    fn write_record(&self, key: RecordKey, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.record_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))
    }

    /// Remove a record document; returns `false` if it did not exist
    fn remove_record(&self, key: RecordKey) -> Result<bool, StoreError> {
        let path = self.record_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    /// Record documents currently present, sorted by path
    fn record_paths(&self, want_files: bool) -> Result<Vec<PathBuf>, StoreError> {
        let entries = fs::read_dir(&self.metadata_dir).map_err(|e| StoreError::io(&self.metadata_dir, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.metadata_dir, e))?;
            let name = entry.file_name();
            let Some(key) = name.to_str().and_then(RecordKey::parse) else {
                continue;
            };
            if matches!(key, RecordKey::File(_)) == want_files {
                paths.push(entry.path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read_file_record(path: &Path) -> Result<FileItem, StoreError> {
        let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
        decode_file(&bytes).map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    fn load_file(&self, id: Uuid) -> Result<Option<FileItem>, StoreError> {
        let path = self.record_path(RecordKey::File(id));
        match Self::read_file_record(&path) {
            Ok(item) => Ok(Some(item)),
            Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn put_file(&self, item: &FileItem) -> Result<(), StoreError> {
        let bytes = encode_file(item).map_err(StoreError::Encode)?;
        self.write_record(RecordKey::File(item.id), &bytes)
    }

    /// Remove one record and its blob; `Ok(false)` if there was no record
    fn remove_file_record(&self, id: Uuid) -> Result<bool, StoreError> {
        let key = RecordKey::File(id);
        match self.load_file(id) {
            Ok(None) => {
                tracing::debug!(%id, "delete skipped, no record");
                return Ok(false);
            }
            Ok(Some(item)) => {
                if let Some(url) = &item.url {
                    self.blobs.remove(url)?;
                }
            }
            Err(StoreError::Decode { path, source }) => {
                tracing::warn!(path = %path.display(), error = %source, "deleting unreadable record, blob left in place");
            }
            Err(e) => return Err(e),
        }
        self.remove_record(key)
    }
}

impl MetadataStore for JsonStore {
    fn scan_files(&self) -> Result<Listing, StoreError> {
        let paths = self.record_paths(true)?;
        let results: Vec<(PathBuf, Result<FileItem, StoreError>)> = paths
            .into_par_iter()
            .map(|path| {
                let result = Self::read_file_record(&path);
                (path, result)
            })
            .collect();

        let mut listing = Listing::default();
        for (path, result) in results {
            match result {
                Ok(item) => listing.items.push(item),
                // a record removed between read_dir and read is simply gone
                Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {}
                Err(e) if self.strict => return Err(e),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file record");
                    listing.skipped.push(SkippedRecord {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(listing)
    }

    fn get_file(&self, id: Uuid) -> Result<Option<FileItem>, StoreError> {
        self.load_file(id)
    }

    fn save_file(&self, item: &FileItem) -> Result<(), StoreError> {
        self.put_file(item)?;
        tracing::debug!(id = %item.id, name = %item.name, "saved file record");
        self.events.emit(&StoreEvent::FilesSaved(vec![item.id]));
        Ok(())
    }

    fn delete_files(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        let mut removed = Vec::new();
        let mut failure = None;
        for &id in ids {
            match self.remove_file_record(id) {
                Ok(true) => removed.push(id),
                Ok(false) => {}
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "deleted file records");
            self.events.emit(&StoreEvent::FilesRemoved(removed.clone()));
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(removed.len()),
        }
    }

    fn rename_file(&self, id: Uuid, new_name: &str) -> Result<Option<FileItem>, StoreError> {
        let Some(mut item) = self.load_file(id)? else {
            return Ok(None);
        };
        validate_name(new_name)?;

        let old_url = item.url.clone();
        let moved = match &old_url {
            Some(url) if self.blobs.exists(url) => Some(self.blobs.rename(url, new_name)?),
            _ => None,
        };

        let old_name = std::mem::replace(&mut item.name, new_name.to_string());
        if let Some(url) = &moved {
            item.url = Some(url.clone());
        }
        item.modified_at = Utc::now();

        if let Err(e) = self.put_file(&item) {
            if let (Some(url), Some(original)) = (&moved, &old_url) {
                let original_name = original
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(old_name.as_str());
                if let Err(rollback) = self.blobs.rename(url, original_name) {
                    tracing::warn!(path = %url.display(), error = %rollback, "could not restore blob after failed rename");
                }
            }
            return Err(e);
        }

        tracing::debug!(%id, from = %old_name, to = %new_name, "renamed file");
        self.events.emit(&StoreEvent::FilesSaved(vec![id]));
        Ok(Some(item))
    }

    fn duplicate_file(&self, id: Uuid) -> Result<Option<FileItem>, StoreError> {
        let Some(original) = self.load_file(id)? else {
            return Ok(None);
        };

        let now = Utc::now();
        let mut copy = original.clone();
        copy.id = Uuid::new_v4();
        copy.name = format!("{} copy", original.name);
        copy.is_favorite = false;
        copy.created_at = now;
        copy.modified_at = now;
        copy.accessed_at = None;
        copy.versions = None;
        copy.url = None;

        if let Some(url) = original.url.as_deref().filter(|u| self.blobs.exists(u)) {
            copy.url = Some(self.blobs.copy(url, &copy.name)?);
        }

        if let Err(e) = self.put_file(&copy) {
            if let Some(url) = &copy.url
                && let Err(cleanup) = self.blobs.remove(url)
            {
                tracing::warn!(path = %url.display(), error = %cleanup, "could not remove orphaned blob");
            }
            return Err(e);
        }

        tracing::debug!(%id, copy = %copy.id, "duplicated file");
        self.events.emit(&StoreEvent::FilesSaved(vec![copy.id]));
        Ok(Some(copy))
    }

    fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        let mut tags = Vec::new();
        for path in self.record_paths(false)? {
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::io(&path, e)),
            };
            match decode_tag(&bytes) {
                Ok(tag) => tags.push(tag),
                Err(source) if self.strict => return Err(StoreError::Decode { path, source }),
                Err(source) => {
                    tracing::warn!(path = %path.display(), error = %source, "skipping unreadable tag record");
                }
            }
        }
        Ok(tags)
    }

    fn save_tag(&self, tag: &Tag) -> Result<(), StoreError> {
        let bytes = encode_tag(tag).map_err(StoreError::Encode)?;
        self.write_record(RecordKey::Tag(tag.id), &bytes)?;
        tracing::debug!(id = %tag.id, name = %tag.name, "saved tag");
        self.events.emit(&StoreEvent::TagsChanged);
        Ok(())
    }

    fn delete_tag(&self, id: Uuid) -> Result<bool, StoreError> {
        let removed = self.remove_record(RecordKey::Tag(id))?;
        if removed {
            self.events.emit(&StoreEvent::TagsChanged);
        }
        Ok(removed)
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        self.blobs.clear()?;
        let entries = fs::read_dir(&self.metadata_dir).map_err(|e| StoreError::io(&self.metadata_dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.metadata_dir, e))?.path();
            if path.is_file() {
                fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
            }
        }
        tracing::debug!(root = %self.root.display(), "cleared library");
        self.events.emit(&StoreEvent::Cleared);
        Ok(())
    }

    fn blobs(&self) -> &dyn BlobBackend {
        &self.blobs
    }

    fn events(&self) -> &ChangeBus {
        &self.events
    }
}
