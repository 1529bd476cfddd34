//! Testing utilities for smartfiles
//!
//! This module provides helper types and functions for writing tests,
//! including a `TestLibrary` wrapper for temporary library management.
//!
//! Only available when compiled with `cfg(test)`.

use crate::model::{FileItem, FileKind, Tag};
use crate::store::{BlobBackend, JsonStore, MetadataStore};
use std::path::Path;
use tempfile::TempDir;
use uuid::Uuid;

/// Wrapper for a temporary library that is removed on drop
///
/// The store lives inside a `TempDir`, so tests never leave artifacts behind.
pub struct TestLibrary {
    // declared before `dir` so the store is dropped first
    store: JsonStore,
    dir: TempDir,
}

impl TestLibrary {
    /// Create an empty library in a fresh temporary directory
    ///
    /// # Panics
    /// Panics if the directory or the store cannot be created.
    pub fn new() -> Self {
        Self::with_mode(false)
    }

    /// Same as `new`, with strict listings
    ///
    /// # Panics
    /// Panics if the directory or the store cannot be created.
    pub fn strict() -> Self {
        Self::with_mode(true)
    }

    fn with_mode(strict: bool) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonStore::open_with(dir.path().join("library"), "files", strict)
            .expect("Failed to open test library");
        Self { store, dir }
    }

    #[must_use]
    pub const fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Consume the wrapper, keeping the directory alive alongside the store
    pub fn into_parts(self) -> (JsonStore, TempDir) {
        (self.store, self.dir)
    }

    /// Directory for fixtures that live outside the library
    #[must_use]
    pub fn scratch(&self) -> &Path {
        self.dir.path()
    }

    /// Persist a folder and return it
    ///
    /// # Panics
    /// Panics if the record cannot be saved.
    pub fn folder(&self, name: &str, parent: Option<Uuid>) -> FileItem {
        let item = FileItem::folder(name, parent);
        self.store.save_file(&item).expect("Failed to save folder");
        item
    }

    /// Persist a file with a blob holding `content` and return it
    ///
    /// # Panics
    /// Panics if the blob or the record cannot be written.
    pub fn file(&self, name: &str, parent: Option<Uuid>, content: &str) -> FileItem {
        let url = self
            .store
            .blobs()
            .write(name, content.as_bytes())
            .expect("Failed to write blob");
        let item = FileItem::new(name, FileKind::from_path(name))
            .with_parent(parent)
            .with_blob(url, content.len() as u64);
        self.store.save_file(&item).expect("Failed to save file");
        item
    }

    /// Persist a tag and return it
    ///
    /// # Panics
    /// Panics if the tag cannot be saved.
    pub fn tag(&self, name: &str) -> Tag {
        let tag = Tag::new(name, None);
        self.store.save_tag(&tag).expect("Failed to save tag");
        tag
    }

    /// Re-read an item from the store
    ///
    /// # Panics
    /// Panics if the item is missing or unreadable.
    pub fn reload(&self, id: Uuid) -> FileItem {
        self.store
            .get_file(id)
            .expect("Failed to read record")
            .expect("Record missing")
    }
}

impl Default for TestLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an unsaved item for pure (store-free) tests
#[must_use]
pub fn item(name: &str, kind: FileKind, parent: Option<Uuid>) -> FileItem {
    FileItem::new(name, kind).with_parent(parent)
}
