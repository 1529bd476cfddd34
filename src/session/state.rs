//! Immutable views handed out by the browser

use crate::batch::BatchKind;
use crate::model::{FileItem, Tag};
use crate::search::{SearchFilters, SmartGroup};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Ordered multi-selection
///
/// Keeps ids in the order they were selected, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<Uuid>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain click: select only `id`, or clear if `id` was the only selection
    pub fn click(&mut self, id: Uuid) {
        if self.ids == [id] {
            self.ids.clear();
        } else {
            self.ids = vec![id];
        }
    }

    /// Additive click: toggle `id` in the set
    pub fn toggle(&mut self, id: Uuid) {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    pub fn set(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// More than one item selected
    #[must_use]
    pub fn is_multi(&self) -> bool {
        self.ids.len() > 1
    }
}

/// Sidebar contents: smart groups, tags sorted by name, and the current choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    pub groups: Vec<SmartGroup>,
    pub tags: Vec<Tag>,
    pub selected_group: Option<SmartGroup>,
    pub selected_tag: Option<Uuid>,
}

/// Point-in-time copy of everything a front end renders
///
/// The visible list is shared, never mutated; a later change produces a new
/// snapshot.
#[derive(Debug, Clone)]
pub struct BrowserSnapshot {
    pub folder: Option<Uuid>,
    /// Folders from the root down to the current folder, inclusive
    pub breadcrumb: Vec<FileItem>,
    pub visible: Arc<[FileItem]>,
    pub selection: Vec<Uuid>,
    pub multi_select: bool,
    pub query: String,
    pub filters: SearchFilters,
    pub group: Option<SmartGroup>,
    pub tag: Option<Uuid>,
    /// Records left out of the listing because they could not be read
    pub skipped: usize,
    /// Kind of the batch an undo would revert
    pub undo_available: Option<BatchKind>,
}

/// Outcome of importing external files
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub imported: Vec<FileItem>,
    pub failed: Vec<(PathBuf, String)>,
}
