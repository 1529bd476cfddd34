//! User intents: each one writes through the store and reports a single notice

use super::browser::Browser;
use super::error::SessionError;
use super::state::ImportSummary;
use crate::batch::{BatchSummary, UndoOutcome};
use crate::events::Notice;
use crate::hierarchy::is_descendant;
use crate::model::{FileItem, FileKind, FileTemplate, FileVersion, Tag};
use crate::store::MetadataStore;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

impl<S: MetadataStore> Browser<S> {
    /// Report `notice` and reload after a successful write
    ///
    /// The write already happened, so a listing failure only leaves the
    /// browser stale for the next `sync`.
    fn finish(&mut self, notice: Notice) {
        self.notify(notice);
        self.refresh_quietly();
    }

    fn refresh_quietly(&mut self) {
        if let Err(e) = self.load_listing() {
            tracing::warn!(error = %e, "listing failed after write");
            self.mark_stale();
        }
    }

    /// Fresh copy of an item from the store, or a "File not found." notice
    fn fetch(&self, id: Uuid) -> Result<FileItem, SessionError> {
        match self.store.get_file(id)? {
            Some(item) => Ok(item),
            None => {
                self.notify(Notice::error("File not found."));
                Err(SessionError::NotFound(id))
            }
        }
    }

    fn update(&self, item: &FileItem, failure: &str) -> Result<(), SessionError> {
        if let Err(e) = self.store.save_file(item) {
            tracing::warn!(id = %item.id, error = %e, "could not save item");
            self.notify(Notice::error(failure));
            return Err(e.into());
        }
        Ok(())
    }

    // --- creation --------------------------------------------------------

    /// Create a folder in the current folder
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperation` for a blank name, or
    /// `SessionError::Store` if the record cannot be written.
    pub fn create_folder(&mut self, name: &str) -> Result<FileItem, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            self.notify(Notice::error("Failed to create folder."));
            return Err(SessionError::invalid("Folder name cannot be empty"));
        }
        let folder = FileItem::folder(name, self.current_folder());
        self.update(&folder, "Failed to create folder.")?;
        self.finish(Notice::success(format!("Folder '{name}' created.")));
        Ok(folder)
    }

    /// Create a file with `content` in the current folder
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if the blob or the record cannot be written.
    /// A blob left behind by a failed record write is removed.
    pub fn create_file(&mut self, name: &str, kind: FileKind, content: &str) -> Result<FileItem, SessionError> {
        let name = name.trim();
        let url = match self.store.blobs().write(name, content.as_bytes()) {
            Ok(url) => url,
            Err(e) => {
                self.notify(Notice::error("Failed to create file."));
                return Err(e.into());
            }
        };
        let item = FileItem::new(name, kind)
            .with_parent(self.current_folder())
            .with_blob(url.clone(), content.len() as u64);

        if let Err(e) = self.update(&item, "Failed to create file.") {
            if let Err(cleanup) = self.store.blobs().remove(&url) {
                tracing::warn!(path = %url.display(), error = %cleanup, "orphaned blob");
            }
            return Err(e);
        }
        self.finish(Notice::success(format!("Created {name}")));
        Ok(item)
    }

    /// Create a file from a built-in template
    ///
    /// # Errors
    ///
    /// Same as `create_file`.
    pub fn create_from_template(&mut self, name: &str, template: FileTemplate) -> Result<FileItem, SessionError> {
        let file_name = template.file_name(name.trim());
        self.create_file(&file_name, template.kind, template.content)
    }

    fn import_one(&self, source: &Path) -> Result<FileItem, SessionError> {
        let metadata = fs::metadata(source).map_err(|e| crate::store::StoreError::io(source, e))?;
        let url = self.store.blobs().import(source)?;
        let name = url
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());

        let mut item = FileItem::new(name, FileKind::from_path(&url))
            .with_parent(self.current_folder())
            .with_blob(url.clone(), metadata.len());
        if let Ok(modified) = metadata.modified() {
            item.modified_at = DateTime::<Utc>::from(modified);
        }

        if let Err(e) = self.store.save_file(&item) {
            if let Err(cleanup) = self.store.blobs().remove(&url) {
                tracing::warn!(path = %url.display(), error = %cleanup, "orphaned blob");
            }
            return Err(e.into());
        }
        Ok(item)
    }

    /// Copy external files into the library, under the current folder
    ///
    /// Each file is imported independently; one notice summarizes the run.
    ///
    /// # Errors
    ///
    /// Per-file failures are reported in the summary, not returned.
    pub fn import_files<P: AsRef<Path>>(&mut self, sources: &[P]) -> Result<ImportSummary, SessionError> {
        let mut summary = ImportSummary::default();
        for source in sources {
            let source = source.as_ref();
            match self.import_one(source) {
                Ok(item) => summary.imported.push(item),
                Err(e) => {
                    tracing::warn!(path = %source.display(), error = %e, "import failed");
                    summary.failed.push((PathBuf::from(source), e.to_string()));
                }
            }
        }

        let notice = if summary.failed.is_empty() {
            Notice::success(format!("Successfully imported {} file(s).", summary.imported.len()))
        } else {
            Notice::error(format!(
                "Imported {} file(s), failed to import {} file(s).",
                summary.imported.len(),
                summary.failed.len()
            ))
        };
        self.finish(notice);
        Ok(summary)
    }

    /// Import a single external file
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperation` carrying the failure reason if the
    /// file could not be imported.
    pub fn import_file(&mut self, source: impl AsRef<Path>) -> Result<FileItem, SessionError> {
        let mut summary = self.import_files(&[source.as_ref()])?;
        match summary.imported.pop() {
            Some(item) => Ok(item),
            None => Err(SessionError::invalid(
                summary.failed.pop().map_or_else(String::new, |(_, reason)| reason),
            )),
        }
    }

    // --- single item -----------------------------------------------------

    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for an unknown id,
    /// `SessionError::InvalidOperation` for a blank name, or
    /// `SessionError::Store` if the blob or record cannot be renamed.
    pub fn rename(&mut self, id: Uuid, new_name: &str) -> Result<FileItem, SessionError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            self.notify(Notice::error("Failed to rename file."));
            return Err(SessionError::invalid("Name cannot be empty"));
        }
        match self.store.rename_file(id, new_name) {
            Ok(Some(item)) => {
                self.finish(Notice::success(format!("Renamed to '{new_name}'.")));
                Ok(item)
            }
            Ok(None) => {
                self.notify(Notice::error("File not found."));
                Err(SessionError::NotFound(id))
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "rename failed");
                self.notify(Notice::error("Failed to rename file."));
                Err(e.into())
            }
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for an unknown id or
    /// `SessionError::Store` if the copy cannot be written.
    pub fn duplicate(&mut self, id: Uuid) -> Result<FileItem, SessionError> {
        match self.store.duplicate_file(id) {
            Ok(Some(copy)) => {
                self.finish(Notice::success("File duplicated successfully."));
                Ok(copy)
            }
            Ok(None) => {
                self.notify(Notice::error("File not found."));
                Err(SessionError::NotFound(id))
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "duplicate failed");
                self.notify(Notice::error("Failed to duplicate file."));
                Err(e.into())
            }
        }
    }

    /// Flip the favorite flag; returns the new value
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` or `SessionError::Store`.
    pub fn toggle_favorite(&mut self, id: Uuid) -> Result<bool, SessionError> {
        let mut item = self.fetch(id)?;
        item.is_favorite = !item.is_favorite;
        self.update(&item, "Failed to update favorite status.")?;
        let message = if item.is_favorite {
            "Added to Favorites."
        } else {
            "Removed from Favorites."
        };
        self.finish(Notice::success(message));
        Ok(item.is_favorite)
    }

    /// Set or clear the protected flag
    ///
    /// Clearing protection goes through the protection gate first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ProtectionDenied` if the gate refuses,
    /// `SessionError::NotFound` or `SessionError::Store`.
    pub fn set_protected(&mut self, id: Uuid, protected: bool) -> Result<(), SessionError> {
        let mut item = self.fetch(id)?;
        if item.is_protected == protected {
            return Ok(());
        }
        if !protected && !self.gate.authenticate(&item) {
            self.notify(Notice::error("Authentication failed."));
            return Err(SessionError::ProtectionDenied(item.name));
        }
        item.is_protected = protected;
        self.update(&item, "Failed to update protection.")?;
        let message = if protected {
            "Protection enabled."
        } else {
            "Protection removed."
        };
        self.finish(Notice::success(message));
        Ok(())
    }

    /// # Errors
    ///
    /// Same as `set_protected`.
    pub fn toggle_protection(&mut self, id: Uuid) -> Result<bool, SessionError> {
        let current = self.fetch(id)?.is_protected;
        self.set_protected(id, !current)?;
        Ok(!current)
    }

    /// Move one item under `target` (`None` is the root)
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperation` when the target is not a folder
    /// or lies inside the moved item, `SessionError::NotFound` or
    /// `SessionError::Store`.
    pub fn move_item(&mut self, id: Uuid, target: Option<Uuid>) -> Result<(), SessionError> {
        let mut item = self.fetch(id)?;

        if let Some(t) = target {
            let target_item = self.store.get_file(t)?;
            if !target_item.as_ref().is_some_and(FileItem::is_folder) {
                self.notify(Notice::error("Can only move files to folders."));
                return Err(SessionError::invalid("Can only move files to folders."));
            }
            if t == id || is_descendant(&self.items, t, id) {
                let msg = "Cannot move a folder into itself or its subfolders.";
                self.notify(Notice::error(msg));
                return Err(SessionError::invalid(msg));
            }
        }

        item.parent_id = target;
        item.modified_at = Utc::now();
        self.update(&item, "Failed to move file.")?;
        let dest = self.folder_label(target);
        self.finish(Notice::success(format!("Moved '{}' to '{dest}'.", item.name)));
        Ok(())
    }

    /// Delete items and their blobs
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if a record or blob cannot be removed.
    pub fn delete_items(&mut self, ids: &[Uuid]) -> Result<usize, SessionError> {
        match self.store.delete_files(ids) {
            Ok(removed) => {
                self.finish(Notice::success(format!("Successfully deleted {removed} item(s).")));
                Ok(removed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "delete failed");
                self.notify(Notice::error("Failed to delete items."));
                // part of the batch may be gone already
                self.refresh_quietly();
                Err(e.into())
            }
        }
    }

    /// Append a version record to an item's history
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` or `SessionError::Store`.
    pub fn record_version(&mut self, id: Uuid, author: &str, note: &str) -> Result<FileVersion, SessionError> {
        let mut item = self.fetch(id)?;
        let version = item.record_version(author, note).clone();
        self.update(&item, "Failed to record version.")?;
        self.finish(Notice::success("Version recorded."));
        Ok(version)
    }

    // --- batches ---------------------------------------------------------

    fn after_batch(
        &mut self,
        summary: Option<BatchSummary>,
        target: Option<Uuid>,
    ) -> Result<Option<BatchSummary>, SessionError> {
        let Some(summary) = summary else {
            return Ok(None);
        };
        let notice = summary.notice(&self.folder_label(target));
        self.selection.clear();
        self.finish(notice);
        Ok(Some(summary))
    }

    /// Move the selection under `target`
    ///
    /// Returns `None` for an empty selection. Each item fails or succeeds on its
    /// own; the summary carries the counts.
    ///
    /// # Errors
    ///
    /// Per-item failures are counted in the summary, not returned.
    pub fn batch_move(&mut self, target: Option<Uuid>) -> Result<Option<BatchSummary>, SessionError> {
        let ids = self.selected_in_order();
        let summary = self
            .batch
            .batch_move(&self.store, &self.items, &ids, self.view.folder, target);
        self.after_batch(summary, target)
    }

    /// Duplicate the selection into `target`
    ///
    /// # Errors
    ///
    /// Per-item failures are counted in the summary, not returned.
    pub fn batch_copy(&mut self, target: Option<Uuid>) -> Result<Option<BatchSummary>, SessionError> {
        let ids = self.selected_in_order();
        let summary = self
            .batch
            .batch_copy(&self.store, &self.items, &ids, self.view.folder, target);
        self.after_batch(summary, target)
    }

    /// Delete the selection
    ///
    /// # Errors
    ///
    /// Per-item failures are counted in the summary, not returned.
    pub fn batch_delete(&mut self) -> Result<Option<BatchSummary>, SessionError> {
        let ids = self.selected_in_order();
        let summary = self.batch.batch_delete(&self.store, &ids, self.view.folder);
        self.after_batch(summary, None)
    }

    /// Revert the last batch
    ///
    /// # Errors
    ///
    /// Per-item failures are counted in the outcome, not returned.
    pub fn undo(&mut self) -> Result<UndoOutcome, SessionError> {
        let outcome = self.batch.undo(&self.store);
        let notice = outcome.notice();
        if outcome == UndoOutcome::NothingToUndo || outcome == UndoOutcome::Unsupported {
            self.notify(notice);
            return Ok(outcome);
        }
        self.finish(notice);
        Ok(outcome)
    }

    // --- tags ------------------------------------------------------------

    /// Create a tag, with a generated color when none is given
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOperation` for a blank name or
    /// `SessionError::Store` if the tag cannot be saved.
    pub fn create_tag(&mut self, name: &str, color_hex: Option<String>) -> Result<Tag, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            self.notify(Notice::error("Could not create tag."));
            return Err(SessionError::invalid("Tag name cannot be empty"));
        }
        let tag = match color_hex {
            Some(color) => Tag::new(name, Some(color)),
            None => Tag::with_generated_color(name),
        };
        if let Err(e) = self.store.save_tag(&tag) {
            self.notify(Notice::error("Could not create tag."));
            return Err(e.into());
        }
        self.finish(Notice::success(format!("Tag '{name}' created.")));
        Ok(tag)
    }

    /// Create a tag and assign it to `id` in one step
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound`, `SessionError::InvalidOperation` for a
    /// blank name, or `SessionError::Store`.
    pub fn create_and_assign_tag(&mut self, id: Uuid, name: &str) -> Result<Tag, SessionError> {
        let name = name.trim();
        let mut item = self.fetch(id)?;
        if name.is_empty() {
            self.notify(Notice::error("Could not create tag."));
            return Err(SessionError::invalid("Tag name cannot be empty"));
        }
        let tag = Tag::with_generated_color(name);
        if let Err(e) = self.store.save_tag(&tag) {
            self.notify(Notice::error("Could not create tag."));
            return Err(e.into());
        }
        item.assign_tag(tag.clone());
        self.update(&item, "Could not create tag.")?;
        self.finish(Notice::success(format!("Tag '{name}' created and assigned.")));
        Ok(tag)
    }

    /// Assign an existing tag; returns `false` if it was already assigned
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for an unknown item or tag, or
    /// `SessionError::Store`.
    pub fn assign_tag(&mut self, id: Uuid, tag_id: Uuid) -> Result<bool, SessionError> {
        let Some(tag) = self.store.list_tags()?.into_iter().find(|t| t.id == tag_id) else {
            self.notify(Notice::error("Tag not found."));
            return Err(SessionError::NotFound(tag_id));
        };
        let mut item = self.fetch(id)?;
        let name = tag.name.clone();
        if !item.assign_tag(tag) {
            return Ok(false);
        }
        self.update(&item, "Failed to update tags.")?;
        self.finish(Notice::success(format!("Tag '{name}' assigned.")));
        Ok(true)
    }

    /// Remove a tag from an item; returns `false` if it was not assigned
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` or `SessionError::Store`.
    pub fn remove_tag(&mut self, id: Uuid, tag_id: Uuid) -> Result<bool, SessionError> {
        let mut item = self.fetch(id)?;
        let Some(name) = item.tags.iter().find(|t| t.id == tag_id).map(|t| t.name.clone()) else {
            return Ok(false);
        };
        item.unassign_tag(tag_id);
        self.update(&item, "Failed to update tags.")?;
        self.finish(Notice::success(format!("Tag '{name}' removed.")));
        Ok(true)
    }

    /// Delete a tag record; items keep the assignment but stop showing it
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for an unknown tag or `SessionError::Store`.
    pub fn delete_tag(&mut self, tag_id: Uuid) -> Result<(), SessionError> {
        let name = self
            .tags
            .iter()
            .find(|t| t.id == tag_id)
            .map(|t| t.name.clone());
        match self.store.delete_tag(tag_id) {
            Ok(true) => {
                let label = name.unwrap_or_else(|| tag_id.to_string());
                self.finish(Notice::success(format!("Tag '{label}' deleted.")));
                Ok(())
            }
            Ok(false) => {
                self.notify(Notice::error("Tag not found."));
                Err(SessionError::NotFound(tag_id))
            }
            Err(e) => {
                self.notify(Notice::error("Failed to delete tag."));
                Err(e.into())
            }
        }
    }
}
