//! Multi-item move, copy and delete with a single undo slot

use super::error::BatchError;
use super::types::{BatchKind, BatchOperation, BatchState, BatchSummary, UndoOutcome};
use crate::hierarchy::is_descendant;
use crate::model::FileItem;
use crate::store::MetadataStore;
use chrono::Utc;
use uuid::Uuid;

/// Runs batches against a store and keeps the record needed to undo the last one
///
/// Items are processed one at a time; a failing item is counted and the batch
/// carries on with the next one.
#[derive(Debug, Default)]
pub struct BatchCoordinator {
    pending: Option<BatchOperation>,
    state: BatchState,
}

impl BatchCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record of the batch that `undo` would revert
    #[must_use]
    pub const fn pending(&self) -> Option<&BatchOperation> {
        self.pending.as_ref()
    }

    #[must_use]
    pub const fn state(&self) -> BatchState {
        self.state
    }

    fn start(&mut self, kind: BatchKind, total: usize) {
        self.state = BatchState::Running { kind, total };
        tracing::debug!(%kind, total, "batch started");
    }

    fn finish(&mut self, mut operation: BatchOperation, summary: &BatchSummary) {
        operation.success_count = summary.success;
        operation.failed_count = summary.failed;
        tracing::info!(
            kind = %summary.kind,
            success = summary.success,
            skipped = summary.skipped,
            failed = summary.failed,
            "batch completed"
        );
        for msg in &summary.error_messages {
            tracing::debug!(kind = %summary.kind, error = %msg, "batch item failed");
        }
        self.state = BatchState::Completed {
            kind: summary.kind,
            success: summary.success,
            failed: summary.failed,
        };
        self.pending = Some(operation);
    }

    /// Move every selected item under `target` (`None` is the root)
    ///
    /// Returns `None` for an empty selection, which leaves the pending undo
    /// record untouched.
    ///
    /// # Arguments
    /// * `store` - Store to write through
    /// * `items` - Full item set, used for the folder checks
    /// * `selection` - Ids to move
    /// * `source_folder` - Folder being browsed
    /// * `target` - Destination folder
    pub fn batch_move(
        &mut self,
        store: &dyn MetadataStore,
        items: &[FileItem],
        selection: &[Uuid],
        source_folder: Option<Uuid>,
        target: Option<Uuid>,
    ) -> Option<BatchSummary> {
        if selection.is_empty() {
            return None;
        }
        self.start(BatchKind::Move, selection.len());

        let mut summary = BatchSummary::new(BatchKind::Move);
        let mut operation = BatchOperation::new(BatchKind::Move, source_folder, target);
        let target_ok = target_is_folder(items, target);

        for &id in selection {
            match move_one(store, items, id, target, target_ok) {
                Ok(origin) => {
                    operation.ids.push(id);
                    operation.origins.insert(id, origin);
                    summary.add_success();
                }
                Err(e) => summary.add_error(format!("{id}: {e}")),
            }
        }

        self.finish(operation, &summary);
        Some(summary)
    }

    /// Duplicate every selected item into `target`
    ///
    /// The duplicates' ids are recorded so undo can remove them. Folders are
    /// duplicated as a single record; their children are not copied.
    pub fn batch_copy(
        &mut self,
        store: &dyn MetadataStore,
        items: &[FileItem],
        selection: &[Uuid],
        source_folder: Option<Uuid>,
        target: Option<Uuid>,
    ) -> Option<BatchSummary> {
        if selection.is_empty() {
            return None;
        }
        self.start(BatchKind::Copy, selection.len());

        let mut summary = BatchSummary::new(BatchKind::Copy);
        let mut operation = BatchOperation::new(BatchKind::Copy, source_folder, target);
        let target_ok = target_is_folder(items, target);

        for &id in selection {
            match copy_one(store, items, id, target, target_ok) {
                Ok(copy_id) => {
                    operation.ids.push(copy_id);
                    summary.add_success();
                }
                Err(e) => summary.add_error(format!("{id}: {e}")),
            }
        }

        self.finish(operation, &summary);
        Some(summary)
    }

    /// Delete every selected item and its blob
    ///
    /// Ids that no longer exist are counted as skipped, not failed.
    pub fn batch_delete(
        &mut self,
        store: &dyn MetadataStore,
        selection: &[Uuid],
        source_folder: Option<Uuid>,
    ) -> Option<BatchSummary> {
        if selection.is_empty() {
            return None;
        }
        self.start(BatchKind::Delete, selection.len());

        let mut summary = BatchSummary::new(BatchKind::Delete);
        let mut operation = BatchOperation::new(BatchKind::Delete, source_folder, None);

        for &id in selection {
            match store.delete_files(&[id]) {
                Ok(0) => summary.add_skip(),
                Ok(_) => {
                    operation.ids.push(id);
                    summary.add_success();
                }
                Err(e) => summary.add_error(format!("{id}: {e}")),
            }
        }

        self.finish(operation, &summary);
        Some(summary)
    }

    /// Revert the last batch, once
    ///
    /// The pending record is cleared whatever the outcome.
    pub fn undo(&mut self, store: &dyn MetadataStore) -> UndoOutcome {
        let Some(operation) = self.pending.take() else {
            return UndoOutcome::NothingToUndo;
        };
        self.state = BatchState::Idle;

        match operation.kind {
            BatchKind::Move => {
                let (mut restored, mut failed) = (0, 0);
                for &id in &operation.ids {
                    match restore_parent(store, id, operation.origin_of(id)) {
                        Ok(()) => restored += 1,
                        Err(e) => {
                            tracing::warn!(%id, error = %e, "could not restore moved item");
                            failed += 1;
                        }
                    }
                }
                UndoOutcome::Restored { restored, failed }
            }
            BatchKind::Copy => {
                let (mut removed, mut failed) = (0, 0);
                for &id in &operation.ids {
                    match store.delete_files(&[id]) {
                        Ok(n) => removed += n,
                        Err(e) => {
                            tracing::warn!(%id, error = %e, "could not remove copied item");
                            failed += 1;
                        }
                    }
                }
                UndoOutcome::Removed { removed, failed }
            }
            BatchKind::Delete => UndoOutcome::Unsupported,
        }
    }
}

fn target_is_folder(items: &[FileItem], target: Option<Uuid>) -> bool {
    target.is_none_or(|t| items.iter().any(|item| item.id == t && item.is_folder()))
}

fn check_destination(
    items: &[FileItem],
    id: Uuid,
    target: Option<Uuid>,
    target_ok: bool,
) -> Result<(), BatchError> {
    if !target_ok {
        return Err(BatchError::not_a_folder());
    }
    if let Some(t) = target {
        let is_folder = items.iter().any(|item| item.id == id && item.is_folder());
        if is_folder && (t == id || is_descendant(items, t, id)) {
            return Err(BatchError::into_folder());
        }
    }
    Ok(())
}

fn move_one(
    store: &dyn MetadataStore,
    items: &[FileItem],
    id: Uuid,
    target: Option<Uuid>,
    target_ok: bool,
) -> Result<Option<Uuid>, BatchError> {
    check_destination(items, id, target, target_ok)?;
    let mut item = store.get_file(id)?.ok_or(BatchError::NotFound(id))?;
    let origin = item.parent_id;
    item.parent_id = target;
    item.modified_at = Utc::now();
    store.save_file(&item)?;
    Ok(origin)
}

fn copy_one(
    store: &dyn MetadataStore,
    items: &[FileItem],
    id: Uuid,
    target: Option<Uuid>,
    target_ok: bool,
) -> Result<Uuid, BatchError> {
    check_destination(items, id, target, target_ok)?;
    let mut copy = store.duplicate_file(id)?.ok_or(BatchError::NotFound(id))?;
    copy.parent_id = target;
    copy.modified_at = Utc::now();
    if let Err(e) = store.save_file(&copy) {
        if let Err(cleanup) = store.delete_files(&[copy.id]) {
            tracing::warn!(id = %copy.id, error = %cleanup, "could not remove partial copy");
        }
        return Err(e.into());
    }
    Ok(copy.id)
}

fn restore_parent(store: &dyn MetadataStore, id: Uuid, parent: Option<Uuid>) -> Result<(), BatchError> {
    let mut item = store.get_file(id)?.ok_or(BatchError::NotFound(id))?;
    item.parent_id = parent;
    item.modified_at = Utc::now();
    store.save_file(&item)?;
    Ok(())
}
