//! Batch records, summaries and states

use crate::events::Notice;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Kind of multi-item operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    Move,
    Copy,
    Delete,
}

impl BatchKind {
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Move => "Move",
            Self::Copy => "Copy",
            Self::Delete => "Delete",
        }
    }

    const fn verbs(self) -> (&'static str, &'static str) {
        match self {
            Self::Move => ("Moved", "move"),
            Self::Copy => ("Copied", "copy"),
            Self::Delete => ("Deleted", "delete"),
        }
    }
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Audit and undo record of the last batch
///
/// `ids` are the items the batch actually produced or changed: moved items for a
/// move, the new duplicates for a copy, removed items for a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOperation {
    pub kind: BatchKind,
    pub ids: Vec<Uuid>,
    /// Folder being browsed when the batch ran
    pub source_folder: Option<Uuid>,
    pub target_folder: Option<Uuid>,
    /// Parent of each moved item before the move
    pub origins: HashMap<Uuid, Option<Uuid>>,
    pub success_count: usize,
    pub failed_count: usize,
    pub created_at: DateTime<Utc>,
}

impl BatchOperation {
    #[must_use]
    pub fn new(kind: BatchKind, source_folder: Option<Uuid>, target_folder: Option<Uuid>) -> Self {
        Self {
            kind,
            ids: Vec::new(),
            source_folder,
            target_folder,
            origins: HashMap::new(),
            success_count: 0,
            failed_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Folder `id` should return to on undo
    ///
    /// Falls back to the source folder when no origin was recorded for `id`.
    #[must_use]
    pub fn origin_of(&self, id: Uuid) -> Option<Uuid> {
        self.origins.get(&id).copied().unwrap_or(self.source_folder)
    }
}

/// Per-item accounting of one batch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub kind: BatchKind,
    pub success: usize,
    /// Selected ids that no longer existed (deletes only)
    pub skipped: usize,
    pub failed: usize,
    pub error_messages: Vec<String>,
}

impl BatchSummary {
    #[must_use]
    pub const fn new(kind: BatchKind) -> Self {
        Self {
            kind,
            success: 0,
            skipped: 0,
            failed: 0,
            error_messages: Vec::new(),
        }
    }

    pub const fn add_success(&mut self) {
        self.success += 1;
    }

    pub const fn add_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn add_error(&mut self, msg: String) {
        self.failed += 1;
        self.error_messages.push(msg);
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// The single notice reported for this batch
    ///
    /// `target_name` is the display name of the destination folder.
    #[must_use]
    pub fn notice(&self, target_name: &str) -> Notice {
        let (done, verb) = self.kind.verbs();
        if self.failed > 0 {
            return Notice::error(format!(
                "{done} {} item(s), failed to {verb} {} item(s).",
                self.success, self.failed
            ));
        }
        match self.kind {
            BatchKind::Delete => Notice::success(format!("{done} {} item(s).", self.success)),
            BatchKind::Move | BatchKind::Copy => {
                Notice::success(format!("{done} {} item(s) to '{target_name}'.", self.success))
            }
        }
    }
}

/// Progress of the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchState {
    #[default]
    Idle,
    Running { kind: BatchKind, total: usize },
    Completed { kind: BatchKind, success: usize, failed: usize },
}

/// Result of an undo request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    NothingToUndo,
    /// A move was reverted
    Restored { restored: usize, failed: usize },
    /// The duplicates of a copy were deleted
    Removed { removed: usize, failed: usize },
    /// Deletions cannot be reverted
    Unsupported,
}

impl UndoOutcome {
    #[must_use]
    pub fn notice(&self) -> Notice {
        match *self {
            Self::NothingToUndo => Notice::error("Nothing to undo."),
            Self::Restored { restored, failed: 0 } => {
                Notice::success(format!("Moved {restored} item(s) back to the original folder."))
            }
            Self::Restored { failed, .. } => Notice::error(format!("Undo completed with {failed} failure(s).")),
            Self::Removed { failed: 0, .. } => Notice::success("Removed copied items."),
            Self::Removed { .. } => Notice::error("Failed to undo copy operation."),
            Self::Unsupported => Notice::error("Undo for deletions is not supported."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_notices() {
        let mut summary = BatchSummary::new(BatchKind::Move);
        summary.add_success();
        summary.add_success();
        assert_eq!(summary.notice("Docs"), Notice::success("Moved 2 item(s) to 'Docs'."));

        summary.add_error("boom".into());
        assert_eq!(
            summary.notice("Docs"),
            Notice::error("Moved 2 item(s), failed to move 1 item(s).")
        );

        let mut delete = BatchSummary::new(BatchKind::Delete);
        delete.add_success();
        delete.add_skip();
        assert_eq!(delete.notice(""), Notice::success("Deleted 1 item(s)."));
    }

    #[test]
    fn test_origin_falls_back_to_source() {
        let source = Uuid::new_v4();
        let moved = Uuid::new_v4();
        let mut op = BatchOperation::new(BatchKind::Move, Some(source), None);
        op.origins.insert(moved, None);

        assert_eq!(op.origin_of(moved), None);
        assert_eq!(op.origin_of(Uuid::new_v4()), Some(source));
    }

    #[test]
    fn test_undo_notices() {
        assert_eq!(
            UndoOutcome::Unsupported.notice(),
            Notice::error("Undo for deletions is not supported.")
        );
        assert_eq!(
            UndoOutcome::Removed { removed: 2, failed: 0 }.notice(),
            Notice::success("Removed copied items.")
        );
        assert!(UndoOutcome::Restored { restored: 1, failed: 1 }.notice().is_error());
    }
}
