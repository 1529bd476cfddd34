//! Batch operations over a selection
//!
//! `BatchCoordinator` moves, copies or deletes several items with per-item
//! success and failure accounting, and keeps a single pending record so the
//! last batch can be undone once.

pub mod coordinator;
pub mod error;
pub mod types;

pub use coordinator::BatchCoordinator;
pub use error::BatchError;
pub use types::{BatchKind, BatchOperation, BatchState, BatchSummary, UndoOutcome};
