//! Durable storage of library records and file blobs
//!
//! The store owns every persisted `FileItem` and `Tag` and the bytes behind them.
//! Everything else in the crate (hierarchy, search, batch, session) works on
//! derived views that can always be rebuilt from `MetadataStore::list_files`.

pub mod blob;
pub mod error;
pub mod json;
pub mod traits;

pub use blob::FsBlobBackend;
pub use error::StoreError;
pub use json::JsonStore;
pub use traits::{BlobBackend, Listing, MetadataStore, SkippedRecord};
