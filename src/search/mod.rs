//! Filtering and ordering of the visible file list
//!
//! `visible_items` is a pure function of the full item set and a `ViewQuery`.
//! `RefreshGate` and `Debouncer` sequence the recomputations a front end triggers
//! while the user types.

pub mod engine;
pub mod filters;
pub mod refresh;

pub use engine::{DEFAULT_RECENTS_LIMIT, ViewQuery, visible_items};
pub use filters::{DateRange, SearchFilters, SmartGroup};
pub use refresh::{Debouncer, RefreshGate, RefreshTicket};
