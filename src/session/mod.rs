//! Browsing session
//!
//! A `Browser` ties the store, the search pipeline and the batch coordinator
//! together. Front ends call its intents (create, rename, move, tag, ...) and
//! render `BrowserSnapshot`s; outcomes are reported through a `Notifier`.
//!
//! # Examples
//!
//! ```no_run
//! # use smartfiles::session::Browser;
//! # use smartfiles::store::JsonStore;
//! # use smartfiles::events::StdoutNotifier;
//! # use std::sync::Arc;
//! let store = JsonStore::open("/tmp/library")?;
//! let mut browser = Browser::new(store, Arc::new(StdoutNotifier::new(false)));
//! browser.reload()?;
//! let docs = browser.create_folder("Docs")?;
//! browser.enter_folder(docs.id)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod browser;
pub mod error;
pub mod gate;
mod intents;
pub mod state;

pub use browser::{Browser, DEFAULT_SEARCH_DEBOUNCE, ROOT_LABEL};
pub use error::SessionError;
pub use gate::{AllowAll, DenyAll, ProtectionGate};
pub use state::{BrowserSnapshot, ImportSummary, Selection, Sidebar};

#[cfg(test)]
mod tests;
