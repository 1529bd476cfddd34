//! Change notification and user-facing notices
//!
//! Two channels leave the core:
//!
//! - **`ChangeBus`**: the store broadcasts a `StoreEvent` after every successful
//!   write. Read-side caches (visible list, sidebar tag list) subscribe and mark
//!   themselves stale.
//! - **`Notifier`**: every user intent reports exactly one `Notice`
//!   (kind + message). The core never renders notices; front ends decide how.

mod bus;
mod notice;

pub use bus::{ChangeBus, StoreEvent, Subscription};
pub use notice::{Notice, NoticeKind, NoticeLog, Notifier, StdoutNotifier};
