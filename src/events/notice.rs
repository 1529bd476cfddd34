//! User-facing notices
//!
//! The core reports the outcome of each intent as a `Notice`. Front ends plug in
//! a `Notifier`: `StdoutNotifier` for the command line, `NoticeLog` for anything
//! that wants to render or inspect notices later (toasts, status bars, tests).

use colored::Colorize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One summary message for one user intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Sink for notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Prints notices to stdout/stderr
#[derive(Debug, Default)]
pub struct StdoutNotifier {
    quiet: bool,
}

impl StdoutNotifier {
    /// With `quiet`, success notices are suppressed; errors are always printed.
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for StdoutNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success if !self.quiet => println!("{} {}", "✓".green(), notice.message),
            NoticeKind::Success => {}
            NoticeKind::Error => eprintln!("{} {}", "✗".red(), notice.message),
        }
    }
}

/// Records notices in arrival order
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn latest(&self) -> Option<Notice> {
        self.lock().last().cloned()
    }

    #[must_use]
    pub fn all(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return every recorded notice
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.lock())
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.lock().push(notice);
    }
}
