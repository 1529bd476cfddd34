//! Refresh sequencing and query debouncing
//!
//! A `RefreshGate` hands out increasing sequence numbers; a computed list is only
//! applied if it belongs to the most recent request. A `Debouncer` holds a value
//! until it has been stable for the configured delay. Both take the current
//! `Instant` from the caller, so neither ever sleeps.

use std::time::{Duration, Instant};

/// Sequence number of one refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Supersession tracker for refresh requests
#[derive(Debug, Default)]
pub struct RefreshGate {
    issued: u64,
    applied: u64,
}

impl RefreshGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier one
    pub fn begin(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Decide whether the result for `ticket` may be applied
    ///
    /// Only the latest request is accepted, and at most once.
    pub fn accept(&mut self, ticket: RefreshTicket) -> bool {
        if ticket.0 != self.issued || ticket.0 <= self.applied {
            tracing::trace!(ticket = ticket.0, latest = self.issued, "dropping stale refresh");
            return false;
        }
        self.applied = ticket.0;
        true
    }

    /// Sequence number of the most recent request, 0 before the first
    #[must_use]
    pub const fn latest(&self) -> u64 {
        self.issued
    }
}

/// Trailing-edge debouncer with duplicate suppression
///
/// A pushed value is released by `poll` once `delay` has passed without another
/// push. A released value equal to the previously released one is swallowed.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
    last: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            last: None,
        }
    }

    /// Treat `value` as already released, e.g. the initial query
    #[must_use]
    pub fn with_initial(mut self, value: T) -> Self {
        self.last = Some(value);
        self
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the timer
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Release the pending value if it is due and differs from the last release
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.deadline()?;
        if now < due {
            return None;
        }
        let (value, _) = self.pending.take()?;
        self.release(value)
    }

    /// Release the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        let (value, _) = self.pending.take()?;
        self.release(value)
    }

    /// Drop the pending value and reset the duplicate filter to `value`
    pub fn reset(&mut self, value: T) {
        self.pending = None;
        self.last = Some(value);
    }

    fn release(&mut self, value: T) -> Option<T> {
        if self.last.as_ref() == Some(&value) {
            return None;
        }
        self.last = Some(value.clone());
        Some(value)
    }
}
