//! Browsing state: listing, navigation, selection, query and sidebar
//!
//! `Browser` is the single writer of a session. All mutation goes through
//! `&mut self`, so intents run one after another; readers get `BrowserSnapshot`s.

use super::error::SessionError;
use super::gate::{AllowAll, ProtectionGate};
use super::state::{BrowserSnapshot, Selection, Sidebar};
use crate::batch::BatchCoordinator;
use crate::events::{Notice, Notifier, Subscription};
use crate::hierarchy::{ancestors, compare_names, sort_by_name};
use crate::model::{FileItem, Tag};
use crate::search::{
    DateRange, Debouncer, RefreshGate, RefreshTicket, SearchFilters, SmartGroup,
    ViewQuery, visible_items,
};
use crate::store::{Listing, MetadataStore, StoreError};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Display name of the library root in notices
pub const ROOT_LABEL: &str = "Library";

/// Default quiet period before a typed query is applied
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// File browser session over a store
pub struct Browser<S: MetadataStore> {
    pub(super) store: S,
    pub(super) notifier: Arc<dyn Notifier>,
    pub(super) gate: Box<dyn ProtectionGate>,
    pub(super) batch: BatchCoordinator,
    pub(super) items: Vec<FileItem>,
    pub(super) tags: Vec<Tag>,
    skipped: usize,
    pub(super) view: ViewQuery,
    typed: Debouncer<String>,
    refresh: RefreshGate,
    pub(super) selection: Selection,
    visible: Arc<[FileItem]>,
    dirty: Arc<AtomicBool>,
    subscription: Subscription,
}

impl<S: MetadataStore> Browser<S> {
    /// Create a session; call `reload` to load the listing
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        let dirty = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&dirty);
        let subscription = store.events().subscribe(move |event| {
            tracing::trace!(?event, "listing is stale");
            flag.store(true, Ordering::Release);
        });

        Self {
            store,
            notifier,
            gate: Box::new(AllowAll),
            batch: BatchCoordinator::new(),
            items: Vec::new(),
            tags: Vec::new(),
            skipped: 0,
            view: ViewQuery::default(),
            typed: Debouncer::new(DEFAULT_SEARCH_DEBOUNCE).with_initial(String::new()),
            refresh: RefreshGate::new(),
            selection: Selection::new(),
            visible: Arc::from(Vec::new()),
            dirty,
            subscription,
        }
    }

    #[must_use]
    pub fn with_gate(mut self, gate: impl ProtectionGate + 'static) -> Self {
        self.gate = Box::new(gate);
        self
    }

    #[must_use]
    pub fn with_recents_limit(mut self, limit: usize) -> Self {
        self.view.recents_limit = limit;
        self
    }

    #[must_use]
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.typed = Debouncer::new(delay).with_initial(self.view.query.clone());
        self
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub(super) fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    // --- listing ---------------------------------------------------------

    /// Start a refresh; only the newest started refresh can be completed
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.refresh.begin()
    }

    /// Apply a listing computed for `ticket`
    ///
    /// Returns `false` (and changes nothing) if a newer refresh was started since.
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, listing: Listing, tags: Vec<Tag>) -> bool {
        if !self.refresh.accept(ticket) {
            return false;
        }
        let mut items = listing.items;
        sort_by_name(&mut items);
        self.items = items;
        self.skipped = listing.skipped.len();
        self.tags = tags;
        self.tags.sort_by(|a, b| compare_names(&a.name, &b.name));
        self.selection.clear();

        if let Some(folder) = self.view.folder
            && !self.items.iter().any(|item| item.id == folder && item.is_folder())
        {
            tracing::debug!(%folder, "current folder is gone, returning to root");
            self.view.folder = None;
        }
        if let Some(tag) = self.view.tag
            && !self.tags.iter().any(|t| t.id == tag)
        {
            self.view.tag = None;
            self.view.group = Some(SmartGroup::All);
        }

        self.recompute();
        true
    }

    /// Re-read the store and recompute the visible list
    ///
    /// On failure the listing is emptied and an error notice is reported.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if the records cannot be listed.
    pub fn reload(&mut self) -> Result<(), SessionError> {
        if let Err(e) = self.load_listing() {
            tracing::warn!(error = %e, "listing failed");
            let ticket = self.begin_refresh();
            self.complete_refresh(ticket, Listing::default(), Vec::new());
            self.notify(Notice::error("Failed to load files."));
            return Err(e.into());
        }
        Ok(())
    }

    /// Scan the store and apply the result; on failure the current view is kept
    pub(super) fn load_listing(&mut self) -> Result<(), StoreError> {
        self.dirty.store(false, Ordering::Release);
        let ticket = self.begin_refresh();
        let listing = self.store.scan_files()?;
        let tags = self.store.list_tags()?;
        if !listing.skipped.is_empty() {
            tracing::warn!(count = listing.skipped.len(), "some records could not be read");
        }
        self.complete_refresh(ticket, listing, tags);
        Ok(())
    }

    pub(super) fn mark_stale(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Reload if the store changed since the last load
    ///
    /// # Errors
    ///
    /// Same as `reload`.
    pub fn sync(&mut self) -> Result<bool, SessionError> {
        if self.dirty.load(Ordering::Acquire) {
            self.reload()?;
            return Ok(true);
        }
        Ok(false)
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    fn recompute(&mut self) {
        self.visible = Arc::from(visible_items(&self.items, &self.view, Utc::now()));
    }

    /// Every readable item, sorted by name
    #[must_use]
    pub fn items(&self) -> &[FileItem] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, id: Uuid) -> Option<&FileItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn visible(&self) -> Arc<[FileItem]> {
        Arc::clone(&self.visible)
    }

    #[must_use]
    pub fn snapshot(&self) -> BrowserSnapshot {
        BrowserSnapshot {
            folder: self.view.folder,
            breadcrumb: self.breadcrumb(),
            visible: Arc::clone(&self.visible),
            selection: self.selection.ids().to_vec(),
            multi_select: self.selection.is_multi(),
            query: self.view.query.clone(),
            filters: self.view.filters.clone(),
            group: self.view.group,
            tag: self.view.tag,
            skipped: self.skipped,
            undo_available: self.batch.pending().map(|op| op.kind),
        }
    }

    // --- navigation ------------------------------------------------------

    #[must_use]
    pub const fn current_folder(&self) -> Option<Uuid> {
        self.view.folder
    }

    /// Folders from the root down to the current folder, inclusive
    #[must_use]
    pub fn breadcrumb(&self) -> Vec<FileItem> {
        let Some(folder) = self.view.folder else {
            return Vec::new();
        };
        let mut path = ancestors(&self.items, folder);
        if let Some(current) = self.item(folder) {
            path.push(current.clone());
        }
        path
    }

    /// Browse into `id`; non-folders are ignored
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if the reload fails.
    pub fn enter_folder(&mut self, id: Uuid) -> Result<bool, SessionError> {
        if !self.item(id).is_some_and(FileItem::is_folder) {
            return Ok(false);
        }
        self.navigate(Some(id))?;
        Ok(true)
    }

    /// Jump to the breadcrumb entry at `index`; out of range is ignored
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if the reload fails.
    pub fn go_to_breadcrumb(&mut self, index: usize) -> Result<bool, SessionError> {
        let Some(target) = self.breadcrumb().get(index).map(|f| f.id) else {
            return Ok(false);
        };
        self.navigate(Some(target))?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Store` if the reload fails.
    pub fn go_to_root(&mut self) -> Result<(), SessionError> {
        self.navigate(None)
    }

    fn navigate(&mut self, folder: Option<Uuid>) -> Result<(), SessionError> {
        self.view.folder = folder;
        self.reset_search_and_filters();
        self.reload()
    }

    /// Clear the query and every advanced filter
    pub fn reset_search_and_filters(&mut self) {
        self.view.query.clear();
        self.view.filters = SearchFilters::default();
        self.typed.reset(String::new());
        self.recompute();
    }

    // --- selection -------------------------------------------------------

    /// Click on an item; `additive` toggles it instead of replacing the selection
    ///
    /// Protected items are only selected after the protection gate agrees.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ProtectionDenied` if the gate refuses.
    pub fn click(&mut self, id: Uuid, additive: bool) -> Result<(), SessionError> {
        if let Some(item) = self.visible.iter().find(|item| item.id == id)
            && item.is_protected
            && !self.gate.authenticate(item)
        {
            let name = item.name.clone();
            self.notify(Notice::error("Authentication failed."));
            return Err(SessionError::ProtectionDenied(name));
        }

        if additive {
            self.selection.toggle(id);
        } else {
            self.selection.click(id);
        }
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.selection.set(self.visible.iter().map(|item| item.id));
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn selection(&self) -> &[Uuid] {
        self.selection.ids()
    }

    #[must_use]
    pub fn is_multi_select(&self) -> bool {
        self.selection.is_multi()
    }

    // --- query, filters, sidebar ----------------------------------------

    /// Record a keystroke; the query is applied once typing pauses
    pub fn type_query(&mut self, query: impl Into<String>, now: Instant) {
        self.typed.push(query.into(), now);
    }

    /// Apply a typed query whose quiet period has elapsed
    ///
    /// Returns `true` if the visible list was recomputed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.typed.poll(now) {
            Some(query) => {
                self.view.query = query;
                self.recompute();
                true
            }
            None => false,
        }
    }

    /// When the pending typed query becomes due
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.typed.deadline()
    }

    /// Apply a query immediately
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.typed.reset(query.clone());
        self.view.query = query;
        self.recompute();
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.view.query
    }

    pub fn set_filters(&mut self, filters: SearchFilters) {
        self.view.filters = filters;
        self.recompute();
    }

    #[must_use]
    pub const fn filters(&self) -> &SearchFilters {
        &self.view.filters
    }

    pub fn toggle_kind_filter(&mut self, kind: crate::model::FileKind) {
        if !self.view.filters.kinds.remove(&kind) {
            self.view.filters.kinds.insert(kind);
        }
        self.recompute();
    }

    pub fn toggle_tag_filter(&mut self, name: &str) {
        if !self.view.filters.tags.remove(name) {
            self.view.filters.tags.insert(name.to_string());
        }
        self.recompute();
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.view.filters.date_range = range;
        self.recompute();
    }

    pub fn select_group(&mut self, group: SmartGroup) {
        self.view.group = Some(group);
        self.view.tag = None;
        self.recompute();
    }

    /// Select a sidebar tag; `None` returns to "All Files"
    pub fn select_tag(&mut self, tag: Option<Uuid>) {
        match tag {
            Some(id) => {
                self.view.tag = Some(id);
                self.view.group = None;
            }
            None => {
                self.view.tag = None;
                self.view.group = Some(SmartGroup::All);
            }
        }
        self.recompute();
    }

    /// Tags known to the store, sorted by name
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    #[must_use]
    pub fn sidebar(&self) -> Sidebar {
        Sidebar {
            groups: SmartGroup::ALL.to_vec(),
            tags: self.tags.clone(),
            selected_group: self.view.group,
            selected_tag: self.view.tag,
        }
    }

    /// Display name of a move/copy destination
    pub(super) fn folder_label(&self, folder: Option<Uuid>) -> String {
        folder
            .and_then(|id| self.item(id))
            .map_or_else(|| ROOT_LABEL.to_string(), |f| f.name.clone())
    }

    /// Selected ids in listing order
    pub(super) fn selected_in_order(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self
            .items
            .iter()
            .filter(|item| self.selection.contains(item.id))
            .map(|item| item.id)
            .collect();
        // ids that are selected but no longer listed still go to the batch
        let unlisted: Vec<Uuid> = self
            .selection
            .ids()
            .iter()
            .filter(|id| !ids.contains(id))
            .copied()
            .collect();
        ids.extend(unlisted);
        ids
    }
}

impl<S: MetadataStore> Drop for Browser<S> {
    fn drop(&mut self) {
        self.store.events().unsubscribe(self.subscription);
    }
}
