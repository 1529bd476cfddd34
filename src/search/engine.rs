//! Visible-list pipeline
//!
//! Stages run in a fixed order over the full item set:
//!
//! 1. Scope: current folder children, or every item when a non-"all" group is
//!    selected or a text query is present
//! 2. Smart group (favorites, recents)
//! 3. Selected sidebar tag
//! 4. Text query on the name
//! 5. Kinds
//! 6. Tag names (the item must carry all of them)
//! 7. Date range

use super::filters::{SearchFilters, SmartGroup};
use crate::hierarchy::{children_of, sort_by_name};
use crate::model::FileItem;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

/// Default number of items shown under "Recents"
pub const DEFAULT_RECENTS_LIMIT: usize = 20;

/// Everything that decides what the browser shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    /// Folder being browsed; `None` is the root
    pub folder: Option<Uuid>,
    pub query: String,
    pub filters: SearchFilters,
    /// Selected smart group; `None` while a sidebar tag is selected instead
    pub group: Option<SmartGroup>,
    /// Selected sidebar tag
    pub tag: Option<Uuid>,
    pub recents_limit: usize,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            folder: None,
            query: String::new(),
            filters: SearchFilters::default(),
            group: Some(SmartGroup::All),
            tag: None,
            recents_limit: DEFAULT_RECENTS_LIMIT,
        }
    }
}

impl ViewQuery {
    /// Whether the view is just "the current folder, unfiltered"
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.query.is_empty()
            && !self.filters.is_active()
            && self.group == Some(SmartGroup::All)
            && self.tag.is_none()
    }

    fn spans_library(&self) -> bool {
        matches!(self.group, Some(g) if g != SmartGroup::All) || !self.query.is_empty()
    }
}

/// Compute the visible list
///
/// `now` anchors the date-range stage. The input is never modified.
///
/// # Examples
/// ```
/// # use smartfiles::model::{FileItem, FileKind};
/// # use smartfiles::search::{visible_items, ViewQuery};
/// let items = vec![
///     FileItem::new("b.txt", FileKind::Text),
///     FileItem::folder("Docs", None),
/// ];
/// let visible = visible_items(&items, &ViewQuery::default(), chrono::Utc::now());
/// assert_eq!(visible[0].name, "Docs");
/// ```
#[must_use]
pub fn visible_items(items: &[FileItem], view: &ViewQuery, now: DateTime<Utc>) -> Vec<FileItem> {
    let mut visible = if view.spans_library() {
        let mut all = items.to_vec();
        sort_by_name(&mut all);
        all
    } else {
        children_of(items, view.folder)
    };

    if view.is_plain() {
        return visible;
    }

    match view.group {
        Some(SmartGroup::Favorites) => visible.retain(|item| item.is_favorite),
        Some(SmartGroup::Recents) => {
            visible.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
            visible.truncate(view.recents_limit);
        }
        Some(SmartGroup::All) | None => {}
    }

    if let Some(tag_id) = view.tag {
        visible.retain(|item| item.has_tag(tag_id));
    }

    if !view.query.is_empty() {
        let needle = view.query.to_lowercase();
        visible.retain(|item| item.name.to_lowercase().contains(&needle));
    }

    let filters = &view.filters;
    if !filters.kinds.is_empty() {
        visible.retain(|item| filters.kinds.contains(&item.kind));
    }

    if !filters.tags.is_empty() {
        visible.retain(|item| {
            let names: HashSet<&str> = item.tag_names().collect();
            filters.tags.iter().all(|wanted| names.contains(wanted.as_str()))
        });
    }

    if let Some(range) = filters.date_range {
        let start = range.start_from(now);
        visible.retain(|item| item.modified_at >= start);
    }

    visible
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
