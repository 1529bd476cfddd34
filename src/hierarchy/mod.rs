//! Folder tree derived from `FileItem::parent_id`
//!
//! Everything here is a pure function over a full item set; nothing is cached.
//! Parent chains are walked with explicit iteration bounded by the number of
//! items, so a corrupted chain that loops back on itself still terminates.

use crate::model::FileItem;
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// Compare two display names the way a file browser lists them
///
/// Case-insensitive, with runs of digits compared by numeric value
/// (`file2` before `file10`). Names that only differ in case are ordered by
/// their raw bytes so the order stays total.
///
/// # Examples
/// ```
/// # use smartfiles::hierarchy::compare_names;
/// # use std::cmp::Ordering;
/// assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
/// assert_eq!(compare_names("file2", "file10"), Ordering::Less);
/// assert_eq!(compare_names("Zebra", "zebra"), Ordering::Less);
/// ```
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_digits(&mut left);
                let rn = take_digits(&mut right);
                let ord = compare_numeric(&ln, &rn);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Sort items by name only
pub fn sort_by_name(items: &mut [FileItem]) {
    items.sort_by(|a, b| compare_names(&a.name, &b.name));
}

/// Sort items folders first, then by name
pub fn sort_folders_first(items: &mut [FileItem]) {
    items.sort_by(|a, b| {
        b.is_folder()
            .cmp(&a.is_folder())
            .then_with(|| compare_names(&a.name, &b.name))
    });
}

/// Direct children of `parent` (`None` for the root), folders first then by name
#[must_use]
pub fn children_of(items: &[FileItem], parent: Option<Uuid>) -> Vec<FileItem> {
    let mut children: Vec<FileItem> = items
        .iter()
        .filter(|item| item.parent_id == parent)
        .cloned()
        .collect();
    sort_folders_first(&mut children);
    children
}

fn parent_map(items: &[FileItem]) -> HashMap<Uuid, Option<Uuid>> {
    items.iter().map(|item| (item.id, item.parent_id)).collect()
}

/// Whether `candidate` lies strictly below `ancestor`
///
/// An item is never its own descendant. The walk gives up after visiting as many
/// parents as there are items; a chain that long can only be a cycle, which
/// counts as "not a descendant".
///
/// # Arguments
/// * `items` - The full item set
/// * `candidate` - Item whose parent chain is walked
/// * `ancestor` - Item looked for on that chain
#[must_use]
pub fn is_descendant(items: &[FileItem], candidate: Uuid, ancestor: Uuid) -> bool {
    if candidate == ancestor {
        return false;
    }
    let parents = parent_map(items);
    let mut current = parents.get(&candidate).copied().flatten();

    for _ in 0..parents.len() {
        match current {
            Some(id) if id == ancestor => return true,
            Some(id) => current = parents.get(&id).copied().flatten(),
            None => return false,
        }
    }

    tracing::warn!(%candidate, "parent chain does not reach the root");
    false
}

/// Folders above `id`, root first, not including `id` itself
///
/// Stops early at a missing parent or a cycle.
#[must_use]
pub fn ancestors(items: &[FileItem], id: Uuid) -> Vec<FileItem> {
    let by_id: HashMap<Uuid, &FileItem> = items.iter().map(|item| (item.id, item)).collect();
    let mut chain = Vec::new();
    let mut current = by_id.get(&id).and_then(|item| item.parent_id);

    while let Some(parent_id) = current {
        if chain.len() >= by_id.len() {
            break;
        }
        let Some(parent) = by_id.get(&parent_id) else {
            break;
        };
        if parent.id == id || chain.iter().any(|seen: &FileItem| seen.id == parent.id) {
            break;
        }
        chain.push((*parent).clone());
        current = parent.parent_id;
    }

    chain.reverse();
    chain
}

#[cfg(test)]
#[path = "hierarchy_tests.rs"]
mod hierarchy_tests;
