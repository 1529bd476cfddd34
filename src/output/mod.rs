//! Output formatting for CLI display
//!
//! Turns items, tags and version records into terminal lines.

use crate::hierarchy::ancestors;
use crate::model::{FileItem, FileKind, FileVersion, Tag};
use colored::Colorize;

/// Path of an item from the library root, e.g. `Docs/Work/a.txt`
#[must_use]
pub fn item_path(items: &[FileItem], item: &FileItem) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let chain = ancestors(items, item.id);
    parts.extend(chain.iter().map(|folder| folder.name.as_str()));
    parts.push(&item.name);
    parts.join("/")
}

/// Breadcrumb line for the folder being listed
#[must_use]
pub fn breadcrumb(root_label: &str, folders: &[FileItem]) -> String {
    std::iter::once(root_label)
        .chain(folders.iter().map(|f| f.name.as_str()))
        .collect::<Vec<_>>()
        .join(" / ")
}

const fn kind_marker(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Folder => "d",
        FileKind::Text | FileKind::Markdown => "t",
        FileKind::Code => "c",
        FileKind::Image => "i",
        FileKind::Pdf => "p",
        FileKind::Other => "-",
    }
}

/// Format an item for a listing
///
/// Only tags still present in `catalog` are shown. In quiet mode only the
/// label is printed.
#[must_use]
pub fn item_line(item: &FileItem, label: &str, catalog: &[Tag], quiet: bool) -> String {
    if quiet {
        return label.to_string();
    }

    let name = if item.is_folder() {
        format!("{label}/").blue().bold().to_string()
    } else {
        label.to_string()
    };
    let size = if item.is_folder() {
        String::new()
    } else {
        item.size_string()
    };
    let mut flags = String::new();
    if item.is_favorite {
        flags.push_str(&" ★".yellow().to_string());
    }
    if item.is_protected {
        flags.push_str(&" [protected]".red().to_string());
    }

    let tags: Vec<&str> = item.live_tags(catalog).iter().map(|t| t.name.as_str()).collect();
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", tags.join(", ")).cyan().to_string()
    };

    format!(
        "  {} {:>10}  {}  {name}{flags}{tags}",
        kind_marker(item.kind),
        size,
        item.modified_at.format("%Y-%m-%d %H:%M"),
    )
}

/// Format a tag with usage count
#[must_use]
pub fn tag_with_count(tag: &Tag, count: usize, quiet: bool) -> String {
    if quiet {
        tag.name.clone()
    } else {
        let color = tag.color_hex.as_deref().unwrap_or("");
        format!("  {} {} (used by {count} item(s))", tag.name, color.dimmed())
    }
}

/// Format a version record
#[must_use]
pub fn version_line(version: &FileVersion) -> String {
    format!(
        "  {}  {}  {}",
        version.timestamp.format("%Y-%m-%d %H:%M"),
        version.author.green(),
        version.note
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::item;

    #[test]
    fn test_item_path_walks_parents() {
        let docs = FileItem::folder("Docs", None);
        let work = FileItem::folder("Work", Some(docs.id));
        let a = item("a.txt", FileKind::Text, Some(work.id));
        let items = vec![docs, work, a.clone()];

        assert_eq!(item_path(&items, &a), "Docs/Work/a.txt");
    }

    #[test]
    fn test_breadcrumb() {
        let docs = FileItem::folder("Docs", None);
        assert_eq!(breadcrumb("Library", &[]), "Library");
        assert_eq!(breadcrumb("Library", &[docs]), "Library / Docs");
    }

    #[test]
    fn test_quiet_item_line_is_label_only() {
        let a = item("a.txt", FileKind::Text, None);
        assert_eq!(item_line(&a, "Docs/a.txt", &[], true), "Docs/a.txt");
    }

    #[test]
    fn test_item_line_hides_dangling_tags() {
        colored::control::set_override(false);
        let live = Tag::new("Work", None);
        let gone = Tag::new("Old", None);
        let mut a = item("a.txt", FileKind::Text, None);
        a.assign_tag(live.clone());
        a.assign_tag(gone);

        let line = item_line(&a, "a.txt", &[live], false);
        assert!(line.contains("[Work]"));
        assert!(!line.contains("Old"));
    }
}
