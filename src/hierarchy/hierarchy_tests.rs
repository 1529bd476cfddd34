use super::*;
use crate::model::FileKind;
use crate::testing::item;

fn names(items: &[FileItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

#[test]
fn test_children_folders_first_then_name() {
    let docs = item("docs", FileKind::Folder, None);
    let items = vec![
        item("b.txt", FileKind::Text, None),
        item("Zeta", FileKind::Folder, None),
        item("A.md", FileKind::Markdown, None),
        docs.clone(),
        item("inside.txt", FileKind::Text, Some(docs.id)),
    ];

    let root = children_of(&items, None);
    assert_eq!(names(&root), vec!["docs", "Zeta", "A.md", "b.txt"]);

    let inside = children_of(&items, Some(docs.id));
    assert_eq!(names(&inside), vec!["inside.txt"]);
}

#[test]
fn test_compare_names_numeric_runs() {
    let mut items = vec![
        item("file10", FileKind::Text, None),
        item("file2", FileKind::Text, None),
        item("File1", FileKind::Text, None),
        item("file02b", FileKind::Text, None),
    ];
    sort_by_name(&mut items);
    assert_eq!(names(&items), vec!["File1", "file2", "file02b", "file10"]);
}

#[test]
fn test_compare_names_is_total() {
    assert_eq!(compare_names("same", "same"), Ordering::Equal);
    assert_ne!(compare_names("Same", "same"), Ordering::Equal);
    assert_eq!(compare_names("a", "ab"), Ordering::Less);
}

#[test]
fn test_is_descendant() {
    let a = item("A", FileKind::Folder, None);
    let b = item("B", FileKind::Folder, Some(a.id));
    let c = item("C", FileKind::Folder, Some(b.id));
    let other = item("Other", FileKind::Folder, None);
    let items = vec![a.clone(), b.clone(), c.clone(), other.clone()];

    assert!(is_descendant(&items, c.id, a.id));
    assert!(is_descendant(&items, b.id, a.id));
    assert!(!is_descendant(&items, a.id, c.id));
    assert!(!is_descendant(&items, other.id, a.id));
    assert!(!is_descendant(&items, a.id, a.id));
}

#[test]
fn test_is_descendant_terminates_on_cycle() {
    let mut a = item("A", FileKind::Folder, None);
    let b = item("B", FileKind::Folder, Some(a.id));
    a.parent_id = Some(b.id);
    let outsider = item("X", FileKind::Folder, None);
    let items = vec![a.clone(), b.clone(), outsider.clone()];

    assert!(!is_descendant(&items, a.id, outsider.id));
    assert!(!is_descendant(&items, a.id, a.id));
    assert!(is_descendant(&items, a.id, b.id));
    assert!(ancestors(&items, a.id).len() <= 1);
}

#[test]
fn test_is_descendant_unknown_ids() {
    let a = item("A", FileKind::Folder, None);
    let items = vec![a.clone()];
    assert!(!is_descendant(&items, Uuid::new_v4(), a.id));
    assert!(!is_descendant(&items, a.id, Uuid::new_v4()));
}

#[test]
fn test_ancestors_root_first() {
    let a = item("A", FileKind::Folder, None);
    let b = item("B", FileKind::Folder, Some(a.id));
    let c = item("C", FileKind::Folder, Some(b.id));
    let items = vec![c.clone(), b.clone(), a.clone()];

    assert_eq!(names(&ancestors(&items, c.id)), vec!["A", "B"]);
    assert!(ancestors(&items, a.id).is_empty());
}
