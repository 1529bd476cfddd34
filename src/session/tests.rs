use super::*;
use crate::batch::{BatchKind, UndoOutcome};
use crate::events::{Notice, NoticeLog};
use crate::hierarchy::children_of;
use crate::model::{FileKind, FileTemplate};
use crate::search::{DateRange, SmartGroup};
use crate::store::{JsonStore, MetadataStore};
use crate::testing::TestLibrary;
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn open(lib: TestLibrary) -> (Browser<JsonStore>, Arc<NoticeLog>, TempDir) {
    let (store, dir) = lib.into_parts();
    let log = Arc::new(NoticeLog::new());
    let mut browser = Browser::new(store, log.clone());
    browser.reload().unwrap();
    (browser, log, dir)
}

fn session() -> (Browser<JsonStore>, Arc<NoticeLog>, TempDir) {
    open(TestLibrary::new())
}

fn names(browser: &Browser<JsonStore>) -> Vec<String> {
    browser.visible().iter().map(|item| item.name.clone()).collect()
}

#[test]
fn test_folder_file_delete_scenario() {
    let (mut browser, log, _dir) = session();

    let docs = browser.create_folder("Docs").unwrap();
    let files = browser.store().list_files().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "Docs");
    assert!(files[0].is_folder());
    assert_eq!(files[0].parent_id, None);
    assert_eq!(log.latest(), Some(Notice::success("Folder 'Docs' created.")));

    assert!(browser.enter_folder(docs.id).unwrap());
    let a = browser.create_file("a.txt", FileKind::Text, "").unwrap();
    let children = children_of(&browser.store().list_files().unwrap(), Some(docs.id));
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].kind, FileKind::Text);
    assert_eq!(log.latest(), Some(Notice::success("Created a.txt")));

    browser.click(a.id, false).unwrap();
    let summary = browser.batch_delete().unwrap().unwrap();
    assert_eq!(summary.success, 1);
    assert!(children_of(&browser.store().list_files().unwrap(), Some(docs.id)).is_empty());
    assert!(browser.visible().is_empty());
    assert_eq!(log.latest(), Some(Notice::success("Deleted 1 item(s).")));
}

#[test]
fn test_reload_clears_selection_and_reports_skipped() {
    let lib = TestLibrary::new();
    let a = lib.file("a.txt", None, "a");
    let broken = lib
        .store()
        .metadata_dir()
        .join(crate::model::RecordKey::File(uuid::Uuid::new_v4()).file_name());
    fs::write(broken, b"{").unwrap();
    let (mut browser, _log, _dir) = open(lib);

    browser.click(a.id, false).unwrap();
    assert_eq!(browser.selection(), &[a.id]);
    browser.reload().unwrap();
    assert!(browser.selection().is_empty());
    assert_eq!(names(&browser), ["a.txt"]);
    assert_eq!(browser.snapshot().skipped, 1);
}

#[test]
fn test_strict_reload_failure_empties_listing() {
    let lib = TestLibrary::strict();
    lib.file("a.txt", None, "a");
    let broken = lib
        .store()
        .metadata_dir()
        .join(crate::model::RecordKey::File(uuid::Uuid::new_v4()).file_name());
    fs::write(broken, b"{").unwrap();
    let (store, _dir) = lib.into_parts();
    let log = Arc::new(NoticeLog::new());
    let mut browser = Browser::new(store, log.clone());

    assert!(matches!(browser.reload(), Err(SessionError::Store(_))));
    assert!(browser.visible().is_empty());
    assert_eq!(log.latest(), Some(Notice::error("Failed to load files.")));
}

#[test]
fn test_navigation_and_breadcrumb() {
    let lib = TestLibrary::new();
    let docs = lib.folder("Docs", None);
    let work = lib.folder("Work", Some(docs.id));
    let report = lib.file("report.txt", Some(work.id), "r");
    let (mut browser, _log, _dir) = open(lib);

    assert_eq!(names(&browser), ["Docs"]);
    // entering a file does nothing
    assert!(!browser.enter_folder(report.id).unwrap());

    browser.enter_folder(docs.id).unwrap();
    browser.enter_folder(work.id).unwrap();
    assert_eq!(names(&browser), ["report.txt"]);
    let crumbs: Vec<_> = browser.breadcrumb().iter().map(|f| f.name.clone()).collect();
    assert_eq!(crumbs, ["Docs", "Work"]);

    assert!(browser.go_to_breadcrumb(0).unwrap());
    assert_eq!(browser.current_folder(), Some(docs.id));
    assert!(!browser.go_to_breadcrumb(5).unwrap());

    browser.go_to_root().unwrap();
    assert_eq!(browser.current_folder(), None);
    assert!(browser.breadcrumb().is_empty());
}

#[test]
fn test_navigation_resets_query_and_filters() {
    let lib = TestLibrary::new();
    let docs = lib.folder("Docs", None);
    let (mut browser, _log, _dir) = open(lib);

    browser.set_query("doc");
    browser.toggle_kind_filter(FileKind::Folder);
    assert!(browser.filters().is_active());

    browser.enter_folder(docs.id).unwrap();
    assert_eq!(browser.query(), "");
    assert!(!browser.filters().is_active());
}

#[test]
fn test_current_folder_vanishing_returns_to_root() {
    let lib = TestLibrary::new();
    let docs = lib.folder("Docs", None);
    let (mut browser, _log, _dir) = open(lib);

    browser.enter_folder(docs.id).unwrap();
    browser.store().delete_files(&[docs.id]).unwrap();
    assert!(browser.is_stale());
    assert!(browser.sync().unwrap());
    assert_eq!(browser.current_folder(), None);
    assert!(!browser.sync().unwrap());
}

#[test]
fn test_typed_query_is_debounced() {
    let lib = TestLibrary::new();
    lib.file("alpha.txt", None, "");
    lib.file("beta.txt", None, "");
    let (browser, _log, _dir) = open(lib);
    let mut browser = browser.with_search_debounce(Duration::from_millis(300));
    browser.reload().unwrap();
    let start = Instant::now();

    browser.type_query("a", start);
    browser.type_query("al", start + Duration::from_millis(100));
    assert!(!browser.poll(start + Duration::from_millis(300)));
    assert_eq!(names(&browser).len(), 2);

    assert!(browser.poll(start + Duration::from_millis(400)));
    assert_eq!(names(&browser), ["alpha.txt"]);

    // typing back to the applied value changes nothing
    browser.type_query("al", start + Duration::from_millis(500));
    assert!(!browser.poll(start + Duration::from_secs(2)));
}

#[test]
fn test_query_searches_whole_library() {
    let lib = TestLibrary::new();
    let docs = lib.folder("Docs", None);
    lib.file("Report.txt", Some(docs.id), "");
    lib.file("other.txt", None, "");
    let (mut browser, _log, _dir) = open(lib);

    browser.set_query("report");
    assert_eq!(names(&browser), ["Report.txt"]);
}

#[test]
fn test_sidebar_groups_and_tags() {
    let lib = TestLibrary::new();
    let work = lib.tag("Work");
    lib.tag("Archive");
    lib.tag("budget");
    lib.tag("Q10");
    lib.tag("Q9");
    let mut a = lib.file("a.txt", None, "");
    a.assign_tag(work.clone());
    a.is_favorite = true;
    lib.store().save_file(&a).unwrap();
    lib.file("b.txt", None, "");
    let (mut browser, _log, _dir) = open(lib);

    let sidebar = browser.sidebar();
    let tag_names: Vec<_> = sidebar.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tag_names, ["Archive", "budget", "Q9", "Q10", "Work"]);
    assert_eq!(sidebar.groups, SmartGroup::ALL.to_vec());
    assert_eq!(sidebar.selected_group, Some(SmartGroup::All));

    browser.select_tag(Some(work.id));
    assert_eq!(names(&browser), ["a.txt"]);
    assert_eq!(browser.sidebar().selected_group, None);

    browser.select_group(SmartGroup::Favorites);
    assert_eq!(browser.sidebar().selected_tag, None);
    assert_eq!(names(&browser), ["a.txt"]);

    browser.select_tag(None);
    assert_eq!(names(&browser).len(), 2);
}

#[test]
fn test_filter_panel() {
    let lib = TestLibrary::new();
    lib.file("a.txt", None, "");
    lib.file("b.md", None, "");
    let (mut browser, _log, _dir) = open(lib);

    browser.toggle_kind_filter(FileKind::Markdown);
    assert_eq!(names(&browser), ["b.md"]);
    browser.toggle_kind_filter(FileKind::Markdown);
    assert_eq!(names(&browser).len(), 2);

    browser.toggle_tag_filter("Work");
    assert!(browser.visible().is_empty());
    browser.toggle_tag_filter("Work");

    browser.set_date_range(Some(DateRange::PastDay));
    assert_eq!(names(&browser).len(), 2);
    browser.reset_search_and_filters();
    assert!(!browser.filters().is_active());
}

#[test]
fn test_selection_modes() {
    let lib = TestLibrary::new();
    let a = lib.file("a.txt", None, "");
    let b = lib.file("b.txt", None, "");
    let (mut browser, _log, _dir) = open(lib);

    browser.click(a.id, false).unwrap();
    browser.click(b.id, true).unwrap();
    assert!(browser.is_multi_select());
    assert!(browser.snapshot().multi_select);

    browser.click(b.id, false).unwrap();
    assert_eq!(browser.selection(), &[b.id]);
    browser.click(b.id, false).unwrap();
    assert!(browser.selection().is_empty());

    browser.select_all();
    assert_eq!(browser.selection().len(), 2);
    browser.deselect_all();
    assert!(browser.selection().is_empty());
}

#[test]
fn test_protected_item_needs_the_gate() {
    let lib = TestLibrary::new();
    let mut secret = lib.file("secret.txt", None, "s");
    secret.is_protected = true;
    lib.store().save_file(&secret).unwrap();
    let (browser, log, _dir) = open(lib);
    let mut browser = browser.with_gate(DenyAll);
    browser.reload().unwrap();

    assert!(matches!(
        browser.click(secret.id, false),
        Err(SessionError::ProtectionDenied(_))
    ));
    assert!(browser.selection().is_empty());
    assert_eq!(log.latest(), Some(Notice::error("Authentication failed.")));

    assert!(browser.set_protected(secret.id, false).is_err());
    assert!(browser.store().get_file(secret.id).unwrap().unwrap().is_protected);
}

#[test]
fn test_protection_toggle_with_allowing_gate() {
    let lib = TestLibrary::new();
    let a = lib.file("a.txt", None, "");
    let (mut browser, log, _dir) = open(lib);

    assert!(browser.toggle_protection(a.id).unwrap());
    assert_eq!(log.latest(), Some(Notice::success("Protection enabled.")));
    browser.click(a.id, false).unwrap();
    assert!(!browser.toggle_protection(a.id).unwrap());
    assert_eq!(log.latest(), Some(Notice::success("Protection removed.")));
}

#[test]
fn test_favorite_rename_duplicate() {
    let lib = TestLibrary::new();
    let a = lib.file("a.txt", None, "hello");
    let (mut browser, log, _dir) = open(lib);

    assert!(browser.toggle_favorite(a.id).unwrap());
    assert_eq!(log.latest(), Some(Notice::success("Added to Favorites.")));
    assert!(!browser.toggle_favorite(a.id).unwrap());
    assert_eq!(log.latest(), Some(Notice::success("Removed from Favorites.")));

    let renamed = browser.rename(a.id, " b.txt ").unwrap();
    assert_eq!(renamed.name, "b.txt");
    assert_eq!(log.latest(), Some(Notice::success("Renamed to 'b.txt'.")));
    assert!(matches!(browser.rename(a.id, "  "), Err(SessionError::InvalidOperation(_))));

    let copy = browser.duplicate(a.id).unwrap();
    assert_eq!(copy.name, "b.txt copy");
    assert_eq!(log.latest(), Some(Notice::success("File duplicated successfully.")));
    assert_eq!(names(&browser), ["b.txt", "b.txt copy"]);
}

#[test]
fn test_unknown_ids_report_file_not_found() {
    let (mut browser, log, _dir) = session();
    let ghost = uuid::Uuid::new_v4();

    assert!(matches!(browser.rename(ghost, "x"), Err(SessionError::NotFound(_))));
    assert_eq!(log.latest(), Some(Notice::error("File not found.")));
    assert!(matches!(browser.duplicate(ghost), Err(SessionError::NotFound(_))));
    assert!(matches!(browser.toggle_favorite(ghost), Err(SessionError::NotFound(_))));
}

#[test]
fn test_move_item_rules() {
    let lib = TestLibrary::new();
    let docs = lib.folder("Docs", None);
    let inner = lib.folder("Inner", Some(docs.id));
    let a = lib.file("a.txt", None, "");
    let (mut browser, log, _dir) = open(lib);

    assert!(browser.move_item(docs.id, Some(inner.id)).is_err());
    assert_eq!(
        log.latest(),
        Some(Notice::error("Cannot move a folder into itself or its subfolders."))
    );
    assert!(browser.move_item(docs.id, Some(docs.id)).is_err());
    assert!(browser.move_item(docs.id, Some(a.id)).is_err());
    assert_eq!(log.latest(), Some(Notice::error("Can only move files to folders.")));

    browser.move_item(a.id, Some(docs.id)).unwrap();
    assert_eq!(log.latest(), Some(Notice::success("Moved 'a.txt' to 'Docs'.")));
    browser.move_item(a.id, None).unwrap();
    assert_eq!(log.latest(), Some(Notice::success("Moved 'a.txt' to 'Library'.")));
}

#[test]
fn test_delete_items_counts_only_existing() {
    let lib = TestLibrary::new();
    let a = lib.file("a.txt", None, "");
    let (mut browser, log, _dir) = open(lib);

    assert_eq!(browser.delete_items(&[a.id, uuid::Uuid::new_v4()]).unwrap(), 1);
    assert_eq!(log.latest(), Some(Notice::success("Successfully deleted 1 item(s).")));
    assert!(browser.visible().is_empty());
}

#[test]
fn test_templates_and_import() {
    let (mut browser, log, dir) = session();

    let md = browser.create_from_template("notes", FileTemplate::MARKDOWN).unwrap();
    assert_eq!(md.name, "notes.md");
    assert_eq!(fs::read_to_string(md.url.unwrap()).unwrap(), "# New Document\n\n");

    let outside = dir.path().join("photo.png");
    fs::write(&outside, b"png").unwrap();
    let missing = dir.path().join("missing.pdf");
    let summary = browser.import_files(&[outside.clone(), missing]).unwrap();
    assert_eq!(summary.imported.len(), 1);
    assert_eq!(summary.imported[0].kind, FileKind::Image);
    assert_eq!(summary.imported[0].size, Some(3));
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(
        log.latest(),
        Some(Notice::error("Imported 1 file(s), failed to import 1 file(s)."))
    );

    // name already taken in the blob root
    assert!(browser.import_file(&outside).is_err());
}

#[test]
fn test_batch_move_and_undo_through_session() {
    let lib = TestLibrary::new();
    let docs = lib.folder("Docs", None);
    let a = lib.file("a.txt", None, "");
    let b = lib.file("b.txt", None, "");
    let (mut browser, log, _dir) = open(lib);

    browser.click(a.id, false).unwrap();
    browser.click(b.id, true).unwrap();
    let summary = browser.batch_move(Some(docs.id)).unwrap().unwrap();
    assert_eq!(summary.success, 2);
    assert!(browser.selection().is_empty());
    assert_eq!(log.latest(), Some(Notice::success("Moved 2 item(s) to 'Docs'.")));
    assert_eq!(names(&browser), ["Docs"]);
    assert_eq!(browser.snapshot().undo_available, Some(BatchKind::Move));

    assert_eq!(
        browser.undo().unwrap(),
        UndoOutcome::Restored { restored: 2, failed: 0 }
    );
    assert_eq!(names(&browser), ["Docs", "a.txt", "b.txt"]);
    assert_eq!(browser.undo().unwrap(), UndoOutcome::NothingToUndo);
}

#[test]
fn test_batch_with_empty_selection_does_nothing() {
    let (mut browser, log, _dir) = session();
    assert!(browser.batch_copy(None).unwrap().is_none());
    assert!(log.is_empty());
}

#[test]
fn test_tag_intents() {
    let lib = TestLibrary::new();
    let a = lib.file("a.txt", None, "");
    let (mut browser, log, _dir) = open(lib);

    let urgent = browser.create_and_assign_tag(a.id, "Urgent").unwrap();
    assert_eq!(log.latest(), Some(Notice::success("Tag 'Urgent' created and assigned.")));
    assert!(urgent.color_hex.is_some());

    // assigning again is a silent no-op
    let before = log.len();
    assert!(!browser.assign_tag(a.id, urgent.id).unwrap());
    assert_eq!(log.len(), before);

    let work = browser.create_tag("Work", Some("#007AFF".into())).unwrap();
    let before = log.len();
    assert!(browser.assign_tag(a.id, work.id).unwrap());
    assert_eq!(log.len(), before + 1);
    assert_eq!(log.latest(), Some(Notice::success("Tag 'Work' assigned.")));

    assert!(browser.remove_tag(a.id, urgent.id).unwrap());
    assert_eq!(log.len(), before + 2);
    assert_eq!(log.latest(), Some(Notice::success("Tag 'Urgent' removed.")));

    assert!(!browser.remove_tag(a.id, urgent.id).unwrap());
    assert_eq!(log.len(), before + 2);

    let unknown = uuid::Uuid::new_v4();
    assert!(matches!(browser.assign_tag(a.id, unknown), Err(SessionError::NotFound(_))));
    assert_eq!(log.len(), before + 3);
    assert_eq!(log.latest(), Some(Notice::error("Tag not found.")));

    browser.select_tag(Some(work.id));
    browser.delete_tag(work.id).unwrap();
    assert_eq!(browser.sidebar().selected_tag, None);
    assert_eq!(browser.sidebar().selected_group, Some(SmartGroup::All));
    // the assignment stays on the record
    assert!(browser.store().get_file(a.id).unwrap().unwrap().has_tag(work.id));
    assert!(matches!(browser.delete_tag(work.id), Err(SessionError::NotFound(_))));
}

#[test]
fn test_write_succeeds_when_listing_afterwards_fails() {
    let lib = TestLibrary::strict();
    let (store, _dir) = lib.into_parts();
    let log = Arc::new(NoticeLog::new());
    let mut browser = Browser::new(store, log.clone());
    browser.reload().unwrap();

    let broken = browser
        .store()
        .metadata_dir()
        .join(crate::model::RecordKey::File(uuid::Uuid::new_v4()).file_name());
    fs::write(broken, b"{").unwrap();

    let docs = browser.create_folder("Docs").unwrap();
    assert_eq!(log.all(), vec![Notice::success("Folder 'Docs' created.")]);
    assert!(browser.store().get_file(docs.id).unwrap().is_some());
    assert!(browser.is_stale());
}

#[test]
fn test_record_version() {
    let lib = TestLibrary::new();
    let a = lib.file("a.txt", None, "");
    let (mut browser, _log, _dir) = open(lib);

    let version = browser.record_version(a.id, "ana", "first draft").unwrap();
    let stored = browser.store().get_file(a.id).unwrap().unwrap();
    assert_eq!(stored.versions.unwrap(), vec![version]);
}

#[test]
fn test_stale_refresh_is_discarded() {
    let (mut browser, _log, _dir) = session();
    let old = browser.begin_refresh();
    let new = browser.begin_refresh();

    let listing = crate::store::Listing {
        items: vec![crate::testing::item("ghost.txt", FileKind::Text, None)],
        skipped: Vec::new(),
    };
    assert!(!browser.complete_refresh(old, listing, Vec::new()));
    assert!(browser.visible().is_empty());
    assert!(browser.complete_refresh(new, crate::store::Listing::default(), Vec::new()));
}

#[test]
fn test_dropping_browser_unsubscribes() {
    let (store, dir) = TestLibrary::new().into_parts();
    let store = Arc::new(store);
    let browser = Browser::new(Arc::clone(&store), Arc::new(NoticeLog::new()));
    assert_eq!(store.events().subscriber_count(), 1);
    drop(browser);
    assert_eq!(store.events().subscriber_count(), 0);
    drop(dir);
}
