//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and runs the matching intents on a `Browser`.

pub mod batch;
pub mod config;
pub mod gate;
pub mod item;
pub mod list;
pub mod tag;

pub use gate::PromptGate;

use crate::cli::Commands;
use crate::model::FileItem;
use crate::session::Browser;
use crate::store::MetadataStore;
use crate::{Result, SmartFilesError};
use uuid::Uuid;

/// Run every command except `config`
///
/// # Errors
/// Returns an error if an item reference cannot be resolved or the intent fails.
pub fn execute<S: MetadataStore>(browser: &mut Browser<S>, command: &Commands, quiet: bool) -> Result<()> {
    match command {
        Commands::List(args) => list::execute(browser, args, quiet),
        Commands::Info { item } => item::info(browser, item, quiet),
        Commands::Mkdir { name, parent } => item::mkdir(browser, name, parent.as_deref()),
        Commands::New { name, template, parent } => {
            item::new_file(browser, name, (*template).into(), parent.as_deref())
        }
        Commands::Import { files, parent } => item::import(browser, files, parent.as_deref(), quiet),
        Commands::Rename { item, new_name } => item::rename(browser, item, new_name),
        Commands::Duplicate { item } => item::duplicate(browser, item),
        Commands::Fav { item } => item::favorite(browser, item),
        Commands::Protect { item, off } => item::protect(browser, item, !off),
        Commands::History { item, note, author } => {
            item::history(browser, item, note.as_deref(), author.as_deref(), quiet)
        }
        Commands::Move { items, to } => batch::move_items(browser, items, to.as_deref(), quiet),
        Commands::Copy { items, to } => batch::copy_items(browser, items, to.as_deref(), quiet),
        Commands::Remove { items, yes } => batch::remove_items(browser, items, *yes, quiet),
        Commands::Tag { command } => tag::execute(browser, command, quiet),
        Commands::Config(_) => Err(SmartFilesError::InvalidInput(
            "config commands do not need a library".into(),
        )),
    }
}

/// Find an item by id or by its path from the library root
///
/// # Errors
/// Returns `SmartFilesError::InvalidInput` if nothing matches or a path segment
/// matches several items.
pub fn resolve(items: &[FileItem], reference: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(reference)
        && items.iter().any(|item| item.id == id)
    {
        return Ok(id);
    }

    let mut parent: Option<Uuid> = None;
    let mut found = None;
    for segment in reference.split('/').filter(|s| !s.is_empty()) {
        let mut matches = items
            .iter()
            .filter(|item| item.parent_id == parent && item.name == segment);
        let Some(hit) = matches.next() else {
            return Err(SmartFilesError::InvalidInput(format!("No item at '{reference}'")));
        };
        if matches.next().is_some() {
            return Err(SmartFilesError::InvalidInput(format!(
                "'{reference}' is ambiguous; use the item id"
            )));
        }
        parent = Some(hit.id);
        found = Some(hit.id);
    }

    found.ok_or_else(|| SmartFilesError::InvalidInput(format!("No item at '{reference}'")))
}

/// Resolve a destination folder; `None`, `""` and `"/"` mean the root
///
/// # Errors
/// Returns `SmartFilesError::InvalidInput` if the reference does not name a folder.
pub fn resolve_folder(items: &[FileItem], reference: Option<&str>) -> Result<Option<Uuid>> {
    let Some(reference) = reference.filter(|r| !r.trim_matches('/').is_empty()) else {
        return Ok(None);
    };
    let id = resolve(items, reference)?;
    if items.iter().any(|item| item.id == id && item.is_folder()) {
        Ok(Some(id))
    } else {
        Err(SmartFilesError::InvalidInput(format!("'{reference}' is not a folder")))
    }
}

/// Browse into the folder that new items should land in
///
/// # Errors
/// Returns an error if the folder cannot be resolved or the listing reloaded.
pub fn enter<S: MetadataStore>(browser: &mut Browser<S>, folder: Option<&str>) -> Result<()> {
    match resolve_folder(browser.items(), folder)? {
        Some(id) => {
            browser.enter_folder(id)?;
        }
        None => browser.go_to_root()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileKind;
    use crate::testing::item;

    fn fixture() -> (Vec<FileItem>, FileItem, FileItem) {
        let docs = FileItem::folder("Docs", None);
        let a = item("a.txt", FileKind::Text, Some(docs.id));
        let items = vec![docs.clone(), a.clone(), item("a.txt", FileKind::Text, None)];
        (items, docs, a)
    }

    #[test]
    fn test_resolve_by_path_and_id() {
        let (items, docs, a) = fixture();
        assert_eq!(resolve(&items, "Docs").unwrap(), docs.id);
        assert_eq!(resolve(&items, "/Docs/a.txt").unwrap(), a.id);
        assert_eq!(resolve(&items, &a.id.to_string()).unwrap(), a.id);
        assert!(resolve(&items, "Docs/b.txt").is_err());
        assert!(resolve(&items, "").is_err());
    }

    #[test]
    fn test_resolve_rejects_ambiguous_names() {
        let (mut items, _, _) = fixture();
        items.push(item("a.txt", FileKind::Text, None));
        assert!(resolve(&items, "a.txt").is_err());
    }

    #[test]
    fn test_resolve_folder() {
        let (items, docs, _) = fixture();
        assert_eq!(resolve_folder(&items, None).unwrap(), None);
        assert_eq!(resolve_folder(&items, Some("/")).unwrap(), None);
        assert_eq!(resolve_folder(&items, Some("Docs")).unwrap(), Some(docs.id));
        assert!(resolve_folder(&items, Some("Docs/a.txt")).is_err());
    }
}
