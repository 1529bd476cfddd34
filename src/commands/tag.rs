//! Tag command - tag catalog and assignments

use super::resolve;
use crate::SmartFilesError;
use crate::cli::TagCommands;
use crate::output;
use crate::session::Browser;
use crate::store::MetadataStore;
use uuid::Uuid;

type Result<T> = std::result::Result<T, SmartFilesError>;

/// Execute a tag subcommand
///
/// # Errors
/// Returns an error if an item or tag cannot be found or the intent fails.
pub fn execute<S: MetadataStore>(browser: &mut Browser<S>, command: &TagCommands, quiet: bool) -> Result<()> {
    match command {
        TagCommands::List => {
            list(browser, quiet);
            Ok(())
        }
        TagCommands::Create { name, color } => {
            browser.create_tag(name, color.clone())?;
            Ok(())
        }
        TagCommands::Add { item, tag } => add(browser, item, tag, quiet),
        TagCommands::Remove { item, tag } => remove(browser, item, tag, quiet),
        TagCommands::Delete { tag } => {
            let id = find_tag(browser, tag)?;
            browser.delete_tag(id)?;
            Ok(())
        }
    }
}

fn find_tag<S: MetadataStore>(browser: &Browser<S>, name: &str) -> Result<Uuid> {
    browser
        .tags()
        .iter()
        .find(|t| t.name == name)
        .map(|t| t.id)
        .ok_or_else(|| SmartFilesError::InvalidInput(format!("Tag '{name}' not found")))
}

fn list<S: MetadataStore>(browser: &Browser<S>, quiet: bool) {
    if browser.tags().is_empty() {
        if !quiet {
            println!("No tags found.");
        }
        return;
    }
    if !quiet {
        println!("Tags:");
    }
    for tag in browser.tags() {
        let count = browser.items().iter().filter(|item| item.has_tag(tag.id)).count();
        println!("{}", output::tag_with_count(tag, count, quiet));
    }
}

fn add<S: MetadataStore>(browser: &mut Browser<S>, reference: &str, name: &str, quiet: bool) -> Result<()> {
    let id = resolve(browser.items(), reference)?;
    match find_tag(browser, name) {
        Ok(tag_id) => {
            if !browser.assign_tag(id, tag_id)? && !quiet {
                println!("'{reference}' already has tag '{name}'.");
            }
        }
        Err(_) => {
            browser.create_and_assign_tag(id, name)?;
        }
    }
    Ok(())
}

fn remove<S: MetadataStore>(browser: &mut Browser<S>, reference: &str, name: &str, quiet: bool) -> Result<()> {
    let id = resolve(browser.items(), reference)?;
    // dangling assignments can be removed by name too
    let tag_id = browser
        .item(id)
        .and_then(|item| item.tags.iter().find(|t| t.name == name).map(|t| t.id));
    let removed = match tag_id {
        Some(tag_id) => browser.remove_tag(id, tag_id)?,
        None => false,
    };
    if !removed && !quiet {
        println!("'{reference}' does not have tag '{name}'.");
    }
    Ok(())
}
