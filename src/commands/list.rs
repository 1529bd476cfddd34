//! List command - show a folder, a smart group or search results

use super::enter;
use crate::SmartFilesError;
use crate::cli::ListArgs;
use crate::model::FileKind;
use crate::output;
use crate::search::SearchFilters;
use crate::session::{Browser, ROOT_LABEL};
use crate::store::MetadataStore;

type Result<T> = std::result::Result<T, SmartFilesError>;

/// Execute the list command
///
/// # Errors
/// Returns an error if the folder or the sidebar tag cannot be found.
pub fn execute<S: MetadataStore>(browser: &mut Browser<S>, args: &ListArgs, quiet: bool) -> Result<()> {
    enter(browser, args.folder.as_deref())?;

    if let Some(group) = args.group {
        browser.select_group(group.into());
    }
    if let Some(name) = &args.sidebar_tag {
        let tag = browser
            .tags()
            .iter()
            .find(|t| t.name == *name)
            .map(|t| t.id)
            .ok_or_else(|| SmartFilesError::InvalidInput(format!("Tag '{name}' not found")))?;
        browser.select_tag(Some(tag));
    }

    let mut filters = SearchFilters::new();
    filters.kinds.extend(args.kinds.iter().map(|&k| FileKind::from(k)));
    filters.tags.extend(args.tags.iter().cloned());
    filters.date_range = args.since;
    browser.set_filters(filters);

    if let Some(query) = &args.query {
        browser.set_query(query.clone());
    }

    let snapshot = browser.snapshot();
    // results outside the current folder are labelled with their full path
    let nested = snapshot.visible.iter().any(|item| item.parent_id != snapshot.folder);

    if !quiet {
        println!("{}", output::breadcrumb(ROOT_LABEL, &snapshot.breadcrumb));
    }
    if snapshot.visible.is_empty() {
        if !quiet {
            println!("  (empty)");
        }
    } else {
        for item in snapshot.visible.iter() {
            let label = if nested || quiet {
                output::item_path(browser.items(), item)
            } else {
                item.name.clone()
            };
            println!("{}", output::item_line(item, &label, browser.tags(), quiet));
        }
    }
    if snapshot.skipped > 0 && !quiet {
        eprintln!("  {} record(s) could not be read", snapshot.skipped);
    }
    Ok(())
}
