//! Single-item commands: info, create, import, rename, duplicate, flags, history

use super::{enter, resolve};
use crate::SmartFilesError;
use crate::model::FileTemplate;
use crate::output;
use crate::session::Browser;
use crate::store::MetadataStore;
use colored::Colorize;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, SmartFilesError>;

/// Print the details of an item
///
/// # Errors
/// Returns an error if the item cannot be resolved.
pub fn info<S: MetadataStore>(browser: &Browser<S>, reference: &str, quiet: bool) -> Result<()> {
    let id = resolve(browser.items(), reference)?;
    let Some(item) = browser.item(id) else {
        return Err(SmartFilesError::InvalidInput(format!("No item at '{reference}'")));
    };

    let path = output::item_path(browser.items(), item);
    if quiet {
        println!("{path}");
        return Ok(());
    }

    println!("{}", path.bold());
    println!("  id:        {}", item.id);
    println!("  kind:      {}", item.kind.as_str());
    if !item.is_folder() {
        println!("  size:      {}", item.size_string());
    }
    println!("  created:   {}", item.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  modified:  {}", item.modified_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(accessed) = item.accessed_at {
        println!("  accessed:  {}", accessed.format("%Y-%m-%d %H:%M:%S"));
    }
    println!("  favorite:  {}", item.is_favorite);
    println!("  protected: {}", item.is_protected);

    let tags: Vec<&str> = item
        .live_tags(browser.tags())
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    println!("  tags:      {}", if tags.is_empty() { "-".to_string() } else { tags.join(", ") });
    let versions = item.versions.as_ref().map_or(0, Vec::len);
    println!("  versions:  {versions}");
    Ok(())
}

/// # Errors
/// Returns an error if the parent folder cannot be resolved or the folder
/// cannot be created.
pub fn mkdir<S: MetadataStore>(browser: &mut Browser<S>, name: &str, parent: Option<&str>) -> Result<()> {
    enter(browser, parent)?;
    browser.create_folder(name)?;
    Ok(())
}

/// # Errors
/// Returns an error if the parent folder cannot be resolved or the file
/// cannot be created.
pub fn new_file<S: MetadataStore>(
    browser: &mut Browser<S>,
    name: &str,
    template: FileTemplate,
    parent: Option<&str>,
) -> Result<()> {
    enter(browser, parent)?;
    browser.create_from_template(name, template)?;
    Ok(())
}

/// Import external files; failures are listed one per line
///
/// # Errors
/// Returns an error if the destination cannot be resolved, or if no file
/// could be imported.
pub fn import<S: MetadataStore>(
    browser: &mut Browser<S>,
    files: &[PathBuf],
    parent: Option<&str>,
    quiet: bool,
) -> Result<()> {
    enter(browser, parent)?;
    let summary = browser.import_files(files)?;
    if !quiet {
        for (path, reason) in &summary.failed {
            eprintln!("  {} {}: {reason}", "✗".red(), path.display());
        }
    }
    if summary.imported.is_empty() && !summary.failed.is_empty() {
        return Err(SmartFilesError::InvalidInput("No files were imported".into()));
    }
    Ok(())
}

/// # Errors
/// Returns an error if the item cannot be resolved or renamed.
pub fn rename<S: MetadataStore>(browser: &mut Browser<S>, reference: &str, new_name: &str) -> Result<()> {
    let id = resolve(browser.items(), reference)?;
    browser.rename(id, new_name)?;
    Ok(())
}

/// # Errors
/// Returns an error if the item cannot be resolved or duplicated.
pub fn duplicate<S: MetadataStore>(browser: &mut Browser<S>, reference: &str) -> Result<()> {
    let id = resolve(browser.items(), reference)?;
    browser.duplicate(id)?;
    Ok(())
}

/// # Errors
/// Returns an error if the item cannot be resolved or saved.
pub fn favorite<S: MetadataStore>(browser: &mut Browser<S>, reference: &str) -> Result<()> {
    let id = resolve(browser.items(), reference)?;
    browser.toggle_favorite(id)?;
    Ok(())
}

/// # Errors
/// Returns an error if the item cannot be resolved, the gate refuses, or the
/// record cannot be saved.
pub fn protect<S: MetadataStore>(browser: &mut Browser<S>, reference: &str, on: bool) -> Result<()> {
    let id = resolve(browser.items(), reference)?;
    browser.set_protected(id, on)?;
    Ok(())
}

/// Show the version history, or append a record when `note` is given
///
/// # Errors
/// Returns an error if the item cannot be resolved or saved.
pub fn history<S: MetadataStore>(
    browser: &mut Browser<S>,
    reference: &str,
    note: Option<&str>,
    author: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let id = resolve(browser.items(), reference)?;

    if let Some(note) = note {
        let author = author
            .map(str::to_string)
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "unknown".to_string());
        browser.record_version(id, &author, note)?;
        return Ok(());
    }

    let versions = browser
        .item(id)
        .and_then(|item| item.versions.clone())
        .unwrap_or_default();
    if versions.is_empty() {
        if !quiet {
            println!("No versions recorded.");
        }
        return Ok(());
    }
    for version in &versions {
        println!("{}", output::version_line(version));
    }
    Ok(())
}
