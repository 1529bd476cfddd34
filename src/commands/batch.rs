//! Multi-item commands: move, copy and remove

use super::{resolve, resolve_folder};
use crate::SmartFilesError;
use crate::batch::BatchSummary;
use crate::session::Browser;
use crate::store::MetadataStore;
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use uuid::Uuid;

type Result<T> = std::result::Result<T, SmartFilesError>;

/// Replace the selection with the referenced items, in order and without repeats
fn select<S: MetadataStore>(browser: &mut Browser<S>, references: &[String]) -> Result<Vec<Uuid>> {
    let mut ids: Vec<Uuid> = Vec::new();
    for reference in references {
        let id = resolve(browser.items(), reference)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    browser.deselect_all();
    for &id in &ids {
        browser.click(id, true)?;
    }
    Ok(ids)
}

fn report(summary: Option<&BatchSummary>, quiet: bool) {
    let Some(summary) = summary else {
        return;
    };
    if quiet {
        return;
    }
    for msg in &summary.error_messages {
        eprintln!("  {} {msg}", "✗".red());
    }
}

/// # Errors
/// Returns an error if an item or the destination cannot be resolved.
pub fn move_items<S: MetadataStore>(
    browser: &mut Browser<S>,
    references: &[String],
    to: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let target = resolve_folder(browser.items(), to)?;
    select(browser, references)?;
    let summary = browser.batch_move(target)?;
    report(summary.as_ref(), quiet);
    Ok(())
}

/// # Errors
/// Returns an error if an item or the destination cannot be resolved.
pub fn copy_items<S: MetadataStore>(
    browser: &mut Browser<S>,
    references: &[String],
    to: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let target = resolve_folder(browser.items(), to)?;
    select(browser, references)?;
    let summary = browser.batch_copy(target)?;
    report(summary.as_ref(), quiet);
    Ok(())
}

/// Delete items after confirmation (skipped with `yes`)
///
/// # Errors
/// Returns an error if an item cannot be resolved or the prompt fails.
pub fn remove_items<S: MetadataStore>(
    browser: &mut Browser<S>,
    references: &[String],
    yes: bool,
    quiet: bool,
) -> Result<()> {
    let ids = select(browser, references)?;

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {} item(s)?", ids.len()))
            .default(false)
            .interact()
            .map_err(|e| SmartFilesError::InvalidInput(format!("Failed to read input: {e}")))?;
        if !confirmed {
            if !quiet {
                println!("Cancelled.");
            }
            return Ok(());
        }
    }

    let summary = browser.batch_delete()?;
    report(summary.as_ref(), quiet);
    Ok(())
}
