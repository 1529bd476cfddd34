//! Terminal confirmation for protected items

use crate::model::FileItem;
use crate::session::ProtectionGate;
use dialoguer::{Confirm, theme::ColorfulTheme};

/// Asks on the terminal before a protected item is used or unprotected
///
/// With `assume_yes` no prompt is shown and access is granted.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptGate {
    assume_yes: bool,
}

impl PromptGate {
    #[must_use]
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl ProtectionGate for PromptGate {
    fn authenticate(&self, item: &FileItem) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("'{}' is protected. Continue?", item.name))
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "could not read confirmation");
                false
            })
    }
}
