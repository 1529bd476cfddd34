//! Interactive setup wizard for first-time configuration
//!
//! Asks where the library should live when smartfiles is run for the first time.

use super::SmartFilesConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

/// Interactive first-time setup - prompts for the library location
///
/// 1. Prompts for the library directory (default: system data directory)
/// 2. Creates and saves the configuration
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The system data directory cannot be determined
/// - User input cannot be read
/// - The configuration cannot be saved
///
/// # Examples
/// ```ignore
/// use smartfiles::config::first_time_setup;
///
/// let config = first_time_setup()?;
/// println!("Library at {}", config.library_root()?.display());
/// ```
pub fn first_time_setup() -> Result<SmartFilesConfig, ConfigError> {
    println!("Welcome to smartfiles! Let's set up your library.\n");

    let default_root = SmartFilesConfig::default_library_root()?;
    let root: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Library location")
        .default(default_root.to_string_lossy().to_string())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let config = SmartFilesConfig {
        library_root: Some(PathBuf::from(root)),
        ..SmartFilesConfig::default()
    };
    config.save()?;

    println!("\nConfiguration saved successfully!");
    Ok(config)
}
