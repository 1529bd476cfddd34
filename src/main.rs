//! smartfiles CLI application entry point
//!
//! A command-line front end for the smartfiles library: browse folders and
//! smart groups, create and import files, tag them, and move, copy or delete
//! several items at once.
//!
//! # Usage
//!
//! ```bash
//! # List the library root (default command)
//! smartfiles
//! smartfiles ls Docs
//!
//! # Search the whole library, keeping markdown files tagged "Work"
//! smartfiles ls -s report -k markdown -t Work
//!
//! # Create and import
//! smartfiles mkdir Docs
//! smartfiles new notes -T markdown --in Docs
//! smartfiles import ~/Downloads/report.pdf --in Docs
//!
//! # Batches
//! smartfiles mv Docs/notes.md report.pdf --to Archive
//! smartfiles rm -y Archive/report.pdf
//!
//! # Quiet mode (only output results)
//! smartfiles -q ls -g favorites
//! ```
//!
//! # Configuration
//!
//! On first run, smartfiles asks where the library should live. Configuration is
//! stored in the user's config directory (`~/.config/smartfiles/config.toml` on
//! Linux); `SMARTFILES_*` environment variables override it and `RUST_LOG`
//! overrides `log_level`.

use smartfiles::{
    Result,
    cli::{Cli, Commands},
    commands::{self, PromptGate},
    config::SmartFilesConfig,
    events::StdoutNotifier,
    session::Browser,
    store::JsonStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Install the log subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the smartfiles application
///
/// Loads configuration, parses command-line arguments, and dispatches to the
/// appropriate command handler.
///
/// # Errors
///
/// Returns `SmartFilesError` if configuration loading fails, the library cannot
/// be opened, or any command handler returns an error.
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let command = cli.get_command();

    let config = if cli.library.is_some() {
        SmartFilesConfig::load()?
    } else {
        SmartFilesConfig::load_or_setup()?
    };
    init_tracing(&config.log_level);

    let quiet = cli.quiet || config.quiet;

    if let Commands::Config(command) = &command {
        return commands::config::execute(config, command, quiet);
    }

    let root = match &cli.library {
        Some(root) => root.clone(),
        None => config.library_root()?,
    };
    tracing::debug!(root = %root.display(), "opening library");
    let store = JsonStore::open_with(root, &config.files_dir, config.strict_listing)?;

    let mut browser = Browser::new(store, Arc::new(StdoutNotifier::new(quiet)))
        .with_gate(PromptGate::default())
        .with_recents_limit(config.recents_limit)
        .with_search_debounce(Duration::from_millis(config.search_debounce_ms));
    browser.reload()?;

    commands::execute(&mut browser, &command, quiet)
}
