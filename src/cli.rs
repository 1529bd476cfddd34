//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for smartfiles using the `clap` crate.
//!
//! # Commands
//!
//! - **list**: Show a folder, a smart group, or search results (default)
//! - **mkdir** / **new** / **import**: Add folders and files
//! - **rename** / **dup** / **fav** / **protect**: Single-item changes
//! - **move** / **copy** / **remove**: Multi-item batches
//! - **tag**: Manage tags and assignments
//! - **history**: Show or append version records
//! - **config**: Read and change configuration values
//!
//! Items are referenced by their path from the library root (`Docs/a.txt`) or
//! by id.
//!
//! # Examples
//!
//! ```
//! use smartfiles::cli::{Cli, Commands};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["smartfiles", "mv", "a.txt", "b.txt", "--to", "Docs"]);
//! assert!(matches!(cli.get_command(), Commands::Move { .. }));
//! ```

use crate::model::{FileKind, FileTemplate};
use crate::search::{DateRange, SmartGroup};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Content kind accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Folder,
    Text,
    Markdown,
    Code,
    Image,
    Pdf,
    Other,
}

impl From<KindArg> for FileKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Folder => Self::Folder,
            KindArg::Text => Self::Text,
            KindArg::Markdown => Self::Markdown,
            KindArg::Code => Self::Code,
            KindArg::Image => Self::Image,
            KindArg::Pdf => Self::Pdf,
            KindArg::Other => Self::Other,
        }
    }
}

/// Template for `new`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateArg {
    #[default]
    Text,
    Markdown,
    Code,
}

impl From<TemplateArg> for FileTemplate {
    fn from(template: TemplateArg) -> Self {
        match template {
            TemplateArg::Text => Self::TEXT,
            TemplateArg::Markdown => Self::MARKDOWN,
            TemplateArg::Code => Self::CODE,
        }
    }
}

/// Smart group for `list --group`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupArg {
    All,
    Recents,
    Favorites,
}

impl From<GroupArg> for SmartGroup {
    fn from(group: GroupArg) -> Self {
        match group {
            GroupArg::All => Self::All,
            GroupArg::Recents => Self::Recents,
            GroupArg::Favorites => Self::Favorites,
        }
    }
}

/// Options of the list command
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    /// Folder to list (default: library root)
    #[arg(value_name = "FOLDER")]
    pub folder: Option<String>,

    /// Case-insensitive name search across the whole library
    #[arg(short = 's', long = "search", value_name = "QUERY")]
    pub query: Option<String>,

    /// Keep items of these kinds
    #[arg(short = 'k', long = "kind", value_name = "KIND", num_args = 1..)]
    pub kinds: Vec<KindArg>,

    /// Keep items carrying all of these tag names
    #[arg(short = 't', long = "tag", value_name = "TAG", num_args = 1..)]
    pub tags: Vec<String>,

    /// Keep items modified within a period (day, week, month, year)
    #[arg(long = "since", value_name = "RANGE")]
    pub since: Option<DateRange>,

    /// Show a smart group instead of a folder
    #[arg(short = 'g', long = "group", value_name = "GROUP", conflicts_with = "sidebar_tag")]
    pub group: Option<GroupArg>,

    /// Show items with this tag, as the sidebar does
    #[arg(long = "tagged", value_name = "TAG")]
    pub sidebar_tag: Option<String>,
}

/// Tag management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TagCommands {
    /// List all tags
    #[command(visible_alias = "ls")]
    List,

    /// Create a tag
    Create {
        name: String,

        /// Display color, e.g. #007AFF (generated when omitted)
        #[arg(short = 'c', long = "color")]
        color: Option<String>,
    },

    /// Assign a tag to an item, creating the tag if needed
    Add {
        #[arg(value_name = "ITEM")]
        item: String,
        #[arg(value_name = "TAG")]
        tag: String,
    },

    /// Remove a tag from an item
    Remove {
        #[arg(value_name = "ITEM")]
        item: String,
        #[arg(value_name = "TAG")]
        tag: String,
    },

    /// Delete a tag; items keep the assignment but stop showing it
    #[command(visible_alias = "rm")]
    Delete { tag: String },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., recents_limit=50)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., library_root)
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print the config file location
    Path,
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "smartfiles")]
#[command(about = "A local file and tag library", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Use this library directory instead of the configured one
    #[arg(long = "library", value_name = "DIR", global = true)]
    pub library: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List items (default)
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show details of an item
    Info {
        #[arg(value_name = "ITEM")]
        item: String,
    },

    /// Create a folder
    Mkdir {
        name: String,

        /// Parent folder (default: library root)
        #[arg(long = "in", value_name = "FOLDER")]
        parent: Option<String>,
    },

    /// Create a file from a template
    New {
        name: String,

        #[arg(short = 'T', long = "template", value_enum, default_value_t = TemplateArg::Text)]
        template: TemplateArg,

        /// Parent folder (default: library root)
        #[arg(long = "in", value_name = "FOLDER")]
        parent: Option<String>,
    },

    /// Copy external files into the library
    Import {
        #[arg(value_name = "FILE", required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Destination folder (default: library root)
        #[arg(long = "in", value_name = "FOLDER")]
        parent: Option<String>,
    },

    /// Rename an item
    #[command(visible_alias = "rn")]
    Rename {
        #[arg(value_name = "ITEM")]
        item: String,
        #[arg(value_name = "NAME")]
        new_name: String,
    },

    /// Duplicate an item next to itself
    #[command(visible_alias = "dup")]
    Duplicate {
        #[arg(value_name = "ITEM")]
        item: String,
    },

    /// Move items into a folder
    #[command(visible_alias = "mv")]
    Move {
        #[arg(value_name = "ITEM", required = true, num_args = 1..)]
        items: Vec<String>,

        /// Destination folder (default: library root)
        #[arg(long = "to", value_name = "FOLDER")]
        to: Option<String>,
    },

    /// Copy items into a folder
    #[command(visible_alias = "cp")]
    Copy {
        #[arg(value_name = "ITEM", required = true, num_args = 1..)]
        items: Vec<String>,

        /// Destination folder (default: library root)
        #[arg(long = "to", value_name = "FOLDER")]
        to: Option<String>,
    },

    /// Delete items and their contents on disk
    #[command(visible_alias = "rm")]
    Remove {
        #[arg(value_name = "ITEM", required = true, num_args = 1..)]
        items: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Toggle the favorite flag
    Fav {
        #[arg(value_name = "ITEM")]
        item: String,
    },

    /// Protect an item, or remove protection with --off
    Protect {
        #[arg(value_name = "ITEM")]
        item: String,

        #[arg(long = "off")]
        off: bool,
    },

    /// Manage tags
    #[command(visible_alias = "t")]
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Show an item's version history, or append to it with --note
    History {
        #[arg(value_name = "ITEM")]
        item: String,

        /// Change note for a new version record
        #[arg(short = 'n', long = "note")]
        note: Option<String>,

        /// Author of the new version record (default: $USER)
        #[arg(short = 'a', long = "author", requires = "note")]
        author: Option<String>,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to List if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::List(ListArgs::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_list() {
        let cli = Cli::parse_from(["smartfiles"]);
        assert_eq!(cli.get_command(), Commands::List(ListArgs::default()));
    }

    #[test]
    fn test_parse_list_filters() {
        let cli = Cli::parse_from([
            "smartfiles", "ls", "Docs", "-s", "report", "-k", "text", "markdown", "-t", "Work",
            "--since", "week",
        ]);
        let Commands::List(args) = cli.get_command() else {
            panic!("Expected List command");
        };
        assert_eq!(args.folder.as_deref(), Some("Docs"));
        assert_eq!(args.query.as_deref(), Some("report"));
        assert_eq!(args.kinds, vec![KindArg::Text, KindArg::Markdown]);
        assert_eq!(args.tags, vec!["Work".to_string()]);
        assert_eq!(args.since, Some(DateRange::PastWeek));
    }

    #[test]
    fn test_group_conflicts_with_sidebar_tag() {
        let result = Cli::try_parse_from(["smartfiles", "ls", "-g", "favorites", "--tagged", "Work"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_move_with_aliases() {
        let cli = Cli::parse_from(["smartfiles", "mv", "a.txt", "Docs/b.txt", "--to", "Archive"]);
        assert_eq!(
            cli.get_command(),
            Commands::Move {
                items: vec!["a.txt".into(), "Docs/b.txt".into()],
                to: Some("Archive".into()),
            }
        );
    }

    #[test]
    fn test_parse_remove_requires_items() {
        assert!(Cli::try_parse_from(["smartfiles", "rm"]).is_err());
        let cli = Cli::parse_from(["smartfiles", "rm", "-y", "a.txt"]);
        assert!(matches!(cli.get_command(), Commands::Remove { yes: true, .. }));
    }

    #[test]
    fn test_parse_new_with_template() {
        let cli = Cli::parse_from(["smartfiles", "new", "notes", "-T", "markdown", "--in", "Docs"]);
        let Commands::New { template, parent, .. } = cli.get_command() else {
            panic!("Expected New command");
        };
        assert_eq!(FileTemplate::from(template), FileTemplate::MARKDOWN);
        assert_eq!(parent.as_deref(), Some("Docs"));
    }

    #[test]
    fn test_parse_tag_subcommands() {
        let cli = Cli::parse_from(["smartfiles", "t", "add", "a.txt", "Work"]);
        assert_eq!(
            cli.get_command(),
            Commands::Tag {
                command: TagCommands::Add {
                    item: "a.txt".into(),
                    tag: "Work".into(),
                },
            }
        );
        let cli = Cli::parse_from(["smartfiles", "-q", "tag", "rm", "Work"]);
        assert!(cli.quiet);
        assert!(matches!(cli.get_command(), Commands::Tag {
            command: TagCommands::Delete { .. }
        }));
    }

    #[test]
    fn test_history_author_requires_note() {
        assert!(Cli::try_parse_from(["smartfiles", "history", "a.txt", "-a", "ana"]).is_err());
        assert!(Cli::try_parse_from(["smartfiles", "history", "a.txt", "-n", "draft", "-a", "ana"]).is_ok());
    }
}
