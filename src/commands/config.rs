//! Config command - read and change configuration values

use crate::SmartFilesError;
use crate::cli::ConfigCommands;
use crate::config::SmartFilesConfig;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, SmartFilesError>;

const KEYS: &str = "library_root, files_dir, recents_limit, search_debounce_ms, strict_listing, log_level, quiet";

fn unknown_key(key: &str) -> SmartFilesError {
    SmartFilesError::InvalidInput(format!("Unknown configuration key: '{key}'. Available keys: {KEYS}"))
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| SmartFilesError::InvalidInput(format!("Invalid value for {key}: '{value}'")))
}

/// Apply `key=value` to `config`
///
/// # Errors
/// Returns `SmartFilesError::InvalidInput` for a malformed setting, an unknown
/// key, or a value of the wrong type.
pub fn apply(config: &mut SmartFilesConfig, setting: &str) -> Result<()> {
    let Some((key, value)) = setting.split_once('=') else {
        return Err(SmartFilesError::InvalidInput(
            "Invalid format. Use: smartfiles config set key=value".into(),
        ));
    };
    let (key, value) = (key.trim(), value.trim());

    match key {
        "library_root" => config.library_root = Some(PathBuf::from(value)),
        "files_dir" => {
            crate::store::blob::validate_name(value)?;
            config.files_dir = value.to_string();
        }
        "recents_limit" => config.recents_limit = parse(key, value)?,
        "search_debounce_ms" => config.search_debounce_ms = parse(key, value)?,
        "strict_listing" => config.strict_listing = parse(key, value)?,
        "log_level" => config.log_level = value.to_string(),
        "quiet" => config.quiet = parse(key, value)?,
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

/// Current value of `key`
///
/// # Errors
/// Returns `SmartFilesError::InvalidInput` for an unknown key.
pub fn value_of(config: &SmartFilesConfig, key: &str) -> Result<String> {
    Ok(match key {
        "library_root" => config.library_root()?.display().to_string(),
        "files_dir" => config.files_dir.clone(),
        "recents_limit" => config.recents_limit.to_string(),
        "search_debounce_ms" => config.search_debounce_ms.to_string(),
        "strict_listing" => config.strict_listing.to_string(),
        "log_level" => config.log_level.clone(),
        "quiet" => config.quiet.to_string(),
        _ => return Err(unknown_key(key)),
    })
}

/// Execute a config subcommand
///
/// # Errors
/// Returns an error if the setting is invalid or the file cannot be written.
pub fn execute(mut config: SmartFilesConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            apply(&mut config, setting)?;
            config.save()?;
            if !quiet {
                println!("Set {}", setting.trim());
            }
        }
        ConfigCommands::Get { key } => println!("{}", value_of(&config, key)?),
        ConfigCommands::Path => println!("{}", SmartFilesConfig::config_path()?.display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_and_read_back() {
        let mut config = SmartFilesConfig::default();
        apply(&mut config, "recents_limit = 7").unwrap();
        apply(&mut config, "strict_listing=true").unwrap();
        apply(&mut config, "library_root=/tmp/lib").unwrap();

        assert_eq!(value_of(&config, "recents_limit").unwrap(), "7");
        assert_eq!(value_of(&config, "strict_listing").unwrap(), "true");
        assert_eq!(value_of(&config, "library_root").unwrap(), "/tmp/lib");
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut config = SmartFilesConfig::default();
        assert!(apply(&mut config, "recents_limit").is_err());
        assert!(apply(&mut config, "recents_limit=lots").is_err());
        assert!(apply(&mut config, "colour=blue").is_err());
        assert!(apply(&mut config, "files_dir=../x").is_err());
        assert!(value_of(&config, "colour").is_err());
    }
}
