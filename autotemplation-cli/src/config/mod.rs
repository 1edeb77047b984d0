//! Configuration management for the autotemplation CLI.
//!
//! The configuration file is found, in order, at:
//! 1. the `--config` flag or `AUTOTEMPLATION_CONFIG`
//! 2. `./autotemplation.toml`
//! 3. `~/.autotemplation/config.toml`
//!
//! When none exists the defaults are used.

mod schema;

pub use schema::{Config, ConfigIssue, IssueLevel};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "AUTOTEMPLATION_CONFIG";

/// Per-directory configuration file name.
pub const LOCAL_CONFIG_FILE: &str = "autotemplation.toml";

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// An explicitly named configuration file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Get the default config directory path.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".autotemplation")
}

/// Get the user-wide config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Get the per-directory config file path.
#[must_use]
pub fn local_config_path() -> PathBuf {
    PathBuf::from(LOCAL_CONFIG_FILE)
}

/// The config file a run will use: `explicit` if given, else the local file
/// if it exists, else the user-wide file.
#[must_use]
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        let local = local_config_path();
        if local.is_file() { local } else { config_path() }
    })
}

/// Load the configuration for a run.
///
/// An explicit path must exist; otherwise a missing file means defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if an explicit
/// path does not exist.
pub fn load_config(explicit: Option<PathBuf>) -> ConfigResult<Config> {
    if let Some(path) = &explicit
        && !path.exists()
    {
        return Err(ConfigError::NotFound(path.clone()));
    }
    load_config_from(&resolve_config_path(explicit))
}

/// Load configuration from a specific path, using defaults if it is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> ConfigResult<Config> {
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

/// Save configuration to a specific path.
///
/// # Errors
///
/// Returns an error if the file or its directory cannot be written.
pub fn save_config_to(config: &Config, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    info!(path = %path.display(), "saved config file");

    Ok(())
}

/// Write a default configuration to `path` and create its template folders.
///
/// Returns the configuration now in effect at `path`. An existing file is
/// kept unless `force` is set.
///
/// # Errors
///
/// Returns an error if the file or folders cannot be written.
pub fn init_config(path: &Path, force: bool) -> ConfigResult<Config> {
    if path.exists() && !force {
        return load_config_from(path);
    }

    let mut config = Config::default();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        config.store_root = parent.to_path_buf();
        config.output_dir = parent.to_path_buf();
    }
    for folder in &config.template_folders {
        fs::create_dir_all(config.store_root.join(folder))?;
    }
    save_config_to(&config, path)?;
    info!("created default config at {}", path.display());

    Ok(config)
}
