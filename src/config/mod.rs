//! Configuration management.
//!
//! Values come from, in increasing precedence: built-in defaults, a TOML
//! config file, then `WORDVAULT_*` environment variables.
//!
//! ```toml
//! data_dir = "/var/lib/wordvault"
//! owner = "alice"
//!
//! [logging]
//! format = "json"
//! filter = "wordvault=debug"
//! file = "/var/log/wordvault.log"
//! ```

use crate::models::OwnerId;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Database file name inside the data directory.
pub const DEFAULT_DB_FILE: &str = "wordvault.db";

/// Owner used when none is configured.
pub const DEFAULT_OWNER: &str = "default";

/// Main configuration for wordvault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordvaultConfig {
    /// Directory holding the database and other state.
    pub data_dir: PathBuf,
    /// Explicit database path. Defaults to `data_dir/wordvault.db`.
    pub db_path: Option<PathBuf>,
    /// Owner that CLI commands act as.
    pub owner: OwnerId,
    /// Logging settings, resolved later by the observability module.
    pub logging: LoggingSettings,
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: Option<String>,
    /// Log file path. Logs go to stderr when absent.
    pub file: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Database path.
    pub db_path: Option<String>,
    /// Owner name.
    pub owner: Option<String>,
    /// Logging configuration.
    pub logging: Option<LoggingSettings>,
}

impl Default for WordvaultConfig {
    fn default() -> Self {
        let data_dir = directories::ProjectDirs::from("", "", "wordvault").map_or_else(
            || PathBuf::from(".wordvault"),
            |dirs| dirs.data_dir().to_path_buf(),
        );
        Self {
            data_dir,
            db_path: None,
            owner: OwnerId::new(DEFAULT_OWNER),
            logging: LoggingSettings::default(),
        }
    }
}

impl WordvaultConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path, then applies env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Reads a config file over the defaults, without env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::operation("read_config_file", format!("{}: {e}", path.display())))?;
        Self::from_toml(&contents)
    }

    /// Loads configuration from the default location.
    ///
    /// Looks for `wordvault/config.toml` in the platform config dir. Returns
    /// the defaults (with env overrides) if no readable file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let path = directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("wordvault").join("config.toml"))
            .filter(|path| path.exists());

        if let Some(path) = path {
            match Self::load_from_file(&path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                },
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Parses a TOML document over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid config TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| Error::operation("parse_config_file", e))?;
        Ok(Self::from_config_file(file))
    }

    /// Converts a `ConfigFile` to `WordvaultConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(db_path) = file.db_path {
            config.db_path = Some(PathBuf::from(db_path));
        }
        if let Some(owner) = file.owner.filter(|o| !o.trim().is_empty()) {
            config.owner = OwnerId::new(owner.trim());
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Applies `WORDVAULT_DATA_DIR`, `WORDVAULT_DB_PATH` and `WORDVAULT_OWNER`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(data_dir) = lookup("WORDVAULT_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
        if let Some(db_path) = lookup("WORDVAULT_DB_PATH") {
            self.db_path = Some(PathBuf::from(db_path));
        }
        if let Some(owner) = lookup("WORDVAULT_OWNER") {
            self.owner = OwnerId::new(owner);
        }
    }

    /// Returns the database file path.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_DB_FILE))
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    /// Sets the owner.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<OwnerId>) -> Self {
        self.owner = owner.into();
        self
    }
}
