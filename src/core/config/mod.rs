//! core::config
//!
//! Configuration store for credentials and upload defaults.
//!
//! # Overview
//!
//! The rest of the crate only needs two operations from configuration:
//! [`ConfigStore::load`] and [`ConfigStore::save`]. The store is created
//! once at the process boundary and handed to the commands that need it;
//! nothing reads configuration through global state.
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$GHPUBLISH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/ghpublish/config.toml`
//! 3. `~/.ghpublish/config.toml` (canonical write location)
//!
//! # Failure Policy
//!
//! A missing, unreadable or unparseable file means "unconfigured". `load`
//! never fails; callers see `None` and can run setup.
//!
//! # Security
//!
//! - The file holds the access token and is written with 0600 permissions
//!   on Unix (owner read/write only)
//! - All writes are atomic (write to temp file, then rename)
//!
//! # Example
//!
//! ```no_run
//! use ghpublish::core::config::{ConfigStore, FileConfigStore};
//!
//! let store = FileConfigStore::discover().unwrap();
//! match store.load() {
//!     Some(creds) => println!("configured for {}", creds.username),
//!     None => println!("not configured"),
//! }
//! ```

pub mod schema;

pub use schema::StoredConfig;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use thiserror::Error;

use crate::core::types::Credentials;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "GHPUBLISH_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Durable key/value store for credentials and defaults.
pub trait ConfigStore: Send + Sync {
    /// Read the full stored document.
    ///
    /// A missing file yields the default document.
    fn load_raw(&self) -> Result<StoredConfig, ConfigError>;

    /// Replace the full stored document.
    fn save_raw(&self, config: &StoredConfig) -> Result<(), ConfigError>;

    /// Load credentials, or `None` if absent, unreadable or not usable.
    fn load(&self) -> Option<Credentials> {
        self.load_raw().ok()?.credentials()
    }

    /// Persist credentials. Returns whether the write succeeded.
    fn save(&self, credentials: &Credentials) -> bool {
        self.save_raw(&StoredConfig::from(credentials)).is_ok()
    }
}

/// TOML file configuration store.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Create a store at the first existing standard location, or at the
    /// canonical write location if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHomeDir` if no location can be determined.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Ok(Self::with_path(PathBuf::from(path)));
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("ghpublish/config.toml");
            if path.exists() {
                return Ok(Self::with_path(path));
            }
        }

        Ok(Self::with_path(Self::canonical_path()?))
    }

    /// Create a store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the canonical path, `~/.ghpublish/config.toml`.
    pub fn canonical_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".ghpublish/config.toml"))
    }

    /// Get the path to the config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verify file permissions are correct (Unix only).
    ///
    /// Returns true if the file doesn't exist or has 0600 permissions.
    #[cfg(unix)]
    pub fn verify_permissions(&self) -> Result<bool, ConfigError> {
        if !self.path.exists() {
            return Ok(true);
        }
        let metadata = fs::metadata(&self.path).map_err(|e| ConfigError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(metadata.permissions().mode() & 0o777 == 0o600)
    }

    /// Verify file permissions are correct (non-Unix always returns true).
    #[cfg(not(unix))]
    pub fn verify_permissions(&self) -> Result<bool, ConfigError> {
        Ok(true)
    }

    fn write_atomic(&self, contents: &str) -> Result<(), ConfigError> {
        let write_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| ConfigError::WriteError { path, source }
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err(&self.path))?;
        }

        let temp_path = self.path.with_extension("toml.tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(write_err(&temp_path))?;

            // Restrict before the token is written
            #[cfg(unix)]
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(write_err(&temp_path))?;

            file.write_all(contents.as_bytes())
                .map_err(write_err(&temp_path))?;
            file.sync_all().map_err(write_err(&temp_path))?;
        }

        fs::rename(&temp_path, &self.path).map_err(write_err(&self.path))
    }
}

impl ConfigStore for FileConfigStore {
    fn load_raw(&self) -> Result<StoredConfig, ConfigError> {
        if !self.path.exists() {
            return Ok(StoredConfig::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| ConfigError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn save_raw(&self, config: &StoredConfig) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        self.write_atomic(&contents)
    }
}

/// In-memory configuration store.
///
/// Used for tests and for sessions that must not touch the filesystem.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    inner: Mutex<StoredConfig>,
    read_only: bool,
}

impl MemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with credentials.
    pub fn with_credentials(credentials: &Credentials) -> Self {
        Self {
            inner: Mutex::new(StoredConfig::from(credentials)),
            read_only: false,
        }
    }

    /// Make every save fail.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load_raw(&self) -> Result<StoredConfig, ConfigError> {
        self.inner
            .lock()
            .map(|c| c.clone())
            .map_err(|_| ConfigError::InvalidValue("config store poisoned".into()))
    }

    fn save_raw(&self, config: &StoredConfig) -> Result<(), ConfigError> {
        if self.read_only {
            return Err(ConfigError::InvalidValue("config store is read-only".into()));
        }
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| ConfigError::InvalidValue("config store poisoned".into()))?;
        *inner = config.clone();
        Ok(())
    }
}
