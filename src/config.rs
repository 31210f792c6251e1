//! Application configuration: store backend selection.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::db::{DbError, DbGameStore};
use crate::store::{GameStore, MemoryGameStore};

/// Environment variable selecting the backend.
pub const BACKEND_ENV: &str = "GUESS_STORE_BACKEND";

/// Environment variable holding the SQLite database path.
pub const DATABASE_PATH_ENV: &str = "GUESS_DATABASE_PATH";

/// Which [`GameStore`] implementation to run on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
    /// Games live as long as the process.
    Memory,
    /// Games are persisted to SQLite.
    Database,
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Store backend.
    #[serde(default = "default_backend")]
    backend: StoreBackend,

    /// SQLite database path, used by the database backend.
    #[serde(default = "default_database_path")]
    database_path: String,
}

fn default_backend() -> StoreBackend {
    StoreBackend::Database
}

fn default_database_path() -> String {
    "guess_the_number.db".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_path: default_database_path(),
        }
    }
}

impl AppConfig {
    /// Creates a configuration from explicit values.
    pub fn new(backend: StoreBackend, database_path: impl Into<String>) -> Self {
        Self {
            backend,
            database_path: database_path.into(),
        }
    }

    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(backend = %config.backend, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Applies overrides from the process environment.
    #[instrument(skip(self))]
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any variable lookup.
    #[instrument(skip(self, lookup))]
    pub fn apply_vars(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(backend) = lookup(BACKEND_ENV) {
            self.backend = StoreBackend::from_str(backend.trim()).map_err(|_| {
                ConfigError::new(format!("{} must be 'memory' or 'database', got '{}'", BACKEND_ENV, backend))
            })?;
            debug!(backend = %self.backend, "Backend overridden from environment");
        }
        if let Some(path) = lookup(DATABASE_PATH_ENV) {
            debug!(path = %path, "Database path overridden from environment");
            self.database_path = path;
        }
        Ok(())
    }

    /// Replaces the backend.
    pub fn set_backend(&mut self, backend: StoreBackend) {
        self.backend = backend;
    }

    /// Replaces the database path.
    pub fn set_database_path(&mut self, database_path: impl Into<String>) {
        self.database_path = database_path.into();
    }

    /// Builds the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(self), fields(backend = %self.backend))]
    pub fn open_store(&self) -> Result<Arc<dyn GameStore>, DbError> {
        let store: Arc<dyn GameStore> = match self.backend {
            StoreBackend::Memory => Arc::new(MemoryGameStore::new()),
            StoreBackend::Database => {
                let store = DbGameStore::open(self.database_path.clone())?;
                debug!(path = store.db_path(), "Database opened");
                Arc::new(store)
            }
        };
        info!("Store ready");
        Ok(store)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
