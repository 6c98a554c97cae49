//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading roster
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{ExportSettings, HolidaySettings, RosterConfig, RosterFile};

/// Loads and provides access to roster configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory and
/// validates them into a [`RosterConfig`].
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── roster.yaml    # Members, weighting and solver limits (required)
/// ├── holidays.yaml  # Holiday calendar and extra closure days (optional)
/// └── export.yaml    # Weekday naming and export texts (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use duty_roster::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("{} members", loader.config().roster().len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: RosterConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/default")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `roster.yaml` is missing ([`EngineError::ConfigNotFound`])
    /// - Any present file contains invalid YAML ([`EngineError::ConfigParseError`])
    /// - The roster or limits are unusable ([`EngineError::InvalidConfig`])
    ///
    /// Missing `holidays.yaml` or `export.yaml` fall back to their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let roster_file = Self::load_yaml::<RosterFile>(&path.join("roster.yaml"))?;
        let holidays =
            Self::load_optional_yaml::<HolidaySettings>(&path.join("holidays.yaml"))?;
        let export = Self::load_optional_yaml::<ExportSettings>(&path.join("export.yaml"))?;

        let config = RosterConfig::from_files(roster_file, holidays, export)?;

        tracing::info!(
            path = %path.display(),
            members = config.roster().len(),
            timeout_ms = config.solver().timeout_ms,
            "roster configuration loaded"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Like [`Self::load_yaml`], but a missing file yields the default.
    fn load_optional_yaml<T>(path: &Path) -> EngineResult<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "optional configuration file absent, using defaults");
            return Ok(T::default());
        }
        Self::load_yaml(path)
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> RosterConfig {
        self.config
    }
}
