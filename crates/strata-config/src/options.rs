//! Load options supplied by the caller.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Options for one configuration load.
///
/// `config_path` and `active_profiles` are required; everything else is
/// optional. Validation happens before any I/O.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Directory holding `application.yml` and its profile overlays.
    pub config_path: PathBuf,
    /// Active profile names, in precedence order. Immutable for the duration
    /// of one resolution pass. May be empty.
    pub active_profiles: Vec<String>,
    /// Directory holding `bootstrap.yml`; falls back to `config_path`.
    pub bootstrap_path: Option<PathBuf>,
    /// Log verbosity hint (e.g. `"debug"`). The engine itself only emits
    /// `tracing` events; the embedding frontend decides how to apply this.
    pub level: Option<String>,
}

impl LoadOptions {
    /// Build options from the two required fields.
    pub fn new(config_path: impl Into<PathBuf>, active_profiles: Vec<String>) -> Self {
        Self {
            config_path: config_path.into(),
            active_profiles,
            bootstrap_path: None,
            level: None,
        }
    }

    /// Set the bootstrap directory.
    #[must_use]
    pub fn with_bootstrap_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.bootstrap_path = Some(path.into());
        self
    }

    /// Set the log verbosity hint.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// The directory `bootstrap.yml` is loaded from.
    #[must_use]
    pub fn bootstrap_dir(&self) -> &Path {
        self.bootstrap_path.as_deref().unwrap_or(&self.config_path)
    }

    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOptions`] if `config_path` is empty, or
    /// if any active profile name is blank.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.config_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid_options("config_path is required"));
        }
        if self.active_profiles.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::invalid_options(
                "active_profiles must not contain blank names",
            ));
        }
        Ok(())
    }
}
