//! Config file location for snapkeep
//!
//! ## Resolution Order
//!
//! 1. An explicit path (`--config` or `SNAPKEEP_CONFIG`)
//! 2. `config.json` in the working directory, if it exists
//! 3. The platform config directory, e.g. `~/.config/snapkeep/config.json`

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{SnapkeepError, SnapkeepResult};

/// File name looked up in the working directory and the platform config dir
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Resolved location of the settings file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapkeepPaths {
    config_file: PathBuf,
}

impl SnapkeepPaths {
    /// Resolve the config file relative to the current working directory
    pub fn resolve(explicit: Option<PathBuf>) -> SnapkeepResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| SnapkeepError::Io(format!("Failed to read working directory: {}", e)))?;
        Self::resolve_in(explicit, &cwd)
    }

    /// Resolve the config file, treating `cwd` as the working directory
    pub fn resolve_in(explicit: Option<PathBuf>, cwd: &Path) -> SnapkeepResult<Self> {
        if let Some(path) = explicit {
            return Ok(Self::with_config_file(path));
        }

        let local = cwd.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Ok(Self::with_config_file(local));
        }

        let dirs = ProjectDirs::from("", "", "snapkeep").ok_or_else(|| {
            SnapkeepError::Config("Could not determine a config directory".into())
        })?;
        Ok(Self::with_config_file(
            dirs.config_dir().join(CONFIG_FILE_NAME),
        ))
    }

    /// Use a known config file (useful for testing)
    pub fn with_config_file(config_file: PathBuf) -> Self {
        Self { config_file }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Check if the config file exists
    pub fn is_initialized(&self) -> bool {
        self.config_file.is_file()
    }
}
