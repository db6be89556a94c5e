use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::generator::{ValidationPolicy, DEFAULT_MAX_VALUE, DEFAULT_TIMEOUT};

pub const CONFIG_DIR: &str = ".fibonacci";
pub const CONFIG_FILE: &str = "config.toml";

/// Settings shared by every generator built from this configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Validate seeds and `N`, and bound terms by `max_value`.
    pub strict: bool,
    pub max_value: u32,
    pub timeout: u16,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strict: true,
            max_value: DEFAULT_MAX_VALUE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GeneratorConfig {
    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy::from_strict(self.strict)
    }

    /// `~/.fibonacci/config.toml`, if a home directory can be found.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one the default location is
    /// tried and defaults are used when nothing is there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
