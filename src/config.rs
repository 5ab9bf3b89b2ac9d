//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/ccimport/ccimport.toml`
//! 3. Environment variables: `CCIMPORT_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DuplicatePolicy;

/// Unified configuration for ccimport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Path of the JSON store file the CLI works against
    pub store_path: PathBuf,
    /// How duplicate ids in an artifact are treated
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect
/// "not specified" while merging).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    store_path: Option<PathBuf>,
    duplicate_policy: Option<DuplicatePolicy>,
}

/// Default store location under the platform data directory.
fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "ccimport")
        .map(|dirs| dirs.data_dir().join("store.json"))
        .unwrap_or_else(|| PathBuf::from(".ccimport-store.json"))
}

/// Get the XDG config directory for ccimport.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ccimport").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("ccimport.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            store_path: overlay
                .store_path
                .clone()
                .unwrap_or_else(|| self.store_path.clone()),
            duplicate_policy: overlay.duplicate_policy.unwrap_or(self.duplicate_policy),
        }
    }

    /// Load settings with layered precedence.
    pub fn load() -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config file
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        Ok(current)
    }

    /// Apply CCIMPORT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("CCIMPORT").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("store_path") {
            settings.store_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("duplicate_policy") {
            settings.duplicate_policy = match val.as_str() {
                "reject" => DuplicatePolicy::Reject,
                "last-wins" => DuplicatePolicy::LastWins,
                other => {
                    return Err(ApplicationError::Config {
                        message: format!(
                            "invalid duplicate_policy '{other}', expected 'reject' or 'last-wins'"
                        ),
                    })
                }
            };
        }

        Ok(settings)
    }

    /// Config file template for `config init`.
    pub fn template() -> String {
        format!(
            "# ccimport configuration\n\
             #\n\
             # Path of the JSON store file the CLI works against.\n\
             # store_path = \"{}\"\n\
             #\n\
             # How duplicate IDs in an artifact are treated: \"reject\" or \"last-wins\".\n\
             # duplicate_policy = \"reject\"\n",
            default_store_path().display()
        )
    }
}
