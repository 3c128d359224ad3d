//! Configuration loading and management
//!
//! Handles parsing of the `config.toml` file found in the platform config
//! directory (or wherever `--config` points).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::DEFAULT_STORAGE_KEY;
use crate::task::Priority;

/// File name of the configuration inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Defaults for new tasks
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Where and under which key tasks are stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory; the platform data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Key the task collection is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
        }
    }
}

/// Defaults applied by `tt add`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Priority used when none is given
    #[serde(default)]
    pub priority: Priority,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or return defaults when it is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Data directory to use, honoring an explicit override first
    pub fn data_dir(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = explicit {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = self.storage.dir.as_ref() {
            return Ok(dir.clone());
        }
        project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    fn validate(&self) -> Result<()> {
        crate::storage::validate_key(&self.storage.key)
            .map_err(|err| Error::InvalidConfig(format!("storage.key: {err}")))?;
        if let Some(dir) = self.storage.dir.as_ref() {
            if dir.as_os_str().is_empty() {
                return Err(Error::InvalidConfig(
                    "storage.dir cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Default location of the config file
pub fn default_config_path() -> Result<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "tt").ok_or_else(|| {
        Error::InvalidConfig(
            "cannot determine a home directory; pass --data-dir and --config".to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.storage.key, "tasks");
        assert!(cfg.storage.dir.is_none());
        assert_eq!(cfg.defaults.priority, Priority::Medium);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[storage]
dir = "/var/lib/tt"
key = "work-tasks"

[defaults]
priority = "High"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.storage.dir, Some(PathBuf::from("/var/lib/tt")));
        assert_eq!(cfg.storage.key, "work-tasks");
        assert_eq!(cfg.defaults.priority, Priority::High);
    }

    #[test]
    fn invalid_key_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[storage]\nkey = \"../outside\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(msg) => assert!(msg.contains("storage.key")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_priority_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[defaults]\npriority = \"Urgent\"").expect("write config");

        match Config::load(&path) {
            Err(Error::TomlParse(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn load_or_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_or_default(&dir.path().join("missing.toml")).expect("defaults");
        assert_eq!(cfg.storage.key, "tasks");
    }

    #[test]
    fn data_dir_prefers_explicit_then_config() {
        let mut cfg = Config::default();
        cfg.storage.dir = Some(PathBuf::from("/from/config"));

        let explicit = PathBuf::from("/from/flag");
        assert_eq!(cfg.data_dir(Some(&explicit)).unwrap(), explicit);
        assert_eq!(cfg.data_dir(None).unwrap(), PathBuf::from("/from/config"));
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE);
        Config::default().save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("key = \"tasks\""));
        assert!(written.contains("priority = \"Medium\""));

        let reloaded = Config::load(&path).expect("reload");
        assert_eq!(reloaded.storage.key, "tasks");
    }
}
