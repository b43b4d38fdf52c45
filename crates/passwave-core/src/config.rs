//! Worker configuration

use crate::error::{PasswaveError, PasswaveResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Background worker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// User data directory
    pub data_dir: PathBuf,

    /// Log filter (`error`, `warn`, `info`, `debug`, `trace` or an env-filter directive)
    pub log_level: String,

    /// Autosave prompt settings
    pub autosave: AutoSaveConfig,

    /// State persistence settings
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Offer to save newly submitted credentials
    pub enabled: bool,

    /// Offer to update an existing login when only the password changed
    pub prompt_updates: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Persist the state tree between worker restarts
    pub enabled: bool,

    /// File name of the serialized state tree, relative to `data_dir`
    pub state_file: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("passwave"),
            log_level: "info".to_string(),
            autosave: AutoSaveConfig::default(),
            persistence: PersistenceConfig::default(),
        }
    }
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prompt_updates: true,
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            state_file: "state.json".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Load configuration from a JSON file, falling back to defaults when the
    /// file does not exist. Missing fields take their default value.
    pub fn load<P: AsRef<Path>>(path: P) -> PasswaveResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            PasswaveError::config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write configuration as pretty JSON, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> PasswaveResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Location of the persisted state tree
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(&self.persistence.state_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkerConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, WorkerConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "log_level": "debug", "autosave": { "enabled": false } }"#).unwrap();

        let config = WorkerConfig::load(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(!config.autosave.enabled);
        assert!(config.autosave.prompt_updates);
        assert_eq!(config.persistence.state_file, "state.json");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = WorkerConfig::default();
        config.data_dir = dir.path().to_path_buf();
        config.persistence.enabled = false;
        config.save(&path).unwrap();

        let loaded = WorkerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.state_path(), dir.path().join("state.json"));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        let err = WorkerConfig::load(&path).unwrap_err();
        assert!(matches!(err, PasswaveError::Config(_)));
    }
}
