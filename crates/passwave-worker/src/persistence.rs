//! State tree persistence

use passwave_core::{PasswaveError, PasswaveResult, WorkerConfig};
use passwave_store::State;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct StatePersistence {
    path: PathBuf,
    enabled: bool,
}

impl StatePersistence {
    pub fn new(config: &WorkerConfig) -> Self {
        Self {
            path: config.state_path(),
            enabled: config.persistence.enabled,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted snapshot, if any
    pub fn load(&self) -> PasswaveResult<Option<Value>> {
        if !self.enabled || !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let snapshot = serde_json::from_str(&contents)
            .map_err(|e| PasswaveError::store(format!("Failed to parse persisted state: {}", e)))?;

        log::info!("Loaded persisted state from {:?}", self.path);
        Ok(Some(snapshot))
    }

    pub fn save(&self, state: &State) -> PasswaveResult<()> {
        if !self.enabled {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string_pretty(state)
            .map_err(|e| PasswaveError::store(format!("Failed to serialize state: {}", e)))?;
        std::fs::write(&self.path, data)?;

        log::debug!("Saved state to {:?}", self.path);
        Ok(())
    }

    pub fn remove(&self) -> PasswaveResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            log::info!("Removed persisted state at {:?}", self.path);
        }
        Ok(())
    }
}
