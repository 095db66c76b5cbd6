use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

use super::{limits::LimitsConfig, traits::ConfigSection};
use crate::error::EvotreeError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub limits: LimitsConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EvotreeError> {
        self.limits.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<EngineConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(EngineConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvotreeError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EvotreeError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: EngineConfig = toml::from_str(&contents)
            .map_err(|e| EvotreeError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.config.write().unwrap() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvotreeError> {
        let config = self.config.read().unwrap();
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| EvotreeError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| EvotreeError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> EngineConfig {
        self.config.read().unwrap().clone()
    }

    pub fn update<F>(&self, f: F) -> Result<(), EvotreeError>
    where
        F: FnOnce(&mut EngineConfig),
    {
        let mut config = self.config.write().unwrap();
        f(&mut config);
        config.validate()?;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
