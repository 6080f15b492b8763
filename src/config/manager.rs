use super::{
    data::DataConfig,
    evolution::EvolutionConfig,
    search::SearchConfig,
    traits::ConfigSection,
};
use crate::error::TradegeneError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `TRADEGENE_EVOLUTION__MAX_ITER=50`
pub const ENV_PREFIX: &str = "TRADEGENE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub data: DataConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), TradegeneError> {
        self.evolution.validate()?;
        self.data.validate()?;
        self.search.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: AppConfig,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Layer an optional TOML file and `TRADEGENE_*` environment variables
    /// over the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, TradegeneError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(TradegeneError::Configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        log::debug!(
            "Loaded configuration ({}, {}, {} sections)",
            EvolutionConfig::section_name(),
            DataConfig::section_name(),
            SearchConfig::section_name()
        );
        Ok(Self { config })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradegeneError> {
        Self::load(Some(path.as_ref()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TradegeneError> {
        let toml_str = toml::to_string_pretty(&self.config)
            .map_err(|e| TradegeneError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| TradegeneError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_inner(self) -> AppConfig {
        self.config
    }

    pub fn update<F>(&mut self, f: F) -> Result<(), TradegeneError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.config.clone();
        f(&mut candidate);
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
