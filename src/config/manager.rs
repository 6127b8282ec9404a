use super::{evolution::EvoParams, run::RunConfig, traits::ConfigSection};
use crate::error::EvolutionError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvoParams,
    pub run: RunConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), EvolutionError> {
        self.evolution.validate()?;
        self.run.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvolutionError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EvolutionError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| EvolutionError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    /// Load an optional config file, then apply environment overrides named
    /// `{PREFIX}__{SECTION}__{FIELD}` (e.g. `EVOPOOL__EVOLUTION__POPULATION=64`).
    /// Weights are given as a comma separated list.
    pub fn load_layered<P: AsRef<Path>>(&self, path: Option<P>, env_prefix: &str) -> Result<(), EvolutionError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_ref()).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("evolution.weights"),
            )
            .build()
            .map_err(|e| EvolutionError::Configuration(format!("Failed to load config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| EvolutionError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvolutionError> {
        let config = self.get()?;
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| EvolutionError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, EvolutionError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| poisoned())
    }

    /// Apply `f` to a copy of the configuration; the copy replaces the current
    /// configuration only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), EvolutionError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get()?;
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), EvolutionError> {
        config.validate()?;
        *self.config.write().map_err(|_| poisoned())? = config;
        Ok(())
    }
}

fn poisoned() -> EvolutionError {
    EvolutionError::Configuration("Configuration lock poisoned".to_string())
}
