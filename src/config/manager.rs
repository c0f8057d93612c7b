use super::{
    data::DataConfig,
    evolution::EvolutionConfig,
    network::NetworkConfig,
    traits::ConfigSection,
};
use crate::error::EvotradeError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Environment overrides look like `EVOTRADE__EVOLUTION__POPULATION_SIZE=200`.
pub const ENV_PREFIX: &str = "EVOTRADE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub network: NetworkConfig,
    pub data: DataConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), EvotradeError> {
        self.evolution.validate()?;
        self.network.validate()?;
        self.data.validate()?;
        Ok(())
    }

    /// Layers defaults, then an optional TOML file, then `EVOTRADE__*`
    /// environment variables.
    pub fn load_layered(path: Option<&Path>) -> Result<Self, EvotradeError> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvotradeError> {
        let config = AppConfig::load_layered(Some(path.as_ref()))?;
        *self.write()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvotradeError> {
        let toml_str = toml::to_string_pretty(&*self.read()?)
            .map_err(|e| EvotradeError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| EvotradeError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, EvotradeError> {
        Ok(self.read()?.clone())
    }

    /// Applies `f` and keeps the result only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), EvotradeError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.write()?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, AppConfig>, EvotradeError> {
        self.config
            .read()
            .map_err(|_| EvotradeError::Configuration("Config lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>, EvotradeError> {
        self.config
            .write()
            .map_err(|_| EvotradeError::Configuration("Config lock poisoned".to_string()))
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::evolution::StopStrategy;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("evotrade-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = temp_path("overrides");
        std::fs::write(
            &path,
            "[evolution]\npopulation_size = 40\nelite_count = 4\nstop_strategy = \"no_improvement\"\n\n[network]\nbias = true\n",
        )
        .unwrap();

        let config = AppConfig::load_layered(Some(&path)).unwrap();
        assert_eq!(config.evolution.population_size, 40);
        assert_eq!(config.evolution.elite_count, 4);
        assert_eq!(config.evolution.stop_strategy, StopStrategy::NoImprovement);
        assert_eq!(config.evolution.budget, 1000.0);
        assert!(config.network.bias);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let path = temp_path("invalid");
        std::fs::write(&path, "[evolution]\npopulation_size = 5\nelite_count = 50\n").unwrap();

        assert!(AppConfig::load_layered(Some(&path)).is_err());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_path("roundtrip");
        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.evolution.population_size = 64;
                c.evolution.elite_count = 8;
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        assert_eq!(reloaded.get().unwrap(), manager.get().unwrap());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_rejected_update_keeps_previous_config() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.evolution.elite_count = 0);
        assert!(result.is_err());
        assert_eq!(manager.get().unwrap().evolution.elite_count, 100);
    }
}
