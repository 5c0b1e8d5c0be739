//! Session configuration loaded from YAML.
//!
//! Every field has a default, so an empty document describes the standard
//! Mars greenhouse: full tanks, 200 credits, 22 °C and Martian gravity.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::snapshot::SnapshotConfig;

fn default_name() -> String {
    "mars_base".to_string()
}

fn default_seed() -> u64 {
    7
}

fn default_tick_interval_ms() -> u64 {
    2_000
}

fn default_gravity() -> f64 {
    0.38
}

fn default_event_chance() -> f64 {
    0.2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GardenConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    #[serde(default = "default_event_chance")]
    pub event_chance: f64,
    #[serde(default)]
    pub initial: InitialState,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values a session starts with and returns to on reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialState {
    pub water: f64,
    pub nutrients: f64,
    pub energy: f64,
    pub oxygen: u32,
    pub credits: u32,
    pub temperature: f64,
    pub day: u32,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            water: 100.0,
            nutrients: 100.0,
            energy: 100.0,
            oxygen: 100,
            credits: 200,
            temperature: 22.0,
            day: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Upper bound shared by water, nutrients and energy.
    pub max_resource: f64,
    pub max_oxygen: u32,
    pub low_oxygen_threshold: u32,
    pub slots: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_resource: 100.0,
            max_oxygen: 200,
            low_oxygen_threshold: 30,
            slots: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            gravity: default_gravity(),
            event_chance: default_event_chance(),
            initial: InitialState::default(),
            limits: Limits::default(),
            snapshot: SnapshotConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GardenConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // serde_yaml maps an empty document to unit, not to an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: GardenConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if !(self.limits.max_resource > 0.0 && self.limits.max_resource.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "max_resource must be positive, got {}",
                self.limits.max_resource
            )));
        }
        if self.limits.max_oxygen == 0 {
            return Err(ConfigError::Validation(
                "max_oxygen must be greater than zero".into(),
            ));
        }
        if self.limits.slots == 0 {
            return Err(ConfigError::Validation(
                "greenhouse needs at least one slot".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.event_chance) {
            return Err(ConfigError::Validation(format!(
                "event_chance must be within [0, 1], got {}",
                self.event_chance
            )));
        }
        if !self.gravity.is_finite() || !self.initial.temperature.is_finite() {
            return Err(ConfigError::Validation(
                "gravity and temperature must be finite".into(),
            ));
        }

        let max = self.limits.max_resource;
        for (label, value) in [
            ("water", self.initial.water),
            ("nutrients", self.initial.nutrients),
            ("energy", self.initial.energy),
        ] {
            if !(0.0..=max).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "initial {label} {value} outside [0, {max}]"
                )));
            }
        }
        if self.initial.oxygen > self.limits.max_oxygen {
            return Err(ConfigError::Validation(format!(
                "initial oxygen {} exceeds max_oxygen {}",
                self.initial.oxygen, self.limits.max_oxygen
            )));
        }
        Ok(())
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<GardenConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = GardenConfig::from_yaml_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = GardenConfig::from_yaml_str("").unwrap();
        assert_eq!(config, GardenConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_secs(2));
        assert_eq!(config.initial.credits, 200);
        assert_eq!(config.limits.max_oxygen, 200);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = GardenConfig::from_yaml_str(
            "name: test_dome\ninitial:\n  credits: 50\nlimits:\n  slots: 3\n",
        )
        .unwrap();
        assert_eq!(config.name, "test_dome");
        assert_eq!(config.initial.credits, 50);
        assert_eq!(config.initial.water, 100.0);
        assert_eq!(config.limits.slots, 3);
        assert_eq!(config.limits.max_resource, 100.0);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = GardenConfig::from_yaml_str("event_chance: 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = GardenConfig::from_yaml_str("initial:\n  oxygen: 500\n").unwrap_err();
        assert!(err.to_string().contains("max_oxygen"));

        let err = GardenConfig::from_yaml_str("tick_interval_ms: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garden.yaml");
        let mut config = GardenConfig::default();
        config.seed = 99;
        config.to_yaml(&path).unwrap();

        let loaded = ConfigLoader::new(dir.path()).load("garden.yaml").unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn loader_names_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::new(dir.path())
            .load("missing.yaml")
            .unwrap_err();
        assert!(format!("{err:#}").contains("missing.yaml"));
    }
}
