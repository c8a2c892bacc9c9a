//! Model configuration and bootstrap settings.
//!
//! The parameter database is out of scope for the harness, so parameters and
//! scenario overrides come from a JSON file instead:
//!
//! ```json
//! {
//!   "name": "demo",
//!   "module": "DEP_FS",
//!   "cells": 4,
//!   "steps": 10,
//!   "scalars": { "Depre_in": 0.2 },
//!   "grids": { "Depression": [10.0, 8.0, 6.0, 4.0] },
//!   "scenarios": { "1": { "scalars": { "Depre_in": 0.5 } } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use crate::error::HostError;

/// File looked up when the model path is a directory.
pub const MODEL_FILE: &str = "model.json";

/// A per-cell grid in the configuration: one constant or explicit values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridValue {
    Constant(f32),
    Values(Vec<f32>),
}

impl GridValue {
    /// Expands to exactly `cells` values.
    pub fn expand(&self, key: &str, cells: usize) -> Result<Vec<f32>, HostError> {
        match self {
            GridValue::Constant(v) => Ok(vec![*v; cells]),
            GridValue::Values(values) if values.len() == cells => Ok(values.clone()),
            GridValue::Values(values) => Err(HostError::config(format!(
                "grid {} has {} values but the model has {} cells",
                key,
                values.len(),
                cells
            ))),
        }
    }
}

/// Parameters of the synthetic forcing that stands in for upstream modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForcingConfig {
    /// Mean water depth reaching the surface per step (mm)
    pub runoff_mean: f64,
    /// Mean potential evapotranspiration per step (mm)
    pub pet_mean: f64,
    /// Standard deviation of potential evapotranspiration (mm)
    pub pet_std: f64,
    /// Share of PET consumed by interception evaporation
    pub interception_fraction: f64,
}

impl Default for ForcingConfig {
    fn default() -> Self {
        Self {
            runoff_mean: 6.0,
            pet_mean: 4.0,
            pet_std: 1.0,
            interception_fraction: 0.2,
        }
    }
}

/// Parameter overrides applied for one scenario id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioOverride {
    pub scalars: BTreeMap<String, f32>,
    pub grids: BTreeMap<String, GridValue>,
}

/// Configuration of one model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name (for logs and exports)
    pub name: String,

    /// Catalog id of the module to run
    pub module: String,

    /// Number of cells in the grid
    pub cells: usize,

    /// Number of steps to simulate
    pub steps: usize,

    /// Timestamp of the first step (seconds since epoch)
    pub start_date: i64,

    /// Step length in seconds
    pub time_step_secs: i64,

    /// Master seed for the forcing
    pub seed: u64,

    /// Scalar parameters by name
    pub scalars: BTreeMap<String, f32>,

    /// Per-cell parameters by name
    pub grids: BTreeMap<String, GridValue>,

    pub forcing: ForcingConfig,

    /// Override sets by scenario id (0 is the base scenario)
    pub scenarios: BTreeMap<u32, ScenarioOverride>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let mut scalars = BTreeMap::new();
        scalars.insert("Depre_in".to_string(), 0.2);
        let mut grids = BTreeMap::new();
        grids.insert("Depression".to_string(), GridValue::Constant(10.0));

        Self {
            name: "default".to_string(),
            module: "DEP_FS".to_string(),
            cells: 16,
            steps: 10,
            start_date: 1262304000, // 2010-01-01 00:00:00 UTC
            time_step_secs: 86400,
            seed: 42,
            scalars,
            grids,
            forcing: ForcingConfig::default(),
            scenarios: BTreeMap::new(),
        }
    }
}

impl ModelConfig {
    /// Loads a configuration from a file, or from `model.json` inside a directory.
    pub fn load(path: &Path) -> Result<Self, HostError> {
        let file: PathBuf = if path.is_dir() {
            path.join(MODEL_FILE)
        } else {
            path.to_path_buf()
        };
        let text = std::fs::read_to_string(&file).map_err(|e| HostError::io(file.display(), e))?;
        let config: ModelConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the host cannot run.
    pub fn validate(&self) -> Result<(), HostError> {
        if self.cells == 0 {
            return Err(HostError::config("cells must be greater than zero"));
        }
        if self.steps == 0 {
            return Err(HostError::config("steps must be greater than zero"));
        }
        if self.time_step_secs <= 0 {
            return Err(HostError::config("time_step_secs must be greater than zero"));
        }
        if self.scenarios.contains_key(&0) {
            return Err(HostError::config("scenario 0 is the base scenario and cannot be overridden"));
        }
        Ok(())
    }

    /// Returns the configuration with scenario `id` applied.
    pub fn with_scenario(&self, id: u32) -> Result<ModelConfig, HostError> {
        let mut config = self.clone();
        if id == 0 {
            return Ok(config);
        }
        let overrides = self.scenarios.get(&id).ok_or(HostError::UnknownScenario(id))?;
        for (key, value) in &overrides.scalars {
            config.scalars.insert(key.clone(), *value);
        }
        for (key, value) in &overrides.grids {
            config.grids.insert(key.clone(), value.clone());
        }
        Ok(config)
    }

    /// Timestamp of step `step`.
    pub fn date_of(&self, step: usize) -> i64 {
        self.start_date + self.time_step_secs * step as i64
    }
}

/// Order in which the (external) scheduler layers modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayeringMethod {
    #[default]
    UpDown,
    DownUp,
}

impl LayeringMethod {
    /// Maps the command line ordinal (0 or 1).
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(LayeringMethod::UpDown),
            1 => Some(LayeringMethod::DownUp),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayeringMethod::UpDown => "UP_DOWN",
            LayeringMethod::DownUp => "DOWN_UP",
        }
    }
}

impl std::fmt::Display for LayeringMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Address of the scenario database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbEndpoint {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for DbEndpoint {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 27017,
        }
    }
}

impl std::fmt::Display for DbEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Process-level settings taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSettings {
    pub threads: usize,
    pub layering: LayeringMethod,
    pub db: DbEndpoint,
    pub scenario_id: u32,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            threads: 1,
            layering: LayeringMethod::UpDown,
            db: DbEndpoint::default(),
            scenario_id: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_value_expand() {
        assert_eq!(GridValue::Constant(2.5).expand("A", 3).unwrap(), vec![2.5; 3]);
        assert_eq!(GridValue::Values(vec![1.0, 2.0]).expand("A", 2).unwrap(), vec![1.0, 2.0]);
        let err = GridValue::Values(vec![1.0]).expand("A", 2).unwrap_err();
        assert!(err.to_string().contains("A"));
    }

    #[test]
    fn test_parse_minimal_json_uses_defaults() {
        let config: ModelConfig = serde_json::from_str(r#"{"cells": 3, "grids": {"Depression": [1, 2, 3]}}"#).unwrap();
        assert_eq!(config.cells, 3);
        assert_eq!(config.module, "DEP_FS");
        assert_eq!(config.grids["Depression"], GridValue::Values(vec![1.0, 2.0, 3.0]));
        assert_eq!(config.forcing, ForcingConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scenario_keys_parse_as_ids() {
        let config: ModelConfig =
            serde_json::from_str(r#"{"scenarios": {"3": {"scalars": {"Depre_in": 0.9}}}}"#).unwrap();
        let applied = config.with_scenario(3).unwrap();
        assert_eq!(applied.scalars["Depre_in"], 0.9);
        assert_eq!(applied.grids, config.grids);
    }

    #[test]
    fn test_base_scenario_and_unknown_scenario() {
        let config = ModelConfig::default();
        assert_eq!(config.with_scenario(0).unwrap(), config);
        assert!(matches!(config.with_scenario(7), Err(HostError::UnknownScenario(7))));
    }

    #[test]
    fn test_validate_rejects_empty_grid() {
        let config = ModelConfig {
            cells: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_date_of() {
        let config = ModelConfig::default();
        assert_eq!(config.date_of(0), 1262304000);
        assert_eq!(config.date_of(2), 1262304000 + 2 * 86400);
    }

    #[test]
    fn test_layering_ordinals() {
        assert_eq!(LayeringMethod::from_ordinal(0), Some(LayeringMethod::UpDown));
        assert_eq!(LayeringMethod::from_ordinal(1), Some(LayeringMethod::DownUp));
        assert_eq!(LayeringMethod::from_ordinal(2), None);
        assert_eq!(LayeringMethod::DownUp.to_string(), "DOWN_UP");
    }

    #[test]
    fn test_default_endpoint() {
        assert_eq!(DbEndpoint::default().to_string(), "127.0.0.1:27017");
    }
}
