//! SimWorld - drives one module instance through a run.
//!
//! Bound arrays are borrowed by the module for its whole lifetime, so every
//! buffer it will ever see lives in a [`GridStore`] built before the module
//! exists. The world only hands out views of it.

use seims_core::ModuleKind;
use seims_env::{Dimension, MetadataInfo, SimulationModule, EXECUTE_OK};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::ModelConfig;
use crate::error::HostError;
use crate::exporter::{OutputStats, StepFrame};
use crate::oracle::{ForcingOracle, StepForcing};

/// Host-owned buffers for a whole run.
#[derive(Debug, Clone)]
pub struct GridStore {
    cells: usize,

    /// Per-cell parameters, expanded to `cells` values
    grids: BTreeMap<String, Vec<f32>>,

    /// Forcing for every step, generated up front
    forcing: Vec<StepForcing>,
}

impl GridStore {
    /// Expands the configured grids and generates forcing for all steps.
    pub fn build(config: &ModelConfig) -> Result<Self, HostError> {
        config.validate()?;
        let grids = config
            .grids
            .iter()
            .map(|(key, value)| Ok((key.clone(), value.expand(key, config.cells)?)))
            .collect::<Result<BTreeMap<_, _>, HostError>>()?;

        let mut oracle = ForcingOracle::new(config.seed, config.forcing.clone());
        let forcing = oracle.generate(config.cells, config.steps)?;
        debug!(
            "Grid store: {} cells, {} grids, {} forcing steps (seed {})",
            config.cells,
            grids.len(),
            forcing.len(),
            oracle.seed()
        );

        Ok(Self {
            cells: config.cells,
            grids,
            forcing,
        })
    }

    pub fn cells(&self) -> usize {
        self.cells
    }

    pub fn steps(&self) -> usize {
        self.forcing.len()
    }

    /// Per-cell parameter by key.
    pub fn grid(&self, key: &str) -> Option<&[f32]> {
        self.grids.get(key).map(|v| v.as_slice())
    }

    /// Forcing of step `step`.
    pub fn forcing(&self, step: usize) -> Option<&StepForcing> {
        self.forcing.get(step)
    }
}

/// The SimWorld - one module bound to a [`GridStore`].
pub struct SimWorld<'a> {
    config: &'a ModelConfig,
    store: &'a GridStore,
    metadata: &'static MetadataInfo,
    module: Box<dyn SimulationModule<'a> + 'a>,

    /// Next step to execute
    step: usize,
}

impl<'a> SimWorld<'a> {
    /// Instantiates `kind` and binds its parameters from the configuration.
    ///
    /// Parameters the configuration does not provide are left unbound; the
    /// module's own validation reports them on the first step.
    pub fn new(kind: ModuleKind, config: &'a ModelConfig, store: &'a GridStore) -> Result<Self, HostError> {
        let metadata = kind.metadata();
        for dup in metadata.duplicate_names() {
            warn!(
                "{}: {} '{}' declared at indices {:?}",
                kind, dup.category, dup.name, dup.indices
            );
        }

        let mut module = kind.instantiate();
        for param in metadata.parameters() {
            let name = param.name.as_str();
            if param.dimension == Dimension::Single {
                match config.scalars.get(name) {
                    Some(value) => {
                        module.set_value(name, *value)?;
                        debug!("{}: {} = {}", kind, name, value);
                    }
                    None => warn!("{}: scalar parameter {} is not configured", kind, name),
                }
                continue;
            }
            match store.grid(name) {
                Some(values) => {
                    if !module.set_1d_data(name, values)? {
                        warn!("{}: parameter {} was not bound", kind, name);
                    }
                }
                None => warn!("{}: grid parameter {} is not configured", kind, name),
            }
        }

        Ok(Self {
            config,
            store,
            metadata,
            module,
            step: 0,
        })
    }

    /// Number of steps executed so far.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn module(&self) -> &dyn SimulationModule<'a> {
        self.module.as_ref()
    }

    /// Advances the simulation by one step.
    pub fn tick(&mut self) -> Result<StepFrame, HostError> {
        let store: &'a GridStore = self.store;
        let forcing = store
            .forcing(self.step)
            .ok_or_else(|| HostError::config(format!("no forcing generated for step {}", self.step)))?;
        let metadata: &'static MetadataInfo = self.metadata;
        let date = self.config.date_of(self.step);
        let id = metadata.id();

        self.module.set_date(date);

        for (key, values) in &forcing.inputs {
            if !metadata.inputs().iter().any(|v| v.name == *key) {
                continue;
            }
            if !self.module.set_1d_data(key, values)? {
                warn!("{}: input {} was not bound at step {}", id, key, self.step);
            }
        }

        for (key, values) in &forcing.in_place {
            if !metadata.outputs().iter().any(|v| v.name == *key) {
                continue;
            }
            let buffer = self.module.get_1d_data_mut(key)?;
            if buffer.len() != values.len() {
                return Err(HostError::config(format!(
                    "{} buffer {} has {} cells, forcing has {}",
                    id,
                    key,
                    buffer.len(),
                    values.len()
                )));
            }
            buffer.copy_from_slice(values);
        }

        let status = self.module.execute()?;
        if status != EXECUTE_OK {
            return Err(HostError::ExecuteStatus {
                module: id.to_string(),
                status,
            });
        }

        let mut outputs = BTreeMap::new();
        for output in metadata.outputs() {
            let values = self.module.get_1d_data(&output.name)?;
            outputs.insert(output.name.clone(), OutputStats::of(values));
        }

        debug!("{}: step {} at {} done", id, self.step, date);
        let frame = StepFrame {
            step: self.step,
            date,
            outputs,
        };
        self.step += 1;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ForcingConfig, GridValue};
    use approx::assert_relative_eq;
    use seims_core::vars::*;
    use seims_env::ModelError;

    fn small_config() -> ModelConfig {
        ModelConfig {
            cells: 4,
            steps: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_store_expands_grids_and_forcing() {
        let store = GridStore::build(&small_config()).unwrap();
        assert_eq!(store.cells(), 4);
        assert_eq!(store.steps(), 3);
        assert_eq!(store.grid(VAR_DEPRESSION), Some(&[10.0f32; 4][..]));
        assert!(store.grid("missing").is_none());
        assert!(store.forcing(2).is_some());
        assert!(store.forcing(3).is_none());
    }

    #[test]
    fn test_store_rejects_short_grid() {
        let mut config = small_config();
        config
            .grids
            .insert(VAR_DEPRESSION.to_string(), GridValue::Values(vec![1.0, 2.0]));
        assert!(matches!(GridStore::build(&config), Err(HostError::Config(_))));
    }

    #[test]
    fn test_world_runs_all_steps() {
        let config = small_config();
        let store = GridStore::build(&config).unwrap();
        let mut world = SimWorld::new(ModuleKind::DepressionFs, &config, &store).unwrap();

        for step in 0..3 {
            let frame = world.tick().unwrap();
            assert_eq!(frame.step, step);
            assert_eq!(frame.date, config.date_of(step));
            assert_eq!(frame.outputs.len(), 4);
        }
        assert_eq!(world.step(), 3);
        assert!(world.tick().is_err());
    }

    #[test]
    fn test_storage_never_exceeds_capacity() {
        let config = ModelConfig {
            forcing: ForcingConfig {
                runoff_mean: 50.0,
                ..Default::default()
            },
            ..small_config()
        };
        let store = GridStore::build(&config).unwrap();
        let mut world = SimWorld::new(ModuleKind::DepressionFs, &config, &store).unwrap();

        for _ in 0..3 {
            let frame = world.tick().unwrap();
            let storage = frame.outputs[VAR_DPST];
            assert!(storage.max <= 10.0);
            let surplus = frame.outputs[VAR_STCAPSURPLUS];
            assert_relative_eq!(storage.total + surplus.total, 40.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_missing_parameter_fails_on_first_step() {
        let mut config = small_config();
        config.scalars.clear();
        let store = GridStore::build(&config).unwrap();
        let mut world = SimWorld::new(ModuleKind::DepressionFs, &config, &store).unwrap();

        let err = world.tick().unwrap_err();
        assert!(matches!(err, HostError::Model(ModelError::Validation { .. })));
    }

    #[test]
    fn test_module_cell_count_follows_store() {
        let config = small_config();
        let store = GridStore::build(&config).unwrap();
        let world = SimWorld::new(ModuleKind::DepressionFs, &config, &store).unwrap();
        assert_eq!(world.module().cell_count(), Some(4));
    }
}
