//! Forcing oracle for the harness.
//!
//! The Oracle stands in for the upstream modules a single-module run does
//! not have:
//! - Water depth reaching the surface (exponential)
//! - Potential evapotranspiration (normal, clamped at zero)
//! - Interception evaporation (a fixed share of PET)
//!
//! All values derive from one seed, so a run is reproducible from its seed.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Normal};
use seims_core::vars::{VAR_INLO, VAR_PET, VAR_SURU};
use std::collections::BTreeMap;

use crate::config::ForcingConfig;
use crate::error::HostError;

/// Forcing for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepForcing {
    /// Arrays bound with `set_1d_data`, by key
    pub inputs: BTreeMap<String, Vec<f32>>,

    /// Arrays written into a module's own buffer before `execute`, by key
    pub in_place: BTreeMap<String, Vec<f32>>,
}

/// The Oracle - generates deterministic per-cell forcing.
pub struct ForcingOracle {
    /// Master seed
    seed: u64,

    rng: ChaCha8Rng,

    config: ForcingConfig,
}

impl ForcingOracle {
    /// Creates a new Oracle with the given seed.
    pub fn new(seed: u64, config: ForcingConfig) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates forcing for one step over `cells` cells.
    pub fn generate_step(&mut self, cells: usize) -> Result<StepForcing, HostError> {
        let pet_dist = Normal::new(self.config.pet_mean, self.config.pet_std)
            .map_err(|e| HostError::config(format!("forcing PET distribution: {}", e)))?;

        let water: Vec<f32> = if self.config.runoff_mean > 0.0 {
            let water_dist = Exp::new(1.0 / self.config.runoff_mean)
                .map_err(|e| HostError::config(format!("forcing water distribution: {}", e)))?;
            (0..cells).map(|_| water_dist.sample(&mut self.rng) as f32).collect()
        } else {
            vec![0.0; cells]
        };

        let pet: Vec<f32> = (0..cells)
            .map(|_| pet_dist.sample(&mut self.rng).max(0.0) as f32)
            .collect();

        let fraction = self.config.interception_fraction.clamp(0.0, 1.0) as f32;
        let interception: Vec<f32> = pet.iter().map(|p| p * fraction).collect();

        let mut inputs = BTreeMap::new();
        inputs.insert(VAR_PET.to_string(), pet);
        inputs.insert(VAR_INLO.to_string(), interception);

        let mut in_place = BTreeMap::new();
        in_place.insert(VAR_SURU.to_string(), water);

        Ok(StepForcing { inputs, in_place })
    }

    /// Generates forcing for `steps` consecutive steps.
    pub fn generate(&mut self, cells: usize, steps: usize) -> Result<Vec<StepForcing>, HostError> {
        (0..steps).map(|_| self.generate_step(cells)).collect()
    }
}
