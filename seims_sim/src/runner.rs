//! Run driver - executes one configured model end to end.

use serde::Serialize;
use seims_core::ModuleKind;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::{HostSettings, ModelConfig};
use crate::error::HostError;
use crate::exporter::{OutputStats, SimExport};
use crate::world::{GridStore, SimWorld};

/// Results from a model run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    /// Model name
    pub model: String,

    /// Module that was run
    pub module: String,

    pub scenario_id: u32,

    /// Seed used
    pub seed: u64,

    /// Steps executed
    pub steps: usize,

    pub cells: usize,

    /// Worker threads of the per-cell loops
    pub threads: usize,

    pub layering: String,

    /// Scenario database endpoint the run was configured with
    pub db: String,

    /// Statistics of every output after the last step
    pub final_outputs: BTreeMap<String, OutputStats>,
}

/// Runs `config` under `settings`.
///
/// The scenario override is applied first; per-cell loops run on a
/// dedicated pool of `settings.threads` workers.
pub fn run(config: &ModelConfig, settings: &HostSettings) -> Result<(RunResult, SimExport), HostError> {
    let config = config.with_scenario(settings.scenario_id)?;
    let kind: ModuleKind = config.module.parse()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads.max(1))
        .build()
        .map_err(|e| HostError::ThreadPool(e.to_string()))?;

    info!(
        "Running {} on {} cells for {} steps (scenario {}, seed {}, {} threads, {})",
        kind, config.cells, config.steps, settings.scenario_id, config.seed, settings.threads, settings.layering
    );
    debug!("Scenario database at {}", settings.db);

    pool.install(|| {
        let store = GridStore::build(&config)?;
        let mut world = SimWorld::new(kind, &config, &store)?;
        let mut export = SimExport::new(&config.name, kind.id(), settings.scenario_id, config.seed, config.cells);

        for _ in 0..config.steps {
            let frame = world.tick()?;
            export.add_frame(frame);
        }

        let final_outputs = export
            .last_frame()
            .map(|frame| frame.outputs.clone())
            .unwrap_or_default();

        info!("{} finished {} steps", kind, world.step());

        let result = RunResult {
            model: config.name.clone(),
            module: kind.id().to_string(),
            scenario_id: settings.scenario_id,
            seed: config.seed,
            steps: world.step(),
            cells: config.cells,
            threads: settings.threads,
            layering: settings.layering.to_string(),
            db: settings.db.to_string(),
            final_outputs,
        };
        Ok((result, export))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seims_core::vars::VAR_DPST;

    #[test]
    fn test_run_default_model() {
        let config = ModelConfig {
            cells: 8,
            steps: 5,
            ..Default::default()
        };
        let (result, export) = run(&config, &HostSettings::default()).unwrap();

        assert_eq!(result.module, "DEP_FS");
        assert_eq!(result.steps, 5);
        assert_eq!(export.frames.len(), 5);
        assert_eq!(result.final_outputs, export.frames[4].outputs);
        assert!(result.final_outputs.contains_key(VAR_DPST));
    }

    #[test]
    fn test_thread_count_does_not_change_results() {
        let config = ModelConfig {
            cells: 64,
            steps: 4,
            ..Default::default()
        };
        let single = HostSettings::default();
        let many = HostSettings {
            threads: 4,
            ..Default::default()
        };
        let (_, a) = run(&config, &single).unwrap();
        let (_, b) = run(&config, &many).unwrap();
        assert_eq!(a.frames, b.frames);
    }

    #[test]
    fn test_unknown_module_is_rejected() {
        let config = ModelConfig {
            module: "DEP_LINSLEY".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            run(&config, &HostSettings::default()),
            Err(HostError::Catalog(_))
        ));
    }
}
