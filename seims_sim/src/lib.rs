//! SEIMS single-module host harness
//!
//! Stands in for the full model scheduler: it instantiates one module from
//! the catalog, binds parameters from a JSON configuration, feeds it
//! deterministic forcing step by step and summarises every declared output.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      runner::run                    │
//! │  ModelConfig ──► GridStore (grids + all forcing)    │
//! │                      │ borrowed views               │
//! │                 ┌────▼─────┐                        │
//! │                 │ SimWorld │──► dyn SimulationModule│
//! │                 └────┬─────┘                        │
//! │                      ▼                              │
//! │                SimExport (StepFrame per step)       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use seims_sim::{run, HostSettings, ModelConfig};
//!
//! let config = ModelConfig::load("model".as_ref())?;
//! let (result, export) = run(&config, &HostSettings::default())?;
//! println!("{} steps", result.steps);
//! ```

mod config;
mod error;
mod exporter;
mod oracle;
mod runner;
mod world;

pub use config::{
    DbEndpoint, ForcingConfig, GridValue, HostSettings, LayeringMethod, ModelConfig, ScenarioOverride, MODEL_FILE,
};
pub use error::HostError;
pub use exporter::{OutputStats, SimExport, StepFrame};
pub use oracle::{ForcingOracle, StepForcing};
pub use runner::{run, RunResult};
pub use world::{GridStore, SimWorld};
