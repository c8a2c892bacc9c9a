//! SEIMS Module Contract
//!
//! This crate is the only thing a simulation module and its host share.
//! It defines:
//!
//! - **Metadata**: the self-description a module declares once per type
//!   (class, identity, parameters, inputs, outputs, in/outputs,
//!   dependencies) and its versioned XML rendering.
//! - **Execution**: the [`SimulationModule`] trait - validate, lazily
//!   allocate, execute, and get/set data by name.
//! - **Binding helpers**: [`KeyMap`] for name → slot dispatch and
//!   [`CellGrid`] for grid-size reconciliation.
//!
//! # Error policy
//!
//! Reads of declared metadata by index never fail and fall back to
//! documented defaults. Binding and execution fail loudly with a
//! [`ModelError`] that names the module, the operation and the offending
//! key.
//!
//! # Example
//!
//! ```ignore
//! use seims_env::SimulationModule;
//!
//! fn step<'a>(module: &mut dyn SimulationModule<'a>, pet: &'a [f32]) -> Result<(), seims_env::ModelError> {
//!     module.set_1d_data("PET", pet)?;
//!     module.execute()?;
//!     let storage = module.get_1d_data("DPST")?;
//!     println!("{} cells", storage.len());
//!     Ok(())
//! }
//! ```

mod document;
mod error;
mod grid;
mod keys;
mod metadata;
mod module;
mod types;

pub use error::ModelError;
pub use grid::CellGrid;
pub use keys::KeyMap;
pub use metadata::{
    Category, ClassDescriptor, DuplicateName, MetadataInfo, ModuleInformation, VariableDescriptor, SCHEMA_VERSION,
};
pub use module::{SimulationModule, EXECUTE_OK};
pub use types::{Dimension, Timestamp, TransferMode};
