//! SEIMS Core Modules
//!
//! Concrete computational modules built on the `seims_env` contract.
//! Each module implements one physical process over the cell grid and is
//! wired to its neighbours purely through declared names.
//!
//! - [`depression`]: DEP_FS, fill-and-spill depression storage
//! - [`catalog`]: lookup of the shipped modules by id

pub mod catalog;
pub mod depression;
pub mod vars;

pub use catalog::{describe, CatalogError, ModuleKind};
pub use depression::{fill_and_spill, CellBalance, DepressionFs, MID_DEP_FS};
