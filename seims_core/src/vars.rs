//! Variable names shared between modules.
//!
//! Hosts wire modules together by matching these strings exactly.

/// Initial depression storage coefficient
pub const VAR_DEPREIN: &str = "Depre_in";
/// Depression storage capacity
pub const VAR_DEPRESSION: &str = "Depression";
/// Potential evapotranspiration
pub const VAR_PET: &str = "PET";
/// Evaporation loss from interception storage
pub const VAR_INLO: &str = "INLO";
/// Depression storage depth
pub const VAR_DPST: &str = "DPST";
/// Surface runoff depth
pub const VAR_SURU: &str = "SURU";
/// Remaining depression storage capacity
pub const VAR_STCAPSURPLUS: &str = "STCAPSURPLUS";
/// Evaporation from depression storage
pub const VAR_DEET: &str = "DEET";

pub const SRC_PARAMETER_DB: &str = "ParameterDB";
pub const SRC_MODULE: &str = "Module";
