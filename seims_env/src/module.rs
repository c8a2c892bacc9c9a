//! The execution contract every computational module implements.

use crate::error::ModelError;
use crate::metadata::MetadataInfo;
use crate::types::Timestamp;

/// Status returned by a successful [`SimulationModule::execute`].
pub const EXECUTE_OK: i32 = 0;

/// Uniform lifecycle and named data binding of a simulation module.
///
/// The host drives a module purely through this trait:
///
/// ```text
/// host                                   module
///  |-- set_value / set_1d_data (bind) ----->|  first array fixes nCells
///  |-- set_date(t) ------------------------>|
///  |-- execute() -------------------------->|  initial_outputs()
///  |                                        |  check_input_data() once
///  |                                        |  per-cell update
///  |-- get_1d_data(key) ------------------->|  aliased output buffer
/// ```
///
/// # Borrowed bindings
///
/// Arrays bound with [`set_1d_data`](Self::set_1d_data) are borrowed for `'a`,
/// never copied. The host keeps them alive for as long as the module may
/// read them, and can only mutate them again once the module is gone or the
/// key has been rebound to another buffer.
///
/// # Errors
///
/// Name mismatches, missing bindings and inconsistent grid sizes are
/// [`ModelError`]s. A non-positive array length is the one soft failure:
/// `set_1d_data` returns `Ok(false)`.
pub trait SimulationModule<'a> {
    /// Id under which the module is registered in the catalog.
    fn module_id(&self) -> &str;

    /// Declarations of this module type.
    fn metadata(&self) -> &MetadataInfo;

    /// Sets the current simulation timestamp.
    fn set_date(&mut self, date: Timestamp);

    /// Cell count established by the first array binding.
    fn cell_count(&self) -> Option<usize>;

    /// Validates that every required binding is present.
    ///
    /// Idempotent. Returns `Ok(true)` when the module is ready to execute.
    fn check_input_data(&mut self) -> Result<bool, ModelError>;

    /// Allocates output buffers to `nCells` on first call and seeds initial
    /// conditions. Later calls are no-ops.
    fn initial_outputs(&mut self) -> Result<(), ModelError>;

    /// Computes every output for the current timestamp.
    ///
    /// Returns [`EXECUTE_OK`] on success.
    fn execute(&mut self) -> Result<i32, ModelError>;

    /// Binds a scalar parameter by name.
    fn set_value(&mut self, key: &str, value: f32) -> Result<(), ModelError>;

    /// Binds an array parameter or input by name.
    fn set_1d_data(&mut self, key: &str, data: &'a [f32]) -> Result<bool, ModelError>;

    /// Returns the named output buffer, allocating outputs first if needed.
    fn get_1d_data(&mut self, key: &str) -> Result<&[f32], ModelError>;

    /// Mutable view of the named output buffer.
    ///
    /// Used by hosts to hand water produced upstream into a buffer the
    /// module updates in place.
    fn get_1d_data_mut(&mut self, key: &str) -> Result<&mut [f32], ModelError>;
}
