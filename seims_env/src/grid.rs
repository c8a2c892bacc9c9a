//! Cell-count bookkeeping shared by every array binding.

use tracing::{debug, warn};

use crate::error::ModelError;

/// The grid size of one module instance.
///
/// Unset until the first valid array binding, fixed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellGrid {
    n_cells: Option<usize>,
}

impl CellGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the established cell count, if any.
    pub fn n_cells(&self) -> Option<usize> {
        self.n_cells
    }

    /// Reconciles a candidate array length with the established grid size.
    ///
    /// - `n <= 0`: `Ok(false)`, nothing changes.
    /// - no grid size yet: `n` becomes the grid size.
    /// - `n` differs from the grid size: [`ModelError::SizeMismatch`].
    pub fn check_input_size(&mut self, module: &str, key: &str, n: i64) -> Result<bool, ModelError> {
        if n <= 0 {
            warn!("{}: input data for {} is invalid, size {} is not positive", module, key, n);
            return Ok(false);
        }
        let n_usize = n as usize;
        match self.n_cells {
            None => {
                debug!("{}: cell count established as {} by {}", module, n, key);
                self.n_cells = Some(n_usize);
                Ok(true)
            }
            Some(expected) if expected != n_usize => Err(ModelError::SizeMismatch {
                module: module.to_string(),
                operation: "CheckInputSize",
                key: key.to_string(),
                size: n,
                expected,
            }),
            Some(_) => Ok(true),
        }
    }

    /// Returns the cell count or a not-initialized error for `operation`.
    pub fn require(&self, module: &str, operation: &'static str) -> Result<usize, ModelError> {
        self.n_cells.ok_or_else(|| ModelError::not_initialized(module, operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_binding_establishes_size() {
        let mut grid = CellGrid::new();
        assert_eq!(grid.n_cells(), None);
        assert_eq!(grid.check_input_size("M", "A", 5), Ok(true));
        assert_eq!(grid.n_cells(), Some(5));
        assert_eq!(grid.check_input_size("M", "B", 5), Ok(true));
        assert_eq!(grid.n_cells(), Some(5));
    }

    #[test]
    fn test_mismatch_names_key_and_both_sizes() {
        let mut grid = CellGrid::new();
        grid.check_input_size("M", "A", 5).unwrap();
        let err = grid.check_input_size("M", "B", 7).unwrap_err();
        match &err {
            ModelError::SizeMismatch { key, size, expected, .. } => {
                assert_eq!(key, "B");
                assert_eq!(*size, 7);
                assert_eq!(*expected, 5);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.module_id(), "M");
        assert_eq!(grid.n_cells(), Some(5));
    }

    #[test]
    fn test_non_positive_is_soft_failure() {
        let mut grid = CellGrid::new();
        assert_eq!(grid.check_input_size("M", "A", 0), Ok(false));
        assert_eq!(grid.check_input_size("M", "A", -3), Ok(false));
        assert_eq!(grid.n_cells(), None);

        grid.check_input_size("M", "A", 4).unwrap();
        assert_eq!(grid.check_input_size("M", "A", -1), Ok(false));
        assert_eq!(grid.n_cells(), Some(4));
    }

    #[test]
    fn test_require() {
        let mut grid = CellGrid::new();
        assert!(matches!(grid.require("M", "InitialOutputs"), Err(ModelError::NotInitialized { .. })));
        grid.check_input_size("M", "A", 2).unwrap();
        assert_eq!(grid.require("M", "InitialOutputs"), Ok(2));
    }

    proptest! {
        #[test]
        fn prop_equal_sizes_never_fail(n in 1i64..10_000, repeats in 1usize..8) {
            let mut grid = CellGrid::new();
            for _ in 0..repeats {
                prop_assert_eq!(grid.check_input_size("M", "K", n), Ok(true));
            }
            prop_assert_eq!(grid.n_cells(), Some(n as usize));
        }

        #[test]
        fn prop_different_size_always_fails(n1 in 1i64..10_000, n2 in 1i64..10_000) {
            prop_assume!(n1 != n2);
            let mut grid = CellGrid::new();
            grid.check_input_size("M", "K", n1).unwrap();
            let is_mismatch = matches!(
                grid.check_input_size("M", "K", n2),
                Err(ModelError::SizeMismatch { .. })
            );
            prop_assert!(is_mismatch);
        }

        #[test]
        fn prop_non_positive_leaves_grid_untouched(n in i64::MIN..=0) {
            let mut grid = CellGrid::new();
            prop_assert_eq!(grid.check_input_size("M", "K", n), Ok(false));
            prop_assert_eq!(grid.n_cells(), None);
        }
    }
}
