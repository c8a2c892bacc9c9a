//! Error types for the module contract.

use thiserror::Error;

/// Errors raised by a module on the write/bind/execute path.
///
/// Every variant carries the id of the module that raised it and the name of
/// the contract operation that failed, so a host wiring dozens of modules by
/// name can attribute the failure without a backtrace.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A named accessor was called with a key the module never declared.
    #[error("{module}::{operation}: `{key}` does not exist in current module")]
    UnknownKey {
        module: String,
        operation: &'static str,
        key: String,
    },

    /// An array binding disagrees with the cell count established earlier.
    #[error("{module}::{operation}: input data for `{key}` is invalid with size {size}, the origin size is {expected}")]
    SizeMismatch {
        module: String,
        operation: &'static str,
        key: String,
        size: i64,
        expected: usize,
    },

    /// A required binding, timestamp or cell count is missing.
    #[error("{module}::{operation}: {message}")]
    Validation {
        module: String,
        operation: &'static str,
        message: String,
    },

    /// Output buffers were requested before the grid size was known.
    #[error("{module}::{operation}: the cell number has not been established by any input")]
    NotInitialized {
        module: String,
        operation: &'static str,
    },
}

impl ModelError {
    /// Creates an unknown-key error.
    pub fn unknown_key(module: impl Into<String>, operation: &'static str, key: impl Into<String>) -> Self {
        Self::UnknownKey {
            module: module.into(),
            operation,
            key: key.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(module: impl Into<String>, operation: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            module: module.into(),
            operation,
            message: message.into(),
        }
    }

    /// Creates a not-initialized error.
    pub fn not_initialized(module: impl Into<String>, operation: &'static str) -> Self {
        Self::NotInitialized {
            module: module.into(),
            operation,
        }
    }

    /// Returns the id of the module that raised the error.
    pub fn module_id(&self) -> &str {
        match self {
            Self::UnknownKey { module, .. }
            | Self::SizeMismatch { module, .. }
            | Self::Validation { module, .. }
            | Self::NotInitialized { module, .. } => module,
        }
    }

    /// Returns the contract operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::UnknownKey { operation, .. }
            | Self::SizeMismatch { operation, .. }
            | Self::Validation { operation, .. }
            | Self::NotInitialized { operation, .. } => operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_message_names_key_and_module() {
        let err = ModelError::unknown_key("DEP_FS", "SetValue", "Bogus");
        let msg = err.to_string();
        assert!(msg.contains("DEP_FS"));
        assert!(msg.contains("SetValue"));
        assert!(msg.contains("Bogus"));
        assert_eq!(err.module_id(), "DEP_FS");
        assert_eq!(err.operation(), "SetValue");
    }

    #[test]
    fn test_size_mismatch_message_names_both_sizes() {
        let err = ModelError::SizeMismatch {
            module: "DEP_FS".to_string(),
            operation: "CheckInputSize",
            key: "PET".to_string(),
            size: 7,
            expected: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("PET"));
        assert!(msg.contains('7'));
        assert!(msg.contains('5'));
    }
}
