//! Error types for the host harness.

use seims_core::CatalogError;
use seims_env::ModelError;
use thiserror::Error;

/// Errors that abort a host run.
#[derive(Debug, Error)]
pub enum HostError {
    /// A module rejected a binding or failed to execute
    #[error("Module error: {0}")]
    Model(#[from] ModelError),

    /// The configured module id is not in the catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration parsed but is unusable
    #[error("Invalid model configuration: {0}")]
    Config(String),

    /// Configuration or export JSON failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Scenario id has no override set in the configuration
    #[error("Unknown scenario: {0}")]
    UnknownScenario(u32),

    /// `execute` returned a non-zero status
    #[error("{module} returned status {status}")]
    ExecuteStatus { module: String, status: i32 },

    /// Worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl HostError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an I/O error for `path`.
    pub fn io(path: impl std::fmt::Display, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}
