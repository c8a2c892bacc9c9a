//! Name → slot dispatch for the string-keyed accessors.
//!
//! Each module declares a closed enum of the slots it can bind or expose and
//! builds a [`KeyMap`] once at construction. A lookup miss is an
//! [`ModelError::UnknownKey`] naming the key, the module and the operation.

use std::collections::HashMap;
use tracing::warn;

use crate::error::ModelError;

/// Exact, case-sensitive map from declared names to module slots.
#[derive(Debug, Clone)]
pub struct KeyMap<S> {
    module: &'static str,
    slots: HashMap<&'static str, S>,
    /// Names given more than once in the entries, in order of repetition
    duplicates: Vec<&'static str>,
}

impl<S: Copy> KeyMap<S> {
    /// Builds the map for `module` from `(name, slot)` pairs.
    ///
    /// A name repeated in `entries` keeps its first slot and is reported by
    /// [`duplicates`](Self::duplicates).
    pub fn new(module: &'static str, entries: &[(&'static str, S)]) -> Self {
        let mut slots = HashMap::with_capacity(entries.len());
        let mut duplicates = Vec::new();
        for (name, slot) in entries {
            if slots.contains_key(name) {
                warn!("{}: key {} is mapped more than once, keeping the first slot", module, name);
                duplicates.push(*name);
                continue;
            }
            slots.insert(*name, *slot);
        }
        Self {
            module,
            slots,
            duplicates,
        }
    }

    /// Names that appeared more than once when the map was built.
    pub fn duplicates(&self) -> &[&'static str] {
        &self.duplicates
    }

    /// Resolves `key`, or fails with an unknown-key error for `operation`.
    pub fn resolve(&self, key: &str, operation: &'static str) -> Result<S, ModelError> {
        self.slots
            .get(key)
            .copied()
            .ok_or_else(|| ModelError::unknown_key(self.module, operation, key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
