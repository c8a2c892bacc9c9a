//! Module catalog - discovery of the modules this build ships.

use seims_env::{MetadataInfo, SimulationModule};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::depression::{self, DepressionFs};

/// Errors from catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown module: {0}")]
    UnknownModule(String),
}

/// Modules compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// Depression storage, fill and spill
    #[serde(rename = "DEP_FS")]
    DepressionFs,
}

impl ModuleKind {
    /// Returns every registered module.
    pub fn all() -> Vec<ModuleKind> {
        vec![ModuleKind::DepressionFs]
    }

    /// Returns the catalog id.
    pub fn id(&self) -> &'static str {
        match self {
            ModuleKind::DepressionFs => depression::MID_DEP_FS,
        }
    }

    /// Declarations of the module type, without instantiating it.
    pub fn metadata(&self) -> &'static MetadataInfo {
        match self {
            ModuleKind::DepressionFs => depression::metadata(),
        }
    }

    /// Creates a fresh, unbound instance.
    pub fn instantiate<'a>(&self) -> Box<dyn SimulationModule<'a> + 'a> {
        match self {
            ModuleKind::DepressionFs => Box::new(DepressionFs::new()),
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for ModuleKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleKind::all()
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| CatalogError::UnknownModule(s.to_string()))
    }
}

/// Looks up a module's XML metadata document by id.
pub fn describe(id: &str) -> Result<String, CatalogError> {
    let kind: ModuleKind = id.parse()?;
    Ok(kind.metadata().xml_document())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        assert_eq!("DEP_FS".parse::<ModuleKind>(), Ok(ModuleKind::DepressionFs));
        assert_eq!(
            "DEP_LINSLEY".parse::<ModuleKind>(),
            Err(CatalogError::UnknownModule("DEP_LINSLEY".to_string()))
        );
    }

    #[test]
    fn test_ids_match_declared_metadata() {
        for kind in ModuleKind::all() {
            assert_eq!(kind.metadata().id(), kind.id());
            let module = kind.instantiate();
            assert_eq!(module.module_id(), kind.id());
            assert_eq!(module.cell_count(), None);
        }
    }

    #[test]
    fn test_serializes_as_catalog_id() {
        assert_eq!(serde_json::to_string(&ModuleKind::DepressionFs).unwrap(), "\"DEP_FS\"");
        let kind: ModuleKind = serde_json::from_str("\"DEP_FS\"").unwrap();
        assert_eq!(kind, ModuleKind::DepressionFs);
    }

    #[test]
    fn test_describe_renders_document() {
        let doc = describe("DEP_FS").unwrap();
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("<id>DEP_FS</id>"));
        assert!(doc.contains("<name>STCAPSURPLUS</name>"));
        assert!(describe("nope").is_err());
    }
}
