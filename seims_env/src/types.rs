//! Shape and transfer tags shared by module declarations.

use serde::{Deserialize, Serialize};

/// Simulation timestamp, seconds since the Unix epoch.
pub type Timestamp = i64;

/// Declared shape of a parameter or variable.
///
/// The tag tells the host which accessor form to use when binding the value:
/// scalar (`SetValue`), per-cell array (`Set1DData`) and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dimension {
    #[default]
    Unknown,
    /// One scalar value
    Single,
    /// One value per cell
    Raster1D,
    /// Cell x layer
    Raster2D,
    /// Per-cell arrays of differing lengths
    Array2D,
}

impl Dimension {
    /// Returns the canonical name used in metadata documents.
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Unknown => "DT_Unknown",
            Dimension::Single => "DT_Single",
            Dimension::Raster1D => "DT_Raster1D",
            Dimension::Raster2D => "DT_Raster2D",
            Dimension::Array2D => "DT_Array2D",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DT_Unknown" => Ok(Dimension::Unknown),
            "DT_Single" => Ok(Dimension::Single),
            "DT_Raster1D" => Ok(Dimension::Raster1D),
            "DT_Raster2D" => Ok(Dimension::Raster2D),
            "DT_Array2D" => Ok(Dimension::Array2D),
            _ => Err(format!("Unknown dimension: {}", s)),
        }
    }
}

/// How a value crosses a module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransferMode {
    /// The whole array is passed through unchanged
    #[default]
    Whole,
    /// One value broadcast to every consumer
    SingleValue,
    /// Values distributed cell by cell across partitions
    Distributed,
}

impl TransferMode {
    /// Returns the canonical name used in metadata documents.
    pub fn name(&self) -> &'static str {
        match self {
            TransferMode::Whole => "TF_Whole",
            TransferMode::SingleValue => "TF_SingleValue",
            TransferMode::Distributed => "TF_Distributed",
        }
    }
}

impl std::fmt::Display for TransferMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for TransferMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TF_Whole" => Ok(TransferMode::Whole),
            "TF_SingleValue" => Ok(TransferMode::SingleValue),
            "TF_Distributed" => Ok(TransferMode::Distributed),
            _ => Err(format!("Unknown transfer mode: {}", s)),
        }
    }
}
