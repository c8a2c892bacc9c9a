//! JSON exporter for per-step output summaries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::HostError;

/// Summary statistics of one output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputStats {
    pub mean: f64,
    pub min: f32,
    pub max: f32,
    pub total: f64,
}

impl OutputStats {
    /// Summarises a buffer. An empty buffer yields all zeros.
    pub fn of(values: &[f32]) -> Self {
        if values.is_empty() {
            return Self {
                mean: 0.0,
                min: 0.0,
                max: 0.0,
                total: 0.0,
            };
        }
        let total: f64 = values.iter().map(|v| *v as f64).sum();
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        Self {
            mean: total / values.len() as f64,
            min,
            max,
            total,
        }
    }
}

/// A single step of simulation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepFrame {
    /// Zero-based step index
    pub step: usize,

    /// Timestamp the step was executed at
    pub date: i64,

    /// Statistics of every declared output, by key
    pub outputs: BTreeMap<String, OutputStats>,
}

/// Complete run export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimExport {
    /// Model name
    pub model: String,

    /// Module id
    pub module: String,

    pub scenario_id: u32,

    /// Seed used for forcing
    pub seed: u64,

    pub cells: usize,

    /// All frames
    pub frames: Vec<StepFrame>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(model: &str, module: &str, scenario_id: u32, seed: u64, cells: usize) -> Self {
        Self {
            model: model.to_string(),
            module: module.to_string(),
            scenario_id,
            seed,
            cells,
            frames: Vec::new(),
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: StepFrame) {
        self.frames.push(frame);
    }

    /// Last frame, if any step ran.
    pub fn last_frame(&self) -> Option<&StepFrame> {
        self.frames.last()
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &Path) -> Result<(), HostError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path).map_err(|e| HostError::io(path.display(), e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| HostError::io(path.display(), e))?;
        Ok(())
    }
}
