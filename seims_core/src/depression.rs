//! DEP_FS - depression storage by a simple fill-and-spill method.
//!
//! Each cell owns a depression of fixed capacity. Water arriving at the
//! surface fills the depression first; anything beyond capacity spills on as
//! surface runoff. Water held in the depression evaporates at the rate the
//! atmosphere still demands after interception evaporation.
//!
//! # Buffers
//!
//! | key            | role      | shape        |
//! |----------------|-----------|--------------|
//! | `Depre_in`     | parameter | scalar       |
//! | `Depression`   | parameter | per cell     |
//! | `PET`          | input     | per cell     |
//! | `INLO`         | input     | per cell     |
//! | `DPST`         | output    | per cell     |
//! | `SURU`         | output    | per cell     |
//! | `STCAPSURPLUS` | output    | per cell     |
//! | `DEET`         | output    | per cell     |
//!
//! Before each step the host writes the total water depth reaching the
//! surface into `SURU` (through [`SimulationModule::get_1d_data_mut`]);
//! `execute` splits it into storage and runoff in place.

use std::sync::OnceLock;

use rayon::prelude::*;
use seims_env::{
    CellGrid, Dimension, KeyMap, MetadataInfo, ModelError, SimulationModule, Timestamp, TransferMode, EXECUTE_OK,
};
use tracing::debug;

use crate::vars::*;

pub const MID_DEP_FS: &str = "DEP_FS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarSlot {
    InitialCoefficient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArraySlot {
    Capacity,
    Pet,
    InterceptionEvaporation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputSlot {
    Storage,
    Runoff,
    CapacitySurplus,
    Evaporation,
}

/// Water balance of one cell after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBalance {
    pub storage: f32,
    pub runoff: f32,
    pub capacity_surplus: f32,
    pub evaporation: f32,
}

/// Fill-and-spill update for a single cell.
///
/// `incoming` is the total water depth at the surface, including what the
/// depression already holds.
pub fn fill_and_spill(incoming: f32, capacity: f32, pet: f32, interception_evaporation: f32) -> CellBalance {
    let (storage, runoff) = if incoming <= capacity {
        (incoming, 0.0)
    } else {
        (capacity, incoming - capacity)
    };
    let evaporation = if storage > 0.0 {
        storage.min(pet - interception_evaporation)
    } else {
        0.0
    };
    CellBalance {
        storage,
        runoff,
        capacity_surplus: capacity - storage,
        evaporation,
    }
}

#[derive(Debug, Clone)]
struct DepressionOutputs {
    storage: Vec<f32>,
    runoff: Vec<f32>,
    capacity_surplus: Vec<f32>,
    evaporation: Vec<f32>,
}

impl DepressionOutputs {
    fn slot(&self, slot: OutputSlot) -> &[f32] {
        match slot {
            OutputSlot::Storage => &self.storage,
            OutputSlot::Runoff => &self.runoff,
            OutputSlot::CapacitySurplus => &self.capacity_surplus,
            OutputSlot::Evaporation => &self.evaporation,
        }
    }

    fn slot_mut(&mut self, slot: OutputSlot) -> &mut [f32] {
        match slot {
            OutputSlot::Storage => &mut self.storage,
            OutputSlot::Runoff => &mut self.runoff,
            OutputSlot::CapacitySurplus => &mut self.capacity_surplus,
            OutputSlot::Evaporation => &mut self.evaporation,
        }
    }
}

/// Declarations of the DEP_FS module type.
pub fn metadata() -> &'static MetadataInfo {
    static METADATA: OnceLock<MetadataInfo> = OnceLock::new();
    METADATA.get_or_init(|| {
        let mut md = MetadataInfo::new();
        md.set_class("Depression", "Calculate depression storage.");
        md.set_id(MID_DEP_FS);
        md.set_name(MID_DEP_FS);
        md.set_description("A simple fill and spill method to calculate depression storage.");
        md.set_version("1.0");
        md.set_author("SEIMS Team");
        md.set_email("");
        md.set_website("https://github.com/lreis2415/SEIMS");
        md.set_helpfile("");

        md.add_parameter(VAR_DEPREIN, "none", "Initial depression storage coefficient", SRC_PARAMETER_DB, Dimension::Single);
        md.add_parameter(VAR_DEPRESSION, "mm", "Depression storage capacity", SRC_PARAMETER_DB, Dimension::Raster1D);

        md.add_input(VAR_PET, "mm", "Potential evapotranspiration", SRC_MODULE, Dimension::Raster1D, TransferMode::Whole);
        md.add_input(VAR_INLO, "mm", "Evaporation loss from interception storage", SRC_MODULE, Dimension::Raster1D, TransferMode::Whole);

        md.add_output_whole(VAR_DPST, "mm", "Depression storage", Dimension::Raster1D);
        md.add_output_whole(VAR_SURU, "mm", "Surface runoff", Dimension::Raster1D);
        md.add_output_whole(VAR_STCAPSURPLUS, "mm", "Surplus of storage capacity", Dimension::Raster1D);
        md.add_output_whole(VAR_DEET, "mm", "Evaporation from depression storage", Dimension::Raster1D);
        md
    })
}

/// Depression storage module instance.
///
/// Bound arrays are borrowed for `'a`; outputs are owned and allocated on
/// first use.
pub struct DepressionFs<'a> {
    grid: CellGrid,
    date: Option<Timestamp>,

    /// Initial depression storage coefficient
    dep_co: Option<f32>,
    /// Depression storage capacity
    dep_cap: Option<&'a [f32]>,
    pet: Option<&'a [f32]>,
    /// Evaporation from interception storage
    ei: Option<&'a [f32]>,

    outputs: Option<DepressionOutputs>,
    check_input: bool,

    scalar_keys: KeyMap<ScalarSlot>,
    array_keys: KeyMap<ArraySlot>,
    output_keys: KeyMap<OutputSlot>,
}

impl<'a> Default for DepressionFs<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DepressionFs<'a> {
    pub fn new() -> Self {
        Self {
            grid: CellGrid::new(),
            date: None,
            dep_co: None,
            dep_cap: None,
            pet: None,
            ei: None,
            outputs: None,
            check_input: true,
            scalar_keys: KeyMap::new(MID_DEP_FS, &[(VAR_DEPREIN, ScalarSlot::InitialCoefficient)]),
            array_keys: KeyMap::new(
                MID_DEP_FS,
                &[
                    (VAR_DEPRESSION, ArraySlot::Capacity),
                    (VAR_PET, ArraySlot::Pet),
                    (VAR_INLO, ArraySlot::InterceptionEvaporation),
                ],
            ),
            output_keys: KeyMap::new(
                MID_DEP_FS,
                &[
                    (VAR_DPST, OutputSlot::Storage),
                    (VAR_SURU, OutputSlot::Runoff),
                    (VAR_STCAPSURPLUS, OutputSlot::CapacitySurplus),
                    (VAR_DEET, OutputSlot::Evaporation),
                ],
            ),
        }
    }

    fn invalid(&self, message: &str) -> ModelError {
        ModelError::validation(MID_DEP_FS, "CheckInputData", message)
    }
}

impl<'a> SimulationModule<'a> for DepressionFs<'a> {
    fn module_id(&self) -> &str {
        MID_DEP_FS
    }

    fn metadata(&self) -> &MetadataInfo {
        metadata()
    }

    fn set_date(&mut self, date: Timestamp) {
        self.date = Some(date);
    }

    fn cell_count(&self) -> Option<usize> {
        self.grid.n_cells()
    }

    fn check_input_data(&mut self) -> Result<bool, ModelError> {
        if self.date.is_none() {
            return Err(self.invalid("You have not set the time."));
        }
        if self.grid.n_cells().is_none() {
            return Err(self.invalid("The cell number of the input can not be less than zero."));
        }
        if self.dep_co.is_none() {
            return Err(self.invalid("The parameter: initial depression storage coefficient has not been set."));
        }
        if self.dep_cap.is_none() {
            return Err(self.invalid("The parameter: depression storage capacity has not been set."));
        }
        if self.pet.is_none() {
            return Err(self.invalid("The parameter: PET has not been set."));
        }
        if self.ei.is_none() {
            return Err(self.invalid("The parameter: evaporation from the interception storage has not been set."));
        }
        Ok(true)
    }

    fn initial_outputs(&mut self) -> Result<(), ModelError> {
        if self.outputs.is_some() {
            return Ok(());
        }
        let n = self.grid.require(MID_DEP_FS, "InitialOutputs")?;

        let storage = match (self.dep_co, self.dep_cap) {
            (Some(co), Some(cap)) => cap.par_iter().map(|c| co * c).collect(),
            _ => {
                debug!("{}: storage not seeded, initial coefficient or capacity unbound", MID_DEP_FS);
                vec![0.0; n]
            }
        };
        self.outputs = Some(DepressionOutputs {
            storage,
            runoff: vec![0.0; n],
            capacity_surplus: vec![0.0; n],
            evaporation: vec![0.0; n],
        });
        debug!("{}: allocated outputs for {} cells", MID_DEP_FS, n);
        Ok(())
    }

    fn execute(&mut self) -> Result<i32, ModelError> {
        self.initial_outputs()?;
        if self.check_input {
            self.check_input_data()?;
            self.check_input = false;
        }

        let (Some(cap), Some(pet), Some(ei)) = (self.dep_cap, self.pet, self.ei) else {
            return Err(ModelError::validation(MID_DEP_FS, "Execute", "inputs were unbound after validation"));
        };
        let Some(out) = self.outputs.as_mut() else {
            return Err(ModelError::not_initialized(MID_DEP_FS, "Execute"));
        };
        let DepressionOutputs {
            storage,
            runoff,
            capacity_surplus,
            evaporation,
        } = out;

        storage
            .par_iter_mut()
            .zip(runoff.par_iter_mut())
            .zip(capacity_surplus.par_iter_mut())
            .zip(evaporation.par_iter_mut())
            .enumerate()
            .for_each(|(i, (((sd, sr), surplus), ed))| {
                // SURU holds the total surface water depth on entry
                let balance = fill_and_spill(*sr, cap[i], pet[i], ei[i]);
                *sd = balance.storage;
                *sr = balance.runoff;
                *surplus = balance.capacity_surplus;
                *ed = balance.evaporation;
            });
        Ok(EXECUTE_OK)
    }

    fn set_value(&mut self, key: &str, value: f32) -> Result<(), ModelError> {
        match self.scalar_keys.resolve(key, "SetValue")? {
            ScalarSlot::InitialCoefficient => self.dep_co = Some(value),
        }
        Ok(())
    }

    fn set_1d_data(&mut self, key: &str, data: &'a [f32]) -> Result<bool, ModelError> {
        if !self.grid.check_input_size(MID_DEP_FS, key, data.len() as i64)? {
            return Ok(false);
        }
        let slot = self.array_keys.resolve(key, "Set1DData")?;
        match slot {
            ArraySlot::Capacity => self.dep_cap = Some(data),
            ArraySlot::Pet => self.pet = Some(data),
            ArraySlot::InterceptionEvaporation => self.ei = Some(data),
        }
        Ok(true)
    }

    fn get_1d_data(&mut self, key: &str) -> Result<&[f32], ModelError> {
        self.initial_outputs()?;
        let slot = self.output_keys.resolve(key, "Get1DData")?;
        match self.outputs.as_ref() {
            Some(out) => Ok(out.slot(slot)),
            None => Err(ModelError::not_initialized(MID_DEP_FS, "Get1DData")),
        }
    }

    fn get_1d_data_mut(&mut self, key: &str) -> Result<&mut [f32], ModelError> {
        self.initial_outputs()?;
        let slot = self.output_keys.resolve(key, "Get1DData")?;
        match self.outputs.as_mut() {
            Some(out) => Ok(out.slot_mut(slot)),
            None => Err(ModelError::not_initialized(MID_DEP_FS, "Get1DData")),
        }
    }
}
