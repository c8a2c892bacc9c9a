//! Module metadata registry.
//!
//! A [`MetadataInfo`] is the declarative half of the module contract: the
//! module's class, its identity, and the ordered lists of parameters,
//! inputs, outputs, in/outputs and dependencies it declares. Hosts read it
//! (directly or through [`MetadataInfo::xml_document`]) to learn which names
//! and shapes to bind.
//!
//! # Read path
//!
//! Every indexed getter returns a documented default when the index is out
//! of range: an empty string, [`Dimension::Unknown`], [`TransferMode::Whole`]
//! or a default record. Reads never fail; only the binding path raises.
//!
//! ```
//! use seims_env::{Dimension, MetadataInfo};
//!
//! let mut md = MetadataInfo::new();
//! md.set_id("DEP_FS");
//! let idx = md.add_parameter("Depre_in", "none", "coefficient", "ParameterDB", Dimension::Single);
//! assert_eq!(idx, 0);
//! assert_eq!(md.parameter_name(0), "Depre_in");
//! assert_eq!(md.parameter_name(7), "");
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Dimension, TransferMode};

/// Schema version of the rendered metadata document.
pub const SCHEMA_VERSION: &str = "0.4";

/// Category/family a module (or a dependency) belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    pub description: String,
}

/// Free-text identity of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInformation {
    /// Stable lookup key in the host's module catalog
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    pub email: String,
    pub website: String,
    pub helpfile: String,
}

/// One declared parameter, input, output or in/output.
///
/// `source` is present for parameters, inputs and in/outputs; `transfer` is
/// present for inputs, outputs and in/outputs. The category a record was
/// declared in decides which of the two are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub name: String,
    pub units: String,
    pub description: String,
    pub dimension: Dimension,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer: Option<TransferMode>,
}

impl VariableDescriptor {
    /// Returns the provenance text, or an empty string when not applicable.
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or("")
    }

    /// Returns the transfer mode, `TF_Whole` when not applicable.
    pub fn transfer(&self) -> TransferMode {
        self.transfer.unwrap_or_default()
    }
}

/// The declaration sequences of a [`MetadataInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Parameter,
    Input,
    Output,
    InOutput,
    Dependency,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Parameter => "parameter",
            Category::Input => "input",
            Category::Output => "output",
            Category::InOutput => "inoutput",
            Category::Dependency => "dependency",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A name declared more than once within one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName {
    pub category: Category,
    pub name: String,
    /// Insertion indices carrying the name, ascending
    pub indices: Vec<usize>,
}

/// Declarative description of one module type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataInfo {
    schema_version: String,
    class: ClassDescriptor,
    information: ModuleInformation,
    parameters: Vec<VariableDescriptor>,
    inputs: Vec<VariableDescriptor>,
    outputs: Vec<VariableDescriptor>,
    in_outputs: Vec<VariableDescriptor>,
    dependencies: Vec<ClassDescriptor>,
}

impl Default for MetadataInfo {
    fn default() -> Self {
        Self::new()
    }
}

fn text_at<'s>(seq: &'s [VariableDescriptor], index: usize, field: fn(&VariableDescriptor) -> &str) -> &'s str {
    seq.get(index).map(field).unwrap_or("")
}

fn dimension_at(seq: &[VariableDescriptor], index: usize) -> Dimension {
    seq.get(index).map(|v| v.dimension).unwrap_or_default()
}

fn transfer_at(seq: &[VariableDescriptor], index: usize) -> TransferMode {
    seq.get(index).map(|v| v.transfer()).unwrap_or_default()
}

impl MetadataInfo {
    /// Creates an empty registry at the current schema version.
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            class: ClassDescriptor::default(),
            information: ModuleInformation::default(),
            parameters: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            in_outputs: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    // ------------------------------------------------------------------
    // Class and identity
    // ------------------------------------------------------------------

    pub fn set_class(&mut self, name: &str, description: &str) {
        self.class = ClassDescriptor {
            name: name.to_string(),
            description: description.to_string(),
        };
    }

    pub fn class(&self) -> &ClassDescriptor {
        &self.class
    }

    pub fn class_name(&self) -> &str {
        &self.class.name
    }

    pub fn class_description(&self) -> &str {
        &self.class.description
    }

    pub fn information(&self) -> &ModuleInformation {
        &self.information
    }

    pub fn set_id(&mut self, id: &str) {
        self.information.id = id.to_string();
    }

    pub fn id(&self) -> &str {
        &self.information.id
    }

    pub fn set_name(&mut self, name: &str) {
        self.information.name = name.to_string();
    }

    pub fn name(&self) -> &str {
        &self.information.name
    }

    pub fn set_description(&mut self, description: &str) {
        self.information.description = description.to_string();
    }

    pub fn description(&self) -> &str {
        &self.information.description
    }

    pub fn set_version(&mut self, version: &str) {
        self.information.version = version.to_string();
    }

    pub fn version(&self) -> &str {
        &self.information.version
    }

    pub fn set_author(&mut self, author: &str) {
        self.information.author = author.to_string();
    }

    pub fn author(&self) -> &str {
        &self.information.author
    }

    pub fn set_email(&mut self, email: &str) {
        self.information.email = email.to_string();
    }

    pub fn email(&self) -> &str {
        &self.information.email
    }

    pub fn set_website(&mut self, website: &str) {
        self.information.website = website.to_string();
    }

    pub fn website(&self) -> &str {
        &self.information.website
    }

    pub fn set_helpfile(&mut self, helpfile: &str) {
        self.information.helpfile = helpfile.to_string();
    }

    pub fn helpfile(&self) -> &str {
        &self.information.helpfile
    }

    // ------------------------------------------------------------------
    // Parameters (usually sourced from the parameter database)
    // ------------------------------------------------------------------

    /// Declares a parameter and returns its insertion index.
    pub fn add_parameter(&mut self, name: &str, units: &str, description: &str, source: &str, dimension: Dimension) -> usize {
        self.parameters.push(VariableDescriptor {
            name: name.to_string(),
            units: units.to_string(),
            description: description.to_string(),
            dimension,
            source: Some(source.to_string()),
            transfer: None,
        });
        self.parameters.len() - 1
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameters(&self) -> &[VariableDescriptor] {
        &self.parameters
    }

    pub fn parameter(&self, index: usize) -> VariableDescriptor {
        self.parameters.get(index).cloned().unwrap_or_default()
    }

    pub fn parameter_name(&self, index: usize) -> &str {
        text_at(&self.parameters, index, |v| v.name.as_str())
    }

    pub fn parameter_units(&self, index: usize) -> &str {
        text_at(&self.parameters, index, |v| v.units.as_str())
    }

    pub fn parameter_description(&self, index: usize) -> &str {
        text_at(&self.parameters, index, |v| v.description.as_str())
    }

    pub fn parameter_source(&self, index: usize) -> &str {
        text_at(&self.parameters, index, VariableDescriptor::source)
    }

    pub fn parameter_dimension(&self, index: usize) -> Dimension {
        dimension_at(&self.parameters, index)
    }

    // ------------------------------------------------------------------
    // Inputs produced by other modules
    // ------------------------------------------------------------------

    /// Declares an input and returns its insertion index.
    pub fn add_input(
        &mut self,
        name: &str,
        units: &str,
        description: &str,
        source: &str,
        dimension: Dimension,
        transfer: TransferMode,
    ) -> usize {
        self.inputs.push(VariableDescriptor {
            name: name.to_string(),
            units: units.to_string(),
            description: description.to_string(),
            dimension,
            source: Some(source.to_string()),
            transfer: Some(transfer),
        });
        self.inputs.len() - 1
    }

    /// Declares an input with whole-array transfer.
    pub fn add_input_whole(&mut self, name: &str, units: &str, description: &str, source: &str, dimension: Dimension) -> usize {
        self.add_input(name, units, description, source, dimension, TransferMode::Whole)
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn inputs(&self) -> &[VariableDescriptor] {
        &self.inputs
    }

    pub fn input(&self, index: usize) -> VariableDescriptor {
        self.inputs.get(index).cloned().unwrap_or_default()
    }

    pub fn input_name(&self, index: usize) -> &str {
        text_at(&self.inputs, index, |v| v.name.as_str())
    }

    pub fn input_units(&self, index: usize) -> &str {
        text_at(&self.inputs, index, |v| v.units.as_str())
    }

    pub fn input_description(&self, index: usize) -> &str {
        text_at(&self.inputs, index, |v| v.description.as_str())
    }

    pub fn input_source(&self, index: usize) -> &str {
        text_at(&self.inputs, index, VariableDescriptor::source)
    }

    pub fn input_dimension(&self, index: usize) -> Dimension {
        dimension_at(&self.inputs, index)
    }

    pub fn input_transfer(&self, index: usize) -> TransferMode {
        transfer_at(&self.inputs, index)
    }

    // ------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------

    /// Declares an output and returns its insertion index.
    pub fn add_output(&mut self, name: &str, units: &str, description: &str, dimension: Dimension, transfer: TransferMode) -> usize {
        self.outputs.push(VariableDescriptor {
            name: name.to_string(),
            units: units.to_string(),
            description: description.to_string(),
            dimension,
            source: None,
            transfer: Some(transfer),
        });
        self.outputs.len() - 1
    }

    /// Declares an output with whole-array transfer.
    pub fn add_output_whole(&mut self, name: &str, units: &str, description: &str, dimension: Dimension) -> usize {
        self.add_output(name, units, description, dimension, TransferMode::Whole)
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn outputs(&self) -> &[VariableDescriptor] {
        &self.outputs
    }

    pub fn output(&self, index: usize) -> VariableDescriptor {
        self.outputs.get(index).cloned().unwrap_or_default()
    }

    pub fn output_name(&self, index: usize) -> &str {
        text_at(&self.outputs, index, |v| v.name.as_str())
    }

    pub fn output_units(&self, index: usize) -> &str {
        text_at(&self.outputs, index, |v| v.units.as_str())
    }

    pub fn output_description(&self, index: usize) -> &str {
        text_at(&self.outputs, index, |v| v.description.as_str())
    }

    pub fn output_dimension(&self, index: usize) -> Dimension {
        dimension_at(&self.outputs, index)
    }

    pub fn output_transfer(&self, index: usize) -> TransferMode {
        transfer_at(&self.outputs, index)
    }

    // ------------------------------------------------------------------
    // In/outputs, read and updated in place
    // ------------------------------------------------------------------

    /// Declares an in/output and returns its insertion index.
    pub fn add_in_output(
        &mut self,
        name: &str,
        units: &str,
        description: &str,
        source: &str,
        dimension: Dimension,
        transfer: TransferMode,
    ) -> usize {
        self.in_outputs.push(VariableDescriptor {
            name: name.to_string(),
            units: units.to_string(),
            description: description.to_string(),
            dimension,
            source: Some(source.to_string()),
            transfer: Some(transfer),
        });
        self.in_outputs.len() - 1
    }

    pub fn in_output_count(&self) -> usize {
        self.in_outputs.len()
    }

    pub fn in_outputs(&self) -> &[VariableDescriptor] {
        &self.in_outputs
    }

    pub fn in_output(&self, index: usize) -> VariableDescriptor {
        self.in_outputs.get(index).cloned().unwrap_or_default()
    }

    pub fn in_output_name(&self, index: usize) -> &str {
        text_at(&self.in_outputs, index, |v| v.name.as_str())
    }

    pub fn in_output_units(&self, index: usize) -> &str {
        text_at(&self.in_outputs, index, |v| v.units.as_str())
    }

    pub fn in_output_description(&self, index: usize) -> &str {
        text_at(&self.in_outputs, index, |v| v.description.as_str())
    }

    pub fn in_output_source(&self, index: usize) -> &str {
        text_at(&self.in_outputs, index, VariableDescriptor::source)
    }

    pub fn in_output_dimension(&self, index: usize) -> Dimension {
        dimension_at(&self.in_outputs, index)
    }

    pub fn in_output_transfer(&self, index: usize) -> TransferMode {
        transfer_at(&self.in_outputs, index)
    }

    // ------------------------------------------------------------------
    // Dependencies on other module classes
    // ------------------------------------------------------------------

    /// Declares a dependency on another module class.
    pub fn add_dependency(&mut self, name: &str, description: &str) -> usize {
        self.dependencies.push(ClassDescriptor {
            name: name.to_string(),
            description: description.to_string(),
        });
        self.dependencies.len() - 1
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    pub fn dependencies(&self) -> &[ClassDescriptor] {
        &self.dependencies
    }

    pub fn dependency(&self, index: usize) -> ClassDescriptor {
        self.dependencies.get(index).cloned().unwrap_or_default()
    }

    pub fn dependency_name(&self, index: usize) -> &str {
        self.dependencies.get(index).map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn dependency_description(&self, index: usize) -> &str {
        self.dependencies.get(index).map(|c| c.description.as_str()).unwrap_or("")
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Reports names declared more than once within the same category.
    ///
    /// Which declaration a host binding reaches for a duplicated name is not
    /// defined by the contract; this only surfaces the ambiguity.
    pub fn duplicate_names(&self) -> Vec<DuplicateName> {
        let mut found = Vec::new();
        let variable_sets = [
            (Category::Parameter, &self.parameters),
            (Category::Input, &self.inputs),
            (Category::Output, &self.outputs),
            (Category::InOutput, &self.in_outputs),
        ];
        for (category, seq) in variable_sets {
            collect_duplicates(category, seq.iter().map(|v| v.name.as_str()), &mut found);
        }
        collect_duplicates(
            Category::Dependency,
            self.dependencies.iter().map(|c| c.name.as_str()),
            &mut found,
        );
        found
    }
}

fn collect_duplicates<'s>(category: Category, names: impl Iterator<Item = &'s str>, found: &mut Vec<DuplicateName>) {
    let mut seen: Vec<(&str, Vec<usize>)> = Vec::new();
    for (idx, name) in names.enumerate() {
        match seen.iter_mut().find(|(n, _)| *n == name) {
            Some((_, indices)) => indices.push(idx),
            None => seen.push((name, vec![idx])),
        }
    }
    found.extend(
        seen.into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(name, indices)| DuplicateName {
                category,
                name: name.to_string(),
                indices,
            }),
    );
}
