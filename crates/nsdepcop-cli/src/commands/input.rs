//! JSON dependency list produced by an extractor.

use nsdepcop_core::{AssemblyDependency, DependencyOccurrence, Location, TypeDependency};
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level input document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyList {
    /// Type-to-type references.
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    /// Assembly references.
    #[serde(default)]
    pub assemblies: Vec<AssemblyEntry>,
}

/// One type reference, optionally located in source.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeEntry {
    /// Namespace of the referencing type (empty for the global namespace).
    pub from_namespace: String,
    /// Referencing type name.
    pub from_type: String,
    /// Namespace of the referenced type.
    pub to_namespace: String,
    /// Referenced type name.
    pub to_type: String,
    /// Source file of the reference.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Line number (1-indexed).
    #[serde(default)]
    pub line: Option<usize>,
    /// Column number (1-indexed).
    #[serde(default)]
    pub column: Option<usize>,
}

/// One assembly reference.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssemblyEntry {
    /// Referencing assembly.
    pub from: String,
    /// Referenced assembly.
    pub to: String,
}

impl DependencyList {
    /// Parses a dependency list from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or has unknown fields.
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Converts the type entries into occurrences.
    ///
    /// A file without a line still gets a location at 1:1.
    #[must_use]
    pub fn occurrences(&self) -> Vec<DependencyOccurrence> {
        self.types
            .iter()
            .map(|entry| {
                let occurrence = DependencyOccurrence::new(TypeDependency::new(
                    &entry.from_namespace,
                    entry.from_type.as_str(),
                    &entry.to_namespace,
                    entry.to_type.as_str(),
                ));
                match &entry.file {
                    Some(file) => occurrence.at(Location::new(
                        file,
                        entry.line.unwrap_or(1),
                        entry.column.unwrap_or(1),
                    )),
                    None => occurrence,
                }
            })
            .collect()
    }

    /// Converts the assembly entries.
    #[must_use]
    pub fn assembly_dependencies(&self) -> Vec<AssemblyDependency> {
        self.assemblies
            .iter()
            .map(|entry| AssemblyDependency::new(&entry.from, &entry.to))
            .collect()
    }
}
