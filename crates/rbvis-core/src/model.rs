//! Model metadata types: model kinds, field types and field descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Known model kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelType {
    /// A model kind this library does not know.
    #[default]
    Unknown,
    /// A reduced-basis model with binary geometry.
    Jrb,
    /// A kernel-based reduced model with binary geometry.
    JKerMor,
    /// An old-format model with ASCII `geometry.dat` geometry.
    RbAppMit,
}

impl ModelType {
    /// Parses a model type name case-insensitively, returning `Unknown` on no match.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        [Self::Jrb, Self::JKerMor, Self::RbAppMit]
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value))
            .unwrap_or(Self::Unknown)
    }

    /// Returns the canonical name as written in model metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Jrb => "JRB",
            Self::JKerMor => "JKerMor",
            Self::RbAppMit => "rbappmit",
        }
    }

    /// Whether geometry for this model type is stored in the legacy ASCII file.
    pub fn uses_legacy_geometry(self) -> bool {
        self == Self::RbAppMit
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether field values attach to vertices or to elements (faces).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldMapping {
    /// One value per vertex (finite element style).
    Vertex,
    /// One value per element, the mean over a face (finite volume style).
    Element,
    /// Mapping not declared.
    #[default]
    Unknown,
}

impl FieldMapping {
    /// Parses a mapping name case-insensitively; missing or unrecognized values give `Unknown`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("vertex") => Self::Vertex,
            Some(v) if v.eq_ignore_ascii_case("element") => Self::Element,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FieldMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "VERTEX",
            Self::Element => "ELEMENT",
            Self::Unknown => "UNKNOWN",
        })
    }
}

/// The logical kind of a solution field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SolutionFieldType {
    /// Plain real values.
    #[default]
    RealValue,
    /// Complex values, stored as separate real and imaginary arrays.
    ComplexValue,
    /// x/y displacements.
    Displacement2D,
    /// x/y/z displacements.
    Displacement3D,
}

impl SolutionFieldType {
    /// Number of DoF arrays a field of this type is built from.
    pub fn required_dof_fields(self) -> usize {
        match self {
            Self::RealValue => 1,
            Self::ComplexValue | Self::Displacement2D => 2,
            Self::Displacement3D => 3,
        }
    }

    /// Whether this type describes a displacement field.
    pub fn is_displacement(self) -> bool {
        matches!(self, Self::Displacement2D | Self::Displacement3D)
    }
}

impl fmt::Display for SolutionFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RealValue => "RealValue",
            Self::ComplexValue => "ComplexValue",
            Self::Displacement2D => "Displacement2D",
            Self::Displacement3D => "Displacement3D",
        })
    }
}

/// Describes a logical solution field: its type, name and value mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// The logical field type.
    pub field_type: SolutionFieldType,
    /// Display name.
    pub name: String,
    /// Whether values attach to vertices or elements.
    pub mapping: FieldMapping,
}

impl FieldDescriptor {
    /// Creates a descriptor.
    pub fn new(field_type: SolutionFieldType, name: impl Into<String>, mapping: FieldMapping) -> Self {
        Self {
            field_type,
            name: name.into(),
            mapping,
        }
    }

    /// A vertex-mapped real field descriptor.
    pub fn real(name: impl Into<String>) -> Self {
        Self::new(SolutionFieldType::RealValue, name, FieldMapping::Vertex)
    }

    /// Returns the name used for display, substituting a placeholder for empty names.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "(no name)"
        } else {
            &self.name
        }
    }
}

impl Default for FieldDescriptor {
    fn default() -> Self {
        Self::real("Default real valued field")
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FieldDescriptor {} (Type {}, mapping {})",
            self.name, self.field_type, self.mapping
        )
    }
}
