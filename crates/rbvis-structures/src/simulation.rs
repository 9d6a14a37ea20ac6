//! Simulation results: solution fields plus the mesh transforms of every part.

use rbvis_core::error::{RbvisError, Result};
use rbvis_render::FieldId;

use crate::field::LogicSolutionField;
use crate::transform::MeshTransform;

/// Output of one simulation run.
///
/// Fields are kept in insertion order and all have the same size.
#[derive(Debug, Clone, Default)]
pub struct SimulationResult {
    parts: usize,
    fields: Vec<LogicSolutionField>,
    transforms: Vec<MeshTransform>,
}

impl SimulationResult {
    /// Creates an empty result with the given number of parts.
    pub fn new(parts: usize) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    /// Appends a field, rejecting one whose size differs from the fields already present.
    pub fn add_field(&mut self, field: impl Into<LogicSolutionField>) -> Result<FieldId> {
        let field = field.into();
        if let Some(first) = self.fields.first() {
            if first.size() != field.size() {
                return Err(RbvisError::SizeMismatch {
                    expected: first.size(),
                    actual: field.size(),
                });
            }
        }
        self.fields.push(field);
        Ok(FieldId(self.fields.len() - 1))
    }

    /// Appends a mesh transform. Consistency is checked by [`validate`](Self::validate).
    pub fn add_transform(&mut self, transform: impl Into<MeshTransform>) {
        self.transforms.push(transform.into());
    }

    /// Checks that there is at least one part and one transform per part, or none at all.
    pub fn validate(&self) -> Result<()> {
        if self.parts == 0 {
            return Err(RbvisError::Format(
                "simulation result has no parts".to_string(),
            ));
        }
        if !self.transforms.is_empty() && self.transforms.len() != self.parts {
            return Err(RbvisError::SizeMismatch {
                expected: self.parts,
                actual: self.transforms.len(),
            });
        }
        Ok(())
    }

    /// Transforms for every part; identity for all parts when none were added.
    pub fn effective_transforms(&self) -> Vec<MeshTransform> {
        if self.transforms.is_empty() {
            vec![MeshTransform::Identity; self.parts]
        } else {
            self.transforms.clone()
        }
    }

    pub fn parts(&self) -> usize {
        self.parts
    }

    pub fn fields(&self) -> &[LogicSolutionField] {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> Option<&LogicSolutionField> {
        self.fields.get(id.0)
    }

    pub fn transforms(&self) -> &[MeshTransform] {
        &self.transforms
    }

    /// Consumes the result, returning its fields.
    pub fn into_fields(self) -> Vec<LogicSolutionField> {
        self.fields
    }

    /// Whether any field displaces the mesh.
    pub fn has_displacements(&self) -> bool {
        self.fields
            .iter()
            .any(|f| f.descriptor().field_type.is_displacement())
    }
}
