//! Solution fields: real, complex and displacement data attached to a mesh.

use glam::Vec3;
use rbvis_core::error::{RbvisError, Result};
use rbvis_core::model::{FieldDescriptor, FieldMapping, SolutionFieldType};
use rbvis_render::{ColorGenerator, FieldId, VisualFeature};

/// Running minimum and maximum of a value sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// Smallest value seen, `+inf` when empty.
    pub min: f32,
    /// Largest value seen, `-inf` when empty.
    pub max: f32,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl ValueRange {
    /// The range of no values.
    pub const EMPTY: Self = Self {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Range of a slice.
    pub fn of(values: &[f32]) -> Self {
        let mut range = Self::EMPTY;
        for &v in values {
            range.include(v);
        }
        range
    }

    /// Widens the range to contain `value`.
    pub fn include(&mut self, value: f32) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Smallest range containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Whether no value was included.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Whether the spread is below `tolerance`. Empty ranges are constant.
    pub fn is_constant(&self, tolerance: f32) -> bool {
        self.is_empty() || self.max - self.min < tolerance
    }
}

/// Overwrites `values[index]`, or appends when `index == values.len()`.
fn insert(values: &mut Vec<f32>, index: usize, value: f32) -> Result<()> {
    match index.cmp(&values.len()) {
        std::cmp::Ordering::Less => values[index] = value,
        std::cmp::Ordering::Equal => values.push(value),
        std::cmp::Ordering::Greater => {
            return Err(RbvisError::IndexOutOfRange {
                index,
                len: values.len(),
            })
        }
    }
    Ok(())
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index > len {
        Err(RbvisError::IndexOutOfRange { index, len })
    } else {
        Ok(())
    }
}

fn check_lengths(arrays: &[&[f32]]) -> Result<()> {
    let expected = arrays.first().map_or(0, |a| a.len());
    match arrays.iter().find(|a| a.len() != expected) {
        Some(bad) => Err(RbvisError::SizeMismatch {
            expected,
            actual: bad.len(),
        }),
        None => Ok(()),
    }
}

/// A single real value per DoF.
#[derive(Debug, Clone, PartialEq)]
pub struct RealField {
    descriptor: FieldDescriptor,
    values: Vec<f32>,
    range: ValueRange,
}

impl RealField {
    /// Creates a field from its values.
    pub fn new(descriptor: FieldDescriptor, values: Vec<f32>) -> Self {
        let range = ValueRange::of(&values);
        Self {
            descriptor,
            values,
            range,
        }
    }

    /// Sets or appends a value.
    pub fn set_value(&mut self, index: usize, value: f32) -> Result<()> {
        insert(&mut self.values, index, value)?;
        self.range.include(value);
        Ok(())
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }
}

/// Complex values with their norms.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexField {
    descriptor: FieldDescriptor,
    real: Vec<f32>,
    imaginary: Vec<f32>,
    norms: Vec<f32>,
    real_range: ValueRange,
    imaginary_range: ValueRange,
}

impl ComplexField {
    /// Creates a field from equally long real and imaginary parts.
    pub fn new(descriptor: FieldDescriptor, real: Vec<f32>, imaginary: Vec<f32>) -> Result<Self> {
        check_lengths(&[&real, &imaginary])?;
        let norms = real
            .iter()
            .zip(&imaginary)
            .map(|(re, im)| re.hypot(*im))
            .collect();
        Ok(Self {
            real_range: ValueRange::of(&real),
            imaginary_range: ValueRange::of(&imaginary),
            descriptor,
            real,
            imaginary,
            norms,
        })
    }

    /// Sets or appends a value and its norm.
    pub fn set_value(&mut self, index: usize, re: f32, im: f32) -> Result<()> {
        check_index(index, self.real.len())?;
        insert(&mut self.real, index, re)?;
        insert(&mut self.imaginary, index, im)?;
        insert(&mut self.norms, index, re.hypot(im))?;
        self.real_range.include(re);
        self.imaginary_range.include(im);
        Ok(())
    }

    /// Adds to an existing value.
    pub fn add_value(&mut self, index: usize, re: f32, im: f32) -> Result<()> {
        let (r0, i0) = match (self.real.get(index), self.imaginary.get(index)) {
            (Some(&r), Some(&i)) => (r, i),
            _ => {
                return Err(RbvisError::IndexOutOfRange {
                    index,
                    len: self.real.len(),
                })
            }
        };
        self.set_value(index, r0 + re, i0 + im)
    }

    pub fn real(&self) -> &[f32] {
        &self.real
    }

    pub fn imaginary(&self) -> &[f32] {
        &self.imaginary
    }

    /// `sqrt(re² + im²)` per value.
    pub fn norms(&self) -> &[f32] {
        &self.norms
    }

    pub fn real_range(&self) -> ValueRange {
        self.real_range
    }

    pub fn imaginary_range(&self) -> ValueRange {
        self.imaginary_range
    }
}

/// Per-vertex displacements in two or three dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacementField {
    descriptor: FieldDescriptor,
    x: Vec<f32>,
    y: Vec<f32>,
    z: Option<Vec<f32>>,
    range: ValueRange,
}

impl DisplacementField {
    /// Creates a field from its components.
    ///
    /// Displacements move vertices, so the descriptor must be vertex mapped.
    pub fn new(
        descriptor: FieldDescriptor,
        x: Vec<f32>,
        y: Vec<f32>,
        z: Option<Vec<f32>>,
    ) -> Result<Self> {
        if descriptor.mapping != FieldMapping::Vertex {
            return Err(RbvisError::InvalidFieldMapping {
                mapping: descriptor.mapping.to_string(),
                context: "displacement fields".to_string(),
            });
        }
        match &z {
            Some(z) => check_lengths(&[&x, &y, z])?,
            None => check_lengths(&[&x, &y])?,
        }
        let mut range = ValueRange::of(&x).union(ValueRange::of(&y));
        if let Some(z) = &z {
            range = range.union(ValueRange::of(z));
        }
        Ok(Self {
            descriptor,
            x,
            y,
            z,
            range,
        })
    }

    /// Sets or appends a displacement. Two-dimensional fields ignore `z`.
    pub fn set_displacement(&mut self, index: usize, d: Vec3) -> Result<()> {
        check_index(index, self.x.len())?;
        insert(&mut self.x, index, d.x)?;
        insert(&mut self.y, index, d.y)?;
        self.range.include(d.x);
        self.range.include(d.y);
        if let Some(z) = &mut self.z {
            insert(z, index, d.z)?;
            self.range.include(d.z);
        }
        Ok(())
    }

    /// Displacement of one DoF; z is 0 for two-dimensional fields.
    pub fn displacement(&self, index: usize) -> Option<Vec3> {
        let z = match &self.z {
            Some(z) => *z.get(index)?,
            None => 0.0,
        };
        Some(Vec3::new(*self.x.get(index)?, *self.y.get(index)?, z))
    }

    /// Number of components, 2 or 3.
    pub fn dimension(&self) -> usize {
        if self.z.is_some() {
            3
        } else {
            2
        }
    }

    pub fn x(&self) -> &[f32] {
        &self.x
    }

    pub fn y(&self) -> &[f32] {
        &self.y
    }

    pub fn z(&self) -> Option<&[f32]> {
        self.z.as_deref()
    }

    /// Range over all components.
    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn size(&self) -> usize {
        self.x.len()
    }
}

/// A solution field of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicSolutionField {
    Real(RealField),
    Complex(ComplexField),
    Displacement(DisplacementField),
}

impl LogicSolutionField {
    /// Builds a field from its DoF arrays, dispatching on the descriptor's type.
    pub fn from_dofs(descriptor: FieldDescriptor, dofs: Vec<Vec<f32>>) -> Result<Self> {
        let expected = descriptor.field_type.required_dof_fields();
        if dofs.len() != expected {
            return Err(RbvisError::ComponentCount {
                field_type: descriptor.field_type.to_string(),
                expected,
                actual: dofs.len(),
            });
        }
        let refs: Vec<&[f32]> = dofs.iter().map(Vec::as_slice).collect();
        check_lengths(&refs)?;

        let mut dofs = dofs.into_iter();
        let mut next = || dofs.next().unwrap_or_default();
        Ok(match descriptor.field_type {
            SolutionFieldType::RealValue => Self::Real(RealField::new(descriptor, next())),
            SolutionFieldType::ComplexValue => {
                let (re, im) = (next(), next());
                Self::Complex(ComplexField::new(descriptor, re, im)?)
            }
            SolutionFieldType::Displacement2D => {
                let (x, y) = (next(), next());
                Self::Displacement(DisplacementField::new(descriptor, x, y, None)?)
            }
            SolutionFieldType::Displacement3D => {
                let (x, y, z) = (next(), next(), next());
                Self::Displacement(DisplacementField::new(descriptor, x, y, Some(z))?)
            }
        })
    }

    /// An all-zero real field.
    pub fn zero_field(size: usize, mapping: FieldMapping) -> Self {
        let descriptor = FieldDescriptor::new(SolutionFieldType::RealValue, "zero", mapping);
        Self::Real(RealField::new(descriptor, vec![0.0; size]))
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        match self {
            Self::Real(f) => &f.descriptor,
            Self::Complex(f) => &f.descriptor,
            Self::Displacement(f) => &f.descriptor,
        }
    }

    /// Number of values per component.
    pub fn size(&self) -> usize {
        match self {
            Self::Real(f) => f.values.len(),
            Self::Complex(f) => f.real.len(),
            Self::Displacement(f) => f.x.len(),
        }
    }

    /// Whether every component spreads less than `tolerance`.
    pub fn is_constant(&self, tolerance: f32) -> bool {
        match self {
            Self::Real(f) => f.range.is_constant(tolerance),
            Self::Complex(f) => {
                f.real_range.is_constant(tolerance) && f.imaginary_range.is_constant(tolerance)
            }
            Self::Displacement(f) => f.range.is_constant(tolerance),
        }
    }

    pub fn as_displacement(&self) -> Option<&DisplacementField> {
        match self {
            Self::Displacement(f) => Some(f),
            _ => None,
        }
    }

    /// Colors every component of the field.
    pub fn visual_features(&self, cg: &ColorGenerator, source: Option<FieldId>) -> Vec<VisualFeature> {
        let name = &self.descriptor().name;
        let feature = |suffix: &str, values: &[f32]| {
            VisualFeature::new(format!("{name}{suffix}"), cg.compute_colors(values)).with_source(source)
        };
        match self {
            Self::Real(f) => vec![feature("", &f.values)],
            Self::Complex(f) => vec![
                feature(" (norms)", &f.norms),
                feature(" (real)", &f.real),
                feature(" (imag)", &f.imaginary),
            ],
            Self::Displacement(f) => {
                let mut features = vec![feature(" x displ", &f.x), feature(" y displ", &f.y)];
                if let Some(z) = f.z.as_deref().filter(|z| z.iter().any(|&v| v != 0.0)) {
                    features.push(feature(" z displ", z));
                }
                features
            }
        }
    }
}

impl From<RealField> for LogicSolutionField {
    fn from(value: RealField) -> Self {
        Self::Real(value)
    }
}

impl From<ComplexField> for LogicSolutionField {
    fn from(value: ComplexField) -> Self {
        Self::Complex(value)
    }
}

impl From<DisplacementField> for LogicSolutionField {
    fn from(value: DisplacementField) -> Self {
        Self::Displacement(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbvis_core::options::CONSTANT_TOLERANCE;

    fn displ(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(SolutionFieldType::Displacement3D, name, FieldMapping::Vertex)
    }

    #[test]
    fn test_real_field() {
        let field = LogicSolutionField::from_dofs(FieldDescriptor::real("u"), vec![vec![0.0, 1.0, 2.0, 3.0]])
            .unwrap();
        assert_eq!(field.size(), 4);
        assert!(!field.is_constant(CONSTANT_TOLERANCE));
        let LogicSolutionField::Real(real) = &field else {
            panic!("expected a real field");
        };
        assert_eq!(real.range(), ValueRange { min: 0.0, max: 3.0 });

        let features = field.visual_features(&ColorGenerator::default(), Some(FieldId(0)));
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "u");
        assert_eq!(features[0].source, Some(FieldId(0)));
        assert_eq!(features[0].len(), 4);
    }

    #[test]
    fn test_insertion() {
        let mut field = RealField::new(FieldDescriptor::real("u"), vec![]);
        assert_eq!(field.range(), ValueRange::EMPTY);
        field.set_value(0, 2.0).unwrap();
        field.set_value(1, -1.0).unwrap();
        field.set_value(0, 5.0).unwrap();
        assert_eq!(field.values(), &[5.0, -1.0]);
        assert_eq!(field.range().max, 5.0);
        assert_eq!(field.range().min, -1.0);
        assert!(matches!(
            field.set_value(3, 0.0),
            Err(RbvisError::IndexOutOfRange { index: 3, len: 2 })
        ));
    }

    #[test]
    fn test_empty_is_constant() {
        let field = LogicSolutionField::from(RealField::new(FieldDescriptor::real("u"), vec![]));
        assert!(field.is_constant(CONSTANT_TOLERANCE));
        assert!(LogicSolutionField::zero_field(8, FieldMapping::Vertex).is_constant(CONSTANT_TOLERANCE));
    }

    #[test]
    fn test_complex_field() {
        let descriptor = FieldDescriptor::new(SolutionFieldType::ComplexValue, "p", FieldMapping::Vertex);
        let field =
            LogicSolutionField::from_dofs(descriptor, vec![vec![3.0, 0.0], vec![4.0, 1.0]]).unwrap();
        let LogicSolutionField::Complex(complex) = &field else {
            panic!("expected a complex field");
        };
        assert_eq!(complex.norms(), &[5.0, 1.0]);

        let names: Vec<_> = field
            .visual_features(&ColorGenerator::default(), None)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["p (norms)", "p (real)", "p (imag)"]);
    }

    #[test]
    fn test_complex_insertion() {
        let descriptor = FieldDescriptor::new(SolutionFieldType::ComplexValue, "p", FieldMapping::Vertex);
        let mut field = ComplexField::new(descriptor, vec![1.0], vec![1.0]).unwrap();
        field.set_value(1, 0.0, 2.0).unwrap();
        field.add_value(0, 2.0, 3.0).unwrap();
        assert_eq!(field.real(), &[3.0, 0.0]);
        assert_eq!(field.imaginary(), &[4.0, 2.0]);
        assert_eq!(field.norms(), &[5.0, 2.0]);
        assert!(field.add_value(5, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_complex_constant_needs_both_parts() {
        let descriptor = FieldDescriptor::new(SolutionFieldType::ComplexValue, "p", FieldMapping::Vertex);
        let field = LogicSolutionField::from(
            ComplexField::new(descriptor, vec![1.0, 1.0], vec![0.0, 2.0]).unwrap(),
        );
        assert!(!field.is_constant(CONSTANT_TOLERANCE));
    }

    #[test]
    fn test_dof_count() {
        let descriptor = FieldDescriptor::new(SolutionFieldType::ComplexValue, "p", FieldMapping::Vertex);
        assert!(matches!(
            LogicSolutionField::from_dofs(descriptor, vec![vec![1.0]]),
            Err(RbvisError::ComponentCount { expected: 2, actual: 1, .. })
        ));
        assert!(matches!(
            LogicSolutionField::from_dofs(displ("d"), vec![vec![1.0], vec![1.0], vec![1.0, 2.0]]),
            Err(RbvisError::SizeMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_displacement_requires_vertex_mapping() {
        let descriptor =
            FieldDescriptor::new(SolutionFieldType::Displacement2D, "d", FieldMapping::Element);
        let err = LogicSolutionField::from_dofs(descriptor, vec![vec![0.0], vec![0.0]]).unwrap_err();
        assert!(matches!(err, RbvisError::InvalidFieldMapping { .. }));
    }

    #[test]
    fn test_displacement_features_omit_flat_z() {
        let cg = ColorGenerator::default();
        let flat = LogicSolutionField::from_dofs(
            displ("d"),
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 0.0]],
        )
        .unwrap();
        let names: Vec<_> = flat.visual_features(&cg, None).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["d x displ", "d y displ"]);

        let full = LogicSolutionField::from_dofs(
            displ("d"),
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 0.5]],
        )
        .unwrap();
        assert_eq!(full.visual_features(&cg, None).len(), 3);
    }

    #[test]
    fn test_set_displacement() {
        let mut field =
            DisplacementField::new(displ("d"), vec![], vec![], Some(vec![])).unwrap();
        field.set_displacement(0, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(field.displacement(0), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(field.range(), ValueRange { min: 1.0, max: 3.0 });
        assert_eq!(field.displacement(1), None);
        assert_eq!(field.dimension(), 3);
    }
}
