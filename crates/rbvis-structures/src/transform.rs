//! Mesh transforms mapping reference vertices to the vertices of one part.

use glam::{Mat3, Vec3};
use rbvis_core::codec::Matrix;
use rbvis_core::error::{RbvisError, Result};

/// Number of coefficients of one affine function: a row-major 3x3 matrix followed by a translation.
pub const AFFINE_COEFFICIENTS: usize = 12;

/// A stateless map from reference vertex positions to transformed positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MeshTransform {
    /// Copies the reference vertices.
    #[default]
    Identity,
    /// Applies one affine function per subdomain.
    AffineLinear(AffineLinearTransform),
}

impl MeshTransform {
    /// Transforms `reference`, selecting affine functions by the per-vertex subdomain index.
    ///
    /// Vertices without a subdomain entry use function 0.
    pub fn transform(&self, reference: &[Vec3], subdomains: &[u32]) -> Result<Vec<Vec3>> {
        match self {
            Self::Identity => Ok(reference.to_vec()),
            Self::AffineLinear(affine) => affine.transform(reference, subdomains),
        }
    }
}

impl From<AffineLinearTransform> for MeshTransform {
    fn from(value: AffineLinearTransform) -> Self {
        Self::AffineLinear(value)
    }
}

/// Per-subdomain affine functions `x' = A x + b`.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineLinearTransform {
    functions: Vec<(Mat3, Vec3)>,
}

impl AffineLinearTransform {
    /// Creates a transform from coefficient rows `[a00, a01, a02, a10, ..., a22, b0, b1, b2]`.
    pub fn new(functions: &[[f32; AFFINE_COEFFICIENTS]]) -> Self {
        let functions = functions
            .iter()
            .map(|f| {
                let mut m = [0.0; 9];
                m.copy_from_slice(&f[..9]);
                // Coefficients are row-major, glam is column-major.
                (Mat3::from_cols_array(&m).transpose(), Vec3::new(f[9], f[10], f[11]))
            })
            .collect();
        Self { functions }
    }

    /// Creates a transform from a matrix holding one 12-coefficient row per subdomain.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_matrix(matrix: &Matrix) -> Result<Self> {
        if matrix.cols() != AFFINE_COEFFICIENTS {
            return Err(RbvisError::SizeMismatch {
                expected: AFFINE_COEFFICIENTS,
                actual: matrix.cols(),
            });
        }
        let rows: Vec<[f32; AFFINE_COEFFICIENTS]> = matrix
            .iter_rows()
            .map(|row| {
                let mut coefficients = [0.0; AFFINE_COEFFICIENTS];
                for (c, &v) in coefficients.iter_mut().zip(row) {
                    *c = v as f32;
                }
                coefficients
            })
            .collect();
        Ok(Self::new(&rows))
    }

    /// Number of affine functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether no function is defined.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn transform(&self, reference: &[Vec3], subdomains: &[u32]) -> Result<Vec<Vec3>> {
        reference
            .iter()
            .enumerate()
            .map(|(vertex, &p)| {
                let function = subdomains.get(vertex).map_or(0, |&s| s as usize);
                let (a, b) =
                    self.functions
                        .get(function)
                        .ok_or(RbvisError::TransformFunction {
                            vertex,
                            function,
                            available: self.functions.len(),
                        })?;
                Ok(*a * p + *b)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIFT_X: [f32; 12] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0];

    #[test]
    fn test_identity_copies() {
        let verts = vec![Vec3::X, Vec3::Y];
        assert_eq!(MeshTransform::Identity.transform(&verts, &[]).unwrap(), verts);
    }

    #[test]
    fn test_row_major_coefficients() {
        // Rotation by 90 degrees about z: x' = -y, y' = x.
        let rot = [0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0];
        let t = MeshTransform::from(AffineLinearTransform::new(&[rot]));
        let out = t.transform(&[Vec3::new(1.0, 0.0, 0.0)], &[]).unwrap();
        assert_eq!(out, vec![Vec3::new(0.0, 1.0, 2.0)]);
    }

    #[test]
    fn test_subdomain_selection() {
        let scale = [2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0];
        let t = AffineLinearTransform::new(&[SHIFT_X, scale]);
        let out = MeshTransform::from(t)
            .transform(&[Vec3::ONE, Vec3::ONE, Vec3::ONE], &[0, 1])
            .unwrap();
        assert_eq!(out, vec![Vec3::new(2.0, 1.0, 1.0), Vec3::splat(2.0), Vec3::new(2.0, 1.0, 1.0)]);
    }

    #[test]
    fn test_missing_function() {
        let t = MeshTransform::from(AffineLinearTransform::new(&[SHIFT_X]));
        let err = t.transform(&[Vec3::ZERO, Vec3::ZERO], &[0, 3]).unwrap_err();
        assert!(matches!(
            err,
            RbvisError::TransformFunction { vertex: 1, function: 3, available: 1 }
        ));
    }

    #[test]
    fn test_from_matrix() {
        let data: Vec<f64> = SHIFT_X.iter().map(|&v| f64::from(v)).collect();
        let matrix = Matrix::new(1, 12, data).unwrap();
        let t = AffineLinearTransform::from_matrix(&matrix).unwrap();
        assert_eq!(t.len(), 1);

        let narrow = Matrix::new(1, 9, vec![0.0; 9]).unwrap();
        assert!(matches!(
            AffineLinearTransform::from_matrix(&narrow),
            Err(RbvisError::SizeMismatch { expected: 12, actual: 9 })
        ));
    }
}
