//! Scalar-to-RGBA color generation.

use glam::{Vec3, Vec4};
use rbvis_core::error::{RbvisError, Result};
use rbvis_core::options::{PipelineOptions, CONSTANT_TOLERANCE};

use crate::color_maps::{ColorMap, ColorMapRegistry};

/// Produces RGBA colors from scalar arrays using a color map.
///
/// Each value is normalized against the minimum and maximum of the array it
/// belongs to. Arrays whose range is narrower than the constant tolerance
/// are painted in the default color instead.
#[derive(Debug, Clone)]
pub struct ColorGenerator {
    color_map: ColorMap,
    alpha: f32,
    default_color: Vec3,
    constant_tolerance: f32,
}

impl Default for ColorGenerator {
    fn default() -> Self {
        Self {
            color_map: ColorMap::jet(),
            alpha: 0.8,
            default_color: Vec3::new(0.0, 0.0, 1.0),
            constant_tolerance: CONSTANT_TOLERANCE,
        }
    }
}

impl ColorGenerator {
    /// Creates a generator with the given color map and default settings.
    pub fn new(color_map: ColorMap) -> Self {
        Self {
            color_map,
            ..Self::default()
        }
    }

    /// Creates a generator configured from pipeline options.
    pub fn from_options(options: &PipelineOptions, registry: &ColorMapRegistry) -> Self {
        Self {
            color_map: registry.get_or_default(&options.color_map),
            alpha: options.alpha,
            default_color: options.default_color,
            constant_tolerance: options.constant_tolerance,
        }
    }

    /// Sets the alpha value.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Returns the color map.
    pub fn color_map(&self) -> &ColorMap {
        &self.color_map
    }

    /// Returns the alpha value applied to generated colors.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Returns the range width below which data counts as constant.
    pub fn constant_tolerance(&self) -> f32 {
        self.constant_tolerance
    }

    /// Returns the RGBA default color.
    pub fn default_rgba(&self) -> Vec4 {
        self.default_color.extend(self.alpha)
    }

    /// Returns `size` copies of the default color.
    pub fn default_colors(&self, size: usize) -> Vec<Vec4> {
        vec![self.default_rgba(); size]
    }

    /// Maps every value to an RGBA color.
    pub fn compute_colors(&self, values: &[f32]) -> Vec<Vec4> {
        let Some((min, max)) = value_range(values) else {
            return Vec::new();
        };
        let range = max - min;
        if range < self.constant_tolerance {
            return self.default_colors(values.len());
        }
        values
            .iter()
            .map(|&v| self.color_map.sample((v - min) / range).extend(self.alpha))
            .collect()
    }
}

/// Returns `(min, max)` of the values, or `None` for an empty slice.
pub fn value_range(values: &[f32]) -> Option<(f32, f32)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Converts per-face colors to per-vertex colors.
///
/// Every vertex receives the mean color of its adjacent faces. The input may
/// hold several frames of `faces.len()` colors each; the output then holds
/// the same number of frames of `num_vertices` colors. Vertices without any
/// adjacent face stay transparent black.
pub fn element_to_vertex_colors(
    face_colors: &[Vec4],
    faces: &[[u32; 3]],
    num_vertices: usize,
) -> Result<Vec<Vec4>> {
    if faces.is_empty() {
        return if face_colors.is_empty() {
            Ok(Vec::new())
        } else {
            Err(RbvisError::SizeMismatch {
                expected: 0,
                actual: face_colors.len(),
            })
        };
    }
    if face_colors.len() % faces.len() != 0 {
        return Err(RbvisError::SizeMismatch {
            expected: faces.len() * (face_colors.len() / faces.len() + 1),
            actual: face_colors.len(),
        });
    }
    if let Some(&bad) = faces.iter().flatten().find(|&&v| v as usize >= num_vertices) {
        return Err(RbvisError::IndexOutOfRange {
            index: bad as usize,
            len: num_vertices,
        });
    }

    let mut counts = vec![0u32; num_vertices];
    for face in faces {
        for &v in face {
            counts[v as usize] += 1;
        }
    }

    let frames = face_colors.len() / faces.len();
    let mut vertex_colors = vec![Vec4::ZERO; frames * num_vertices];
    for (frame_faces, frame_vertices) in face_colors
        .chunks_exact(faces.len())
        .zip(vertex_colors.chunks_exact_mut(num_vertices.max(1)))
    {
        for (face, &color) in faces.iter().zip(frame_faces) {
            for &v in face {
                frame_vertices[v as usize] += color;
            }
        }
        for (color, &count) in frame_vertices.iter_mut().zip(&counts) {
            if count > 0 {
                #[allow(clippy::cast_precision_loss)]
                let n = count as f32;
                *color /= n;
            }
        }
    }
    Ok(vertex_colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-6
    }

    #[test]
    fn test_ramp_colors() {
        let cg = ColorGenerator::default();
        let colors = cg.compute_colors(&[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(colors.len(), 4);
        assert!(close(colors[0], Vec4::new(0.0, 0.0, 0.5, 0.8)));
        assert!(close(colors[1], Vec4::new(0.0, (1.0 / 3.0 - 0.125) / 0.25, 1.0, 0.8)));
        assert!(close(colors[2], Vec4::new(1.0, 1.0 - (2.0 / 3.0 - 0.625) / 0.25, 0.0, 0.8)));
        assert!(close(colors[3], Vec4::new(0.5, 0.0, 0.0, 0.8)));
    }

    #[test]
    fn test_constant_values_use_default_color() {
        let cg = ColorGenerator::default().with_alpha(1.0);
        let colors = cg.compute_colors(&[4.2; 5]);
        assert_eq!(colors, vec![Vec4::new(0.0, 0.0, 1.0, 1.0); 5]);
    }

    #[test]
    fn test_empty_values() {
        assert!(ColorGenerator::default().compute_colors(&[]).is_empty());
        assert_eq!(value_range(&[]), None);
        assert_eq!(value_range(&[2.0, -1.0, 5.0]), Some((-1.0, 5.0)));
    }

    #[test]
    fn test_from_options() {
        let options = PipelineOptions {
            alpha: 0.5,
            color_map: "viridis".into(),
            ..Default::default()
        };
        let cg = ColorGenerator::from_options(&options, &ColorMapRegistry::new());
        assert_eq!(cg.color_map().name, "viridis");
        assert_eq!(cg.alpha(), 0.5);
        assert_eq!(cg.default_rgba(), Vec4::new(0.0, 0.0, 1.0, 0.5));
    }

    #[test]
    fn test_element_to_vertex_shared_edge() {
        // Square split along the 0-2 diagonal.
        let faces = [[0, 1, 2], [0, 2, 3]];
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let blue = Vec4::new(0.0, 0.0, 1.0, 0.5);
        let colors = element_to_vertex_colors(&[red, blue], &faces, 4).unwrap();

        let mean = (red + blue) / 2.0;
        assert!(close(colors[0], mean));
        assert!(close(colors[2], mean));
        assert_eq!(colors[1], red);
        assert_eq!(colors[3], blue);
    }

    #[test]
    fn test_element_to_vertex_frames() {
        let faces = [[0, 1, 2]];
        let frame0 = Vec4::splat(0.25);
        let frame1 = Vec4::splat(0.75);
        let colors = element_to_vertex_colors(&[frame0, frame1], &faces, 4).unwrap();
        assert_eq!(colors.len(), 8);
        assert_eq!(&colors[0..3], &[frame0; 3]);
        assert_eq!(colors[3], Vec4::ZERO);
        assert_eq!(&colors[4..7], &[frame1; 3]);
    }

    #[test]
    fn test_element_to_vertex_errors() {
        let faces = [[0, 1, 2], [0, 2, 3]];
        assert!(matches!(
            element_to_vertex_colors(&[Vec4::ONE; 3], &faces, 4),
            Err(RbvisError::SizeMismatch { .. })
        ));
        assert!(matches!(
            element_to_vertex_colors(&[Vec4::ONE; 2], &faces, 3),
            Err(RbvisError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }
}
