//! Visual features: named per-element color arrays derived from solution fields.

use glam::Vec4;

/// Index of a solution field within the result that produced a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub usize);

/// A named, renderable color array.
///
/// Colors hold one RGBA value per vertex or per face, possibly for several
/// frames laid out back to back.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualFeature {
    /// Display name.
    pub name: String,
    /// RGBA colors.
    pub colors: Vec<Vec4>,
    /// Field this feature was generated from, if any.
    pub source: Option<FieldId>,
}

impl VisualFeature {
    /// Creates a feature with no source field.
    pub fn new(name: impl Into<String>, colors: Vec<Vec4>) -> Self {
        Self {
            name: name.into(),
            colors,
            source: None,
        }
    }

    /// Attaches the originating field.
    #[must_use]
    pub fn with_source(mut self, source: Option<FieldId>) -> Self {
        self.source = source;
        self
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the feature holds no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colors of one frame, `None` past the last frame.
    pub fn frame(&self, frame: usize, frame_len: usize) -> Option<&[Vec4]> {
        let start = frame.checked_mul(frame_len)?;
        self.colors.get(start..start.checked_add(frame_len)?)
    }

    /// Colors as a flat `r, g, b, a, ...` slice.
    pub fn as_floats(&self) -> &[f32] {
        crate::buffer::vec4_floats(&self.colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames() {
        let feature = VisualFeature::new("u", vec![Vec4::ZERO, Vec4::ONE, Vec4::X, Vec4::Y])
            .with_source(Some(FieldId(2)));
        assert_eq!(feature.source, Some(FieldId(2)));
        assert_eq!(feature.frame(1, 2), Some(&[Vec4::X, Vec4::Y][..]));
        assert_eq!(feature.frame(2, 2), None);
        assert_eq!(feature.as_floats().len(), 16);
        assert_eq!(feature.as_floats()[4..8], [1.0; 4]);
    }
}
