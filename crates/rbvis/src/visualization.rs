//! Geometry combined with a simulation result, ready for rendering.

use rbvis_core::error::{RbvisError, Result};
use rbvis_core::model::FieldMapping;
use rbvis_render::{element_to_vertex_colors, ColorGenerator, FieldId, VisualFeature};
use rbvis_structures::{GeometryData, LogicSolutionField, SimulationResult};

/// Name of the feature shown when a result has no fields.
pub const NO_FIELD_DATA: &str = "No field data";

/// A model's geometry together with the fields of one simulation result.
#[derive(Debug, Clone)]
pub struct VisualizationData {
    geometry: GeometryData,
    fields: Vec<LogicSolutionField>,
    features: Vec<VisualFeature>,
    num_frames: usize,
    displacement_scaling: f32,
}

impl VisualizationData {
    /// Wraps loaded geometry; displacements are applied unscaled.
    pub fn new(geometry: GeometryData) -> Self {
        Self {
            num_frames: geometry.num_parts(),
            geometry,
            fields: Vec::new(),
            features: Vec::new(),
            displacement_scaling: 1.0,
        }
    }

    /// Sets the divisor applied to displacement fields.
    #[must_use]
    pub fn with_displacement_scaling(mut self, scaling: f32) -> Self {
        self.displacement_scaling = scaling;
        self
    }

    /// Applies a simulation result to the geometry.
    ///
    /// Runs the result's mesh transforms, adds its displacement fields and
    /// checks that every field covers the same number of frames. On error the
    /// data is left as it was.
    pub fn use_result(&mut self, result: SimulationResult) -> Result<()> {
        result.validate()?;
        let mut geometry = self.geometry.clone();
        geometry.apply_transforms(&result.effective_transforms())?;

        let mut num_frames = 0;
        for field in result.fields() {
            let frames = match field.as_displacement() {
                Some(d) => geometry.add_displacements(d, self.displacement_scaling)?,
                None => frames_of(&geometry, field)?,
            };
            log::debug!(
                "field '{}' ({}) spans {frames} frames",
                field.descriptor().name,
                field.descriptor().field_type
            );
            if num_frames == 0 {
                num_frames = frames;
            } else if frames != num_frames {
                return Err(RbvisError::FrameMismatch {
                    field: field.descriptor().name.clone(),
                    expected: num_frames,
                    actual: frames,
                });
            }
        }

        self.num_frames = if result.fields().is_empty() {
            geometry.num_parts()
        } else {
            num_frames
        };
        self.geometry = geometry;
        self.fields = result.into_fields();
        self.features.clear();
        Ok(())
    }

    /// Recomputes the visual features of all fields.
    ///
    /// Constant fields get the default color. Element-mapped colors are
    /// averaged onto the vertices.
    pub fn compute_visual_features(&mut self, cg: &ColorGenerator) -> Result<()> {
        let mut features = Vec::new();
        if self.fields.is_empty() {
            log::warn!(
                "no solution fields given, using default colors for {} vertices",
                self.geometry.num_vertices()
            );
            features.push(VisualFeature::new(
                NO_FIELD_DATA,
                cg.default_colors(self.geometry.num_vertices()),
            ));
        }

        for (i, field) in self.fields.iter().enumerate() {
            let descriptor = field.descriptor();
            let source = Some(FieldId(i));
            let field_features = if field.is_constant(cg.constant_tolerance()) {
                log::debug!("using default colors for constant field '{}'", descriptor.name);
                vec![VisualFeature::new(
                    format!("{} (constant)", descriptor.name),
                    cg.default_colors(field.size()),
                )
                .with_source(source)]
            } else {
                field.visual_features(cg, source)
            };

            for mut feature in field_features {
                if descriptor.mapping == FieldMapping::Element {
                    feature.colors = element_to_vertex_colors(
                        &feature.colors,
                        self.geometry.faces(),
                        self.geometry.num_vertices(),
                    )?;
                }
                features.push(feature);
            }
        }
        self.features = features;
        Ok(())
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.geometry
    }

    pub fn fields(&self) -> &[LogicSolutionField] {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> Option<&LogicSolutionField> {
        self.fields.get(id.0)
    }

    /// Features from the last [`compute_visual_features`](Self::compute_visual_features).
    pub fn features(&self) -> &[VisualFeature] {
        &self.features
    }

    /// Number of frames the fields span.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }
}

fn frames_of(geometry: &GeometryData, field: &LogicSolutionField) -> Result<usize> {
    let per_frame = match field.descriptor().mapping {
        FieldMapping::Element => geometry.num_faces(),
        _ => geometry.num_vertices(),
    };
    if per_frame == 0 || field.size() % per_frame != 0 {
        return Err(RbvisError::SizeMismatch {
            expected: per_frame,
            actual: field.size(),
        });
    }
    Ok(field.size() / per_frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};
    use rbvis_core::model::{FieldDescriptor, SolutionFieldType};
    use rbvis_structures::{DisplacementField, MeshTransform, RealField};

    fn square() -> GeometryData {
        GeometryData::from_mesh(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    fn element(name: &str, values: Vec<f32>) -> RealField {
        RealField::new(
            FieldDescriptor::new(SolutionFieldType::RealValue, name, FieldMapping::Element),
            values,
        )
    }

    #[test]
    fn test_no_fields() {
        let mut vis = VisualizationData::new(square());
        vis.use_result(SimulationResult::new(1)).unwrap();
        vis.compute_visual_features(&ColorGenerator::default()).unwrap();
        assert_eq!(vis.features().len(), 1);
        assert_eq!(vis.features()[0].name, NO_FIELD_DATA);
        assert_eq!(vis.features()[0].len(), 4);
        assert_eq!(vis.num_frames(), 1);
    }

    #[test]
    fn test_constant_field() {
        let mut result = SimulationResult::new(1);
        result.add_field(RealField::new(FieldDescriptor::real("T"), vec![2.0; 4])).unwrap();
        let mut vis = VisualizationData::new(square());
        vis.use_result(result).unwrap();
        let cg = ColorGenerator::default();
        vis.compute_visual_features(&cg).unwrap();
        assert_eq!(vis.features()[0].name, "T (constant)");
        assert_eq!(vis.features()[0].colors, vec![cg.default_rgba(); 4]);
        assert_eq!(vis.features()[0].source, Some(FieldId(0)));
    }

    #[test]
    fn test_element_field_mapped_to_vertices() {
        let mut result = SimulationResult::new(1);
        result.add_field(element("e", vec![0.0, 1.0, 1.0, 0.0])).unwrap();
        let mut vis = VisualizationData::new(square());
        vis.use_result(result).unwrap();
        assert_eq!(vis.num_frames(), 2);

        vis.compute_visual_features(&ColorGenerator::default().with_alpha(1.0)).unwrap();
        let colors = &vis.features()[0].colors;
        assert_eq!(colors.len(), 8);
        let low = Vec4::new(0.0, 0.0, 0.5, 1.0);
        let high = Vec4::new(0.5, 0.0, 0.0, 1.0);
        // Frame 0: face 0 low, face 1 high.
        assert_eq!(colors[1], low);
        assert_eq!(colors[3], high);
        assert_eq!(colors[0], (low + high) / 2.0);
        // Frame 1 swaps them.
        assert_eq!(colors[5], high);
        assert_eq!(colors[7], low);
    }

    #[test]
    fn test_frame_mismatch() {
        let mut result = SimulationResult::new(1);
        result.add_field(element("e", vec![0.0, 1.0, 2.0, 3.0])).unwrap();
        result.add_field(RealField::new(FieldDescriptor::real("v"), vec![0.0, 1.0, 2.0, 3.0])).unwrap();
        let mut vis = VisualizationData::new(square());
        assert!(matches!(
            vis.use_result(result),
            Err(RbvisError::FrameMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_transforms_and_displacements() {
        let mut result = SimulationResult::new(2);
        result.add_transform(MeshTransform::Identity);
        result.add_transform(MeshTransform::Identity);
        let descriptor =
            FieldDescriptor::new(SolutionFieldType::Displacement2D, "d", FieldMapping::Vertex);
        let mut x = vec![0.0; 4];
        x.extend([1.0; 4]);
        result
            .add_field(DisplacementField::new(descriptor, x, vec![0.0; 8], None).unwrap())
            .unwrap();

        let mut vis = VisualizationData::new(square()).with_displacement_scaling(0.5);
        vis.use_result(result).unwrap();
        assert_eq!(vis.num_frames(), 2);
        let geo = vis.geometry();
        assert_eq!(geo.part(1).unwrap()[0] - geo.part(0).unwrap()[0], Vec3::new(2.0, 0.0, 0.0));

        vis.compute_visual_features(&ColorGenerator::default()).unwrap();
        let names: Vec<_> = vis.features().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["d x displ", "d y displ"]);
    }

    #[test]
    fn test_failed_result_keeps_previous_state() {
        let mut vis = VisualizationData::new(square());
        let mut first = SimulationResult::new(1);
        first.add_field(RealField::new(FieldDescriptor::real("T"), vec![0.0, 1.0, 2.0, 3.0])).unwrap();
        vis.use_result(first).unwrap();
        vis.compute_visual_features(&ColorGenerator::default()).unwrap();
        let before = vis.geometry().parts().to_vec();

        // Two displacement frames against four element frames.
        let mut second = SimulationResult::new(1);
        let descriptor =
            FieldDescriptor::new(SolutionFieldType::Displacement2D, "d", FieldMapping::Vertex);
        second
            .add_field(DisplacementField::new(descriptor, vec![5.0; 8], vec![0.0; 8], None).unwrap())
            .unwrap();
        second.add_field(element("e", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])).unwrap();

        assert!(matches!(
            vis.use_result(second),
            Err(RbvisError::FrameMismatch { expected: 2, actual: 4, .. })
        ));
        assert_eq!(vis.geometry().num_parts(), 1);
        assert_eq!(vis.geometry().parts(), before.as_slice());
        assert_eq!(vis.num_frames(), 1);
        assert_eq!(vis.fields().len(), 1);
        assert_eq!(vis.fields()[0].descriptor().name, "T");
        assert_eq!(vis.features().len(), 1);
    }

    #[test]
    fn test_invalid_result() {
        let mut result = SimulationResult::new(2);
        result.add_transform(MeshTransform::Identity);
        assert!(VisualizationData::new(square()).use_result(result).is_err());
    }
}
