//! Read-only frame view handed to a renderer.

use glam::{Vec3, Vec4};
use rbvis_render::{buffer, VisualFeature};

use crate::visualization::VisualizationData;

/// A renderer's window onto [`VisualizationData`]: a current frame and a selected feature.
///
/// The view only borrows the data and never modifies the geometry.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    data: &'a VisualizationData,
    frame: usize,
    feature: usize,
}

impl<'a> RenderView<'a> {
    /// Creates a view at frame 0 showing the first feature.
    pub fn new(data: &'a VisualizationData) -> Self {
        Self {
            data,
            frame: 0,
            feature: 0,
        }
    }

    pub fn data(&self) -> &'a VisualizationData {
        self.data
    }

    pub fn current_frame(&self) -> usize {
        self.frame
    }

    pub fn num_frames(&self) -> usize {
        self.data.num_frames().max(1)
    }

    /// Moves to the next frame, wrapping around after the last one.
    pub fn advance(&mut self) -> usize {
        self.frame = (self.frame + 1) % self.num_frames();
        self.frame
    }

    /// Jumps to a frame, wrapping out-of-range values.
    pub fn set_frame(&mut self, frame: usize) {
        self.frame = frame % self.num_frames();
    }

    /// Selects the feature to color the mesh with. Returns `false` for unknown indices.
    pub fn select_feature(&mut self, index: usize) -> bool {
        if index < self.data.features().len() {
            self.feature = index;
            true
        } else {
            false
        }
    }

    pub fn feature(&self) -> Option<&'a VisualFeature> {
        self.data.features().get(self.feature)
    }

    fn part_index(&self) -> usize {
        self.frame % self.data.geometry().num_parts().max(1)
    }

    /// Vertex positions of the current frame.
    pub fn vertices(&self) -> &'a [Vec3] {
        self.data.geometry().part(self.part_index()).unwrap_or_default()
    }

    /// Vertex normals of the current frame; empty for planar meshes.
    pub fn vertex_normals(&self) -> &'a [Vec3] {
        self.data.geometry().vertex_normals(self.part_index())
    }

    pub fn faces(&self) -> &'a [[u32; 3]] {
        self.data.geometry().faces()
    }

    pub fn wireframe(&self) -> &'a [[u32; 2]] {
        self.data.geometry().wireframe()
    }

    /// Per-vertex colors of the selected feature for the current frame.
    pub fn colors(&self) -> Option<&'a [Vec4]> {
        let feature = self.feature()?;
        let n = self.data.geometry().num_vertices();
        let frames = if n == 0 { 0 } else { feature.len() / n };
        if frames == 0 {
            return None;
        }
        feature.frame(self.frame % frames, n)
    }

    /// Vertex positions as a flat float slice.
    pub fn vertex_floats(&self) -> &'a [f32] {
        buffer::vec3_floats(self.vertices())
    }

    /// Vertex normals as a flat float slice.
    pub fn normal_floats(&self) -> &'a [f32] {
        buffer::vec3_floats(self.vertex_normals())
    }

    /// Current colors as a flat float slice.
    pub fn color_floats(&self) -> &'a [f32] {
        self.colors().map_or(&[][..], buffer::vec4_floats)
    }

    /// Face indices as a flat list.
    pub fn face_indices(&self) -> &'a [u32] {
        buffer::face_indices(self.faces())
    }

    /// Wireframe indices as a flat list.
    pub fn wireframe_indices(&self) -> &'a [u32] {
        buffer::edge_indices(self.wireframe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbvis_core::model::FieldDescriptor;
    use rbvis_render::ColorGenerator;
    use rbvis_structures::{GeometryData, MeshTransform, RealField, SimulationResult};

    fn data() -> VisualizationData {
        let geo = GeometryData::from_mesh(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 1.0)],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let mut result = SimulationResult::new(3);
        for _ in 0..3 {
            result.add_transform(MeshTransform::Identity);
        }
        let values: Vec<f32> = (0..9).map(|v| v as f32).collect();
        result.add_field(RealField::new(FieldDescriptor::real("u"), values)).unwrap();

        let mut vis = VisualizationData::new(geo);
        vis.use_result(result).unwrap();
        vis.compute_visual_features(&ColorGenerator::default()).unwrap();
        vis
    }

    #[test]
    fn test_advance_wraps() {
        let vis = data();
        let mut view = RenderView::new(&vis);
        assert_eq!(view.num_frames(), 3);
        assert_eq!(view.advance(), 1);
        assert_eq!(view.advance(), 2);
        assert_eq!(view.advance(), 0);
        view.set_frame(7);
        assert_eq!(view.current_frame(), 1);
    }

    #[test]
    fn test_frame_slices() {
        let vis = data();
        let mut view = RenderView::new(&vis);
        assert_eq!(view.vertices().len(), 3);
        assert_eq!(view.vertex_normals().len(), 3);
        assert_eq!(view.face_indices(), &[0, 1, 2]);
        assert_eq!(view.wireframe_indices().len(), 6);
        assert_eq!(view.vertex_floats().len(), 9);

        let first = view.colors().unwrap().to_vec();
        view.advance();
        let second = view.colors().unwrap();
        assert_eq!(second.len(), 3);
        assert_ne!(first, second);
        assert_eq!(view.color_floats().len(), 12);
    }

    #[test]
    fn test_feature_selection() {
        let vis = data();
        let mut view = RenderView::new(&vis);
        assert_eq!(view.feature().unwrap().name, "u");
        assert!(view.select_feature(0));
        assert!(!view.select_feature(1));
    }
}
