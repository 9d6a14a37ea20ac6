//! Flat float and index views for upload to a renderer.

use glam::{Vec3, Vec4};

/// Views positions or normals as `x, y, z, ...`.
pub fn vec3_floats(data: &[Vec3]) -> &[f32] {
    bytemuck::cast_slice(data)
}

/// Views colors as `r, g, b, a, ...`.
pub fn vec4_floats(data: &[Vec4]) -> &[f32] {
    bytemuck::cast_slice(data)
}

/// Views triangles as a flat index list.
pub fn face_indices(faces: &[[u32; 3]]) -> &[u32] {
    bytemuck::cast_slice(faces)
}

/// Views line segments as a flat index list.
pub fn edge_indices(edges: &[[u32; 2]]) -> &[u32] {
    bytemuck::cast_slice(edges)
}

/// Raw bytes of any plain-data slice.
pub fn as_bytes<T: bytemuck::Pod>(data: &[T]) -> &[u8] {
    bytemuck::cast_slice(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_views() {
        let positions = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)];
        assert_eq!(vec3_floats(&positions), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(face_indices(&[[0, 1, 2], [2, 3, 0]]), &[0, 1, 2, 2, 3, 0]);
        assert_eq!(edge_indices(&[[0, 1]]), &[0, 1]);
        assert_eq!(as_bytes(&[1u32]).len(), 4);
    }
}
