//! Derived mesh data: wireframe, normals and bounds.

use glam::Vec3;

/// Builds the wireframe: edges `(a, b)`, `(b, c)`, `(c, a)` for every face, in face order.
pub fn wireframe(faces: &[[u32; 3]]) -> Vec<[u32; 2]> {
    faces
        .iter()
        .flat_map(|&[a, b, c]| [[a, b], [b, c], [c, a]])
        .collect()
}

/// Computes unit face normals from the cross product of the edges leaving the first corner.
///
/// Degenerate faces get a zero normal.
pub fn face_normals(vertices: &[Vec3], faces: &[[u32; 3]]) -> Vec<Vec3> {
    faces
        .iter()
        .map(|&[a, b, c]| {
            let v0 = vertices[a as usize];
            let e1 = vertices[b as usize] - v0;
            let e2 = vertices[c as usize] - v0;
            e1.cross(e2).normalize_or_zero()
        })
        .collect()
}

/// Computes vertex normals as the renormalized mean of adjacent face normals.
///
/// Vertices referenced by no face get a zero normal.
pub fn vertex_normals(num_vertices: usize, faces: &[[u32; 3]], face_normals: &[Vec3]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; num_vertices];
    let mut counts = vec![0u32; num_vertices];

    for (face, &normal) in faces.iter().zip(face_normals) {
        for &vi in face {
            normals[vi as usize] += normal;
            counts[vi as usize] += 1;
        }
    }

    for (normal, &count) in normals.iter_mut().zip(&counts) {
        if count > 0 {
            *normal = (*normal / count as f32).normalize_or_zero();
        }
    }
    normals
}

/// Axis-aligned bounds over several vertex sets, `None` when there are no vertices.
pub fn bounds<'a>(sets: impl IntoIterator<Item = &'a [Vec3]>) -> Option<(Vec3, Vec3)> {
    sets.into_iter()
        .flatten()
        .fold(None, |acc, &p| match acc {
            None => Some((p, p)),
            Some((min, max)) => Some((min.min(p), max.max(p))),
        })
}

/// Largest axis extent of a bounding box.
pub fn box_size(min: Vec3, max: Vec3) -> f32 {
    (max - min).max_element().max(0.0)
}
