//! Mesh geometry for a loaded model.
//!
//! [`GeometryData`] keeps the reference vertex positions read from the model
//! and one transformed vertex set ("part") per frame. Every mutation of the
//! parts re-centers them on the origin and refreshes the bounding box.

pub mod compute;
pub mod loader;

use glam::Vec3;
use rbvis_core::error::{RbvisError, Result};
use rbvis_core::model::FieldMapping;
use rbvis_core::options::NormalPolicy;

use crate::field::DisplacementField;
use crate::transform::MeshTransform;

pub use loader::{parse_binary, parse_legacy, RawGeometry};

/// Face and vertex normals of one vertex set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshNormals {
    pub vertex: Vec<Vec3>,
    pub face: Vec<Vec3>,
}

impl MeshNormals {
    /// Computes the normals of `vertices`.
    pub fn compute(vertices: &[Vec3], faces: &[[u32; 3]]) -> Self {
        let face = compute::face_normals(vertices, faces);
        let vertex = compute::vertex_normals(vertices.len(), faces, &face);
        Self { vertex, face }
    }
}

/// Mesh topology, transformed vertex sets and derived render data.
#[derive(Debug, Clone)]
pub struct GeometryData {
    reference: Vec<Vec3>,
    parts: Vec<Vec<Vec3>>,
    faces: Vec<[u32; 3]>,
    wireframe: Vec<[u32; 2]>,
    edges: Option<Vec<[u32; 2]>>,
    normals: Vec<MeshNormals>,
    normal_policy: NormalPolicy,
    bounds: (Vec3, Vec3),
    box_size: f32,
    is_2d: bool,
    vertex_subdomains: Vec<u32>,
    face_subdomains: Vec<u32>,
    num_subdomains: usize,
    field_mapping: FieldMapping,
}

impl GeometryData {
    /// Validates raw geometry and computes wireframe, normals and bounds.
    ///
    /// The result holds a single part equal to the reference vertices.
    pub fn build(raw: RawGeometry, normal_policy: NormalPolicy) -> Result<Self> {
        let n = raw.vertices.len();
        if let Some(&bad) = raw.faces.iter().flatten().find(|&&i| i as usize >= n) {
            return Err(RbvisError::IndexOutOfRange {
                index: bad as usize,
                len: n,
            });
        }
        if let Some(&bad) = raw.edges.iter().flatten().flatten().find(|&&i| i as usize >= n) {
            return Err(RbvisError::IndexOutOfRange {
                index: bad as usize,
                len: n,
            });
        }
        if raw.vertex_subdomains.len() != n {
            return Err(RbvisError::SizeMismatch {
                expected: n,
                actual: raw.vertex_subdomains.len(),
            });
        }
        if raw.face_subdomains.len() != raw.faces.len() {
            return Err(RbvisError::SizeMismatch {
                expected: raw.faces.len(),
                actual: raw.face_subdomains.len(),
            });
        }

        let mut geometry = Self {
            parts: vec![raw.vertices.clone()],
            reference: raw.vertices,
            wireframe: compute::wireframe(&raw.faces),
            faces: raw.faces,
            edges: raw.edges,
            normals: Vec::new(),
            normal_policy,
            bounds: (Vec3::ZERO, Vec3::ZERO),
            box_size: 0.0,
            is_2d: raw.is_2d,
            vertex_subdomains: raw.vertex_subdomains,
            face_subdomains: raw.face_subdomains,
            num_subdomains: raw.num_subdomains,
            field_mapping: raw.field_mapping,
        };
        geometry.compute_normals();
        geometry.center();
        log::debug!(
            "built geometry: {} vertices, {} faces, 2D: {}, box size {}",
            geometry.num_vertices(),
            geometry.num_faces(),
            geometry.is_2d,
            geometry.box_size
        );
        Ok(geometry)
    }

    /// Builds a single-subdomain mesh; it is planar when every z is 0.
    pub fn from_mesh(vertices: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self> {
        let raw = RawGeometry {
            is_2d: vertices.iter().all(|v| v.z == 0.0),
            vertex_subdomains: vec![0; vertices.len()],
            face_subdomains: vec![0; faces.len()],
            num_subdomains: 1,
            vertices,
            faces,
            edges: None,
            field_mapping: FieldMapping::Vertex,
        };
        Self::build(raw, NormalPolicy::default())
    }

    // === Transforms and displacements ===

    /// Replaces all parts with one transformed copy of the reference vertices per transform.
    ///
    /// An empty list leaves a single untransformed part.
    pub fn apply_transforms(&mut self, transforms: &[MeshTransform]) -> Result<()> {
        log::debug!("applying {} mesh transforms", transforms.len());
        self.parts = if transforms.is_empty() {
            vec![self.reference.clone()]
        } else {
            transforms
                .iter()
                .map(|t| t.transform(&self.reference, &self.vertex_subdomains))
                .collect::<Result<_>>()?
        };
        self.compute_normals();
        self.center();
        Ok(())
    }

    /// Adds a displacement field to the parts, divided by `scaling`.
    ///
    /// The field holds one displacement per vertex and frame. A geometry with
    /// a single part is replicated to the number of frames first. Returns the
    /// number of frames.
    pub fn add_displacements(&mut self, field: &DisplacementField, scaling: f32) -> Result<usize> {
        if self.field_mapping != FieldMapping::Vertex {
            return Err(RbvisError::InvalidFieldMapping {
                mapping: self.field_mapping.to_string(),
                context: "displacements".to_string(),
            });
        }
        if !scaling.is_finite() || scaling == 0.0 {
            return Err(RbvisError::Format(format!(
                "invalid displacement scaling {scaling}"
            )));
        }
        let n = self.num_vertices();
        let size = field.size();
        if n == 0 || size == 0 || size % n != 0 {
            return Err(RbvisError::SizeMismatch {
                expected: n * self.parts.len(),
                actual: size,
            });
        }
        let frames = size / n;
        if self.parts.len() == 1 && frames > 1 {
            let first = self.parts[0].clone();
            self.parts.resize(frames, first);
        }
        if self.parts.len() != frames {
            return Err(RbvisError::SizeMismatch {
                expected: n * self.parts.len(),
                actual: size,
            });
        }

        log::debug!(
            "adding displacements '{}' to {frames} parts, scaling {scaling}",
            field.descriptor().name
        );
        let (x, y, z) = (field.x(), field.y(), field.z());
        for (p, part) in self.parts.iter_mut().enumerate() {
            for (v, vertex) in part.iter_mut().enumerate() {
                let idx = p * n + v;
                let dz = z.map_or(0.0, |z| z[idx]);
                *vertex += Vec3::new(x[idx], y[idx], dz) / scaling;
            }
        }
        self.compute_normals();
        self.center();
        Ok(frames)
    }

    /// Moves the bounding box center of all parts to the origin.
    pub fn center(&mut self) {
        let Some((min, max)) = compute::bounds(self.parts.iter().map(Vec::as_slice)) else {
            self.bounds = (Vec3::ZERO, Vec3::ZERO);
            self.box_size = 0.0;
            return;
        };
        let center = 0.5 * (min + max);
        for vertex in self.parts.iter_mut().flatten() {
            *vertex -= center;
        }
        self.bounds = (min - center, max - center);
        self.box_size = compute::box_size(min, max);
    }

    fn compute_normals(&mut self) {
        self.normals.clear();
        if self.is_2d || self.faces.is_empty() {
            return;
        }
        let parts = match self.normal_policy {
            NormalPolicy::Once => &self.parts[..self.parts.len().min(1)],
            NormalPolicy::PerPart => &self.parts[..],
        };
        self.normals = parts
            .iter()
            .map(|part| MeshNormals::compute(part, &self.faces))
            .collect();
    }

    // === Accessors ===

    pub fn num_vertices(&self) -> usize {
        self.reference.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    /// Untransformed vertex positions as read from the model.
    pub fn reference_vertices(&self) -> &[Vec3] {
        &self.reference
    }

    /// Vertex positions of one part.
    pub fn part(&self, index: usize) -> Option<&[Vec3]> {
        self.parts.get(index).map(Vec::as_slice)
    }

    pub fn parts(&self) -> &[Vec<Vec3>] {
        &self.parts
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Three edges per face, in face order.
    pub fn wireframe(&self) -> &[[u32; 2]] {
        &self.wireframe
    }

    /// Explicit edge list shipped with the model.
    pub fn edges(&self) -> Option<&[[u32; 2]]> {
        self.edges.as_deref()
    }

    /// Normals for a part; parts without their own normals share those of part 0.
    ///
    /// Empty for planar meshes and meshes without faces.
    pub fn normals(&self, part: usize) -> Option<&MeshNormals> {
        self.normals.get(part).or_else(|| self.normals.first())
    }

    pub fn vertex_normals(&self, part: usize) -> &[Vec3] {
        self.normals(part).map_or(&[][..], |n| n.vertex.as_slice())
    }

    pub fn face_normals(&self, part: usize) -> &[Vec3] {
        self.normals(part).map_or(&[][..], |n| n.face.as_slice())
    }

    /// Centered bounding box `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.bounds
    }

    /// Largest bounding box extent.
    pub fn box_size(&self) -> f32 {
        self.box_size
    }

    pub fn is_2d(&self) -> bool {
        self.is_2d
    }

    pub fn vertex_subdomains(&self) -> &[u32] {
        &self.vertex_subdomains
    }

    pub fn face_subdomains(&self) -> &[u32] {
        &self.face_subdomains
    }

    pub fn num_subdomains(&self) -> usize {
        self.num_subdomains
    }

    pub fn field_mapping(&self) -> FieldMapping {
        self.field_mapping
    }

    pub fn normal_policy(&self) -> NormalPolicy {
        self.normal_policy
    }

    /// Changes the normal policy and recomputes normals.
    pub fn set_normal_policy(&mut self, policy: NormalPolicy) {
        self.normal_policy = policy;
        self.compute_normals();
    }
}
