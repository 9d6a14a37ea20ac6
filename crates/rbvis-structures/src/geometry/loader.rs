//! Parsers for the two on-disk geometry layouts.
//!
//! Both return a [`RawGeometry`]; [`GeometryData::build`](super::GeometryData::build)
//! validates it and computes everything derived.

use std::str::{FromStr, SplitWhitespace};

use glam::Vec3;
use rbvis_core::error::{RbvisError, Result};
use rbvis_core::model::FieldMapping;

/// Name of the binary vertex resource.
pub const VERTICES_RESOURCE: &str = "vertices.bin";
/// Name of the binary face resource.
pub const FACES_RESOURCE: &str = "faces.bin";
/// Name of the binary edge resource.
pub const EDGES_RESOURCE: &str = "edges.bin";
/// Name of the legacy ASCII geometry resource.
pub const LEGACY_RESOURCE: &str = "geometry.dat";

/// Mesh data as read from a model, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGeometry {
    /// Vertex positions; 2D meshes have z = 0.
    pub vertices: Vec<Vec3>,
    /// Zero-based face triples.
    pub faces: Vec<[u32; 3]>,
    /// Explicit zero-based edge list, if the model ships one.
    pub edges: Option<Vec<[u32; 2]>>,
    /// Affine function index per vertex.
    pub vertex_subdomains: Vec<u32>,
    /// Subdomain per face.
    pub face_subdomains: Vec<u32>,
    /// Number of subdomains.
    pub num_subdomains: usize,
    /// Whether the mesh is planar.
    pub is_2d: bool,
    /// Mapping of the model's solution fields.
    pub field_mapping: FieldMapping,
}

/// Builds geometry from decoded binary resources.
///
/// `vertices` holds `(x, y)` pairs when `is_2d` is set and `(x, y, z)`
/// triples otherwise. Face and edge indices are 1-based.
pub fn parse_binary(
    vertices: &[f32],
    faces: Option<&[i16]>,
    edges: Option<&[i16]>,
    is_2d: bool,
) -> Result<RawGeometry> {
    let vertices: Vec<Vec3> = if is_2d {
        check_multiple(VERTICES_RESOURCE, vertices.len(), 2)?;
        vertices
            .chunks_exact(2)
            .map(|p| Vec3::new(p[0], p[1], 0.0))
            .collect()
    } else {
        check_multiple(VERTICES_RESOURCE, vertices.len(), 3)?;
        vertices.chunks_exact(3).map(Vec3::from_slice).collect()
    };

    let faces = match faces {
        Some(raw) => {
            check_multiple(FACES_RESOURCE, raw.len(), 3)?;
            raw.chunks_exact(3)
                .map(|f| Ok([one_based(f[0])?, one_based(f[1])?, one_based(f[2])?]))
                .collect::<Result<Vec<_>>>()?
        }
        None => Vec::new(),
    };

    let edges = match edges {
        Some(raw) => {
            check_multiple(EDGES_RESOURCE, raw.len(), 2)?;
            Some(
                raw.chunks_exact(2)
                    .map(|e| Ok([one_based(e[0])?, one_based(e[1])?]))
                    .collect::<Result<Vec<_>>>()?,
            )
        }
        None => None,
    };

    Ok(RawGeometry {
        vertex_subdomains: vec![0; vertices.len()],
        face_subdomains: vec![0; faces.len()],
        num_subdomains: 1,
        vertices,
        faces,
        edges,
        is_2d,
        field_mapping: FieldMapping::Vertex,
    })
}

/// Parses the legacy whitespace-separated geometry file.
///
/// Layout: vertex count, coordinates, subdomain count, face count, zero-based
/// face indices, one subdomain per vertex, one subdomain per face.
pub fn parse_legacy(text: &str) -> Result<RawGeometry> {
    let mut tokens = Tokens::new(text);

    let num_vertices: usize = tokens.next("vertex count")?;
    let mut vertices = Vec::with_capacity(num_vertices.min(1 << 20));
    for _ in 0..num_vertices {
        let x = tokens.next("vertex coordinate")?;
        let y = tokens.next("vertex coordinate")?;
        let z = tokens.next("vertex coordinate")?;
        vertices.push(Vec3::new(x, y, z));
    }

    let num_subdomains: usize = tokens.next("subdomain count")?;
    let num_faces: usize = tokens.next("face count")?;
    let mut faces = Vec::with_capacity(num_faces.min(1 << 20));
    for _ in 0..num_faces {
        faces.push([
            tokens.next("face index")?,
            tokens.next("face index")?,
            tokens.next("face index")?,
        ]);
    }

    let vertex_subdomains = (0..num_vertices)
        .map(|_| tokens.next("vertex subdomain"))
        .collect::<Result<Vec<u32>>>()?;
    let face_subdomains = (0..num_faces)
        .map(|_| tokens.next("face subdomain"))
        .collect::<Result<Vec<u32>>>()?;

    let is_2d = vertices.iter().all(|v| v.z == 0.0);
    Ok(RawGeometry {
        vertices,
        faces,
        edges: None,
        vertex_subdomains,
        face_subdomains,
        num_subdomains,
        is_2d,
        field_mapping: FieldMapping::Vertex,
    })
}

fn check_multiple(resource: &str, len: usize, stride: usize) -> Result<()> {
    if len % stride == 0 {
        Ok(())
    } else {
        Err(RbvisError::Format(format!(
            "{resource}: {len} values is not a multiple of {stride}"
        )))
    }
}

fn one_based(index: i16) -> Result<u32> {
    u32::try_from(i32::from(index) - 1)
        .map_err(|_| RbvisError::Format(format!("invalid 1-based index {index}")))
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
            position: 0,
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let position = self.position;
        self.position += 1;
        let token = self.inner.next().ok_or_else(|| {
            RbvisError::Format(format!(
                "{LEGACY_RESOURCE}: expected {what} at token {position}, found end of file"
            ))
        })?;
        token.parse().map_err(|_| {
            RbvisError::Format(format!(
                "{LEGACY_RESOURCE}: invalid {what} '{token}' at token {position}"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_binary_3d() {
        let raw = parse_binary(
            &[0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0],
            Some(&[1, 2, 3][..]),
            Some(&[1, 2, 2, 3][..]),
            false,
        )
        .unwrap();
        assert_eq!(raw.vertices[1], Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(raw.faces, vec![[0, 1, 2]]);
        assert_eq!(raw.edges, Some(vec![[0, 1], [1, 2]]));
        assert_eq!(raw.vertex_subdomains, vec![0; 3]);
        assert_eq!(raw.face_subdomains, vec![0]);
        assert!(!raw.is_2d);
    }

    #[test]
    fn test_binary_without_faces() {
        let raw = parse_binary(&[0.0, 1.0, 2.0, 3.0], None, None, true).unwrap();
        assert_eq!(raw.vertices.len(), 2);
        assert!(raw.faces.is_empty());
        assert!(raw.edges.is_none());
    }

    #[test]
    fn test_binary_errors() {
        assert!(matches!(
            parse_binary(&[0.0; 4], None, None, false),
            Err(RbvisError::Format(_))
        ));
        assert!(matches!(
            parse_binary(&[0.0; 6], Some(&[0, 1, 2][..]), None, true),
            Err(RbvisError::Format(_))
        ));
        assert!(matches!(
            parse_binary(&[0.0; 6], Some(&[1, 2][..]), None, true),
            Err(RbvisError::Format(_))
        ));
    }

    #[test]
    fn test_legacy() {
        let text = "4 0 0 0 1 0 0 1 1 0 0 1 0\n2 2\n0 1 2 0 2 3\n0 0 1 1\n0 1\n";
        let raw = parse_legacy(text).unwrap();
        assert_eq!(raw.vertices.len(), 4);
        assert_eq!(raw.vertices[2], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(raw.num_subdomains, 2);
        assert_eq!(raw.faces, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(raw.vertex_subdomains, vec![0, 0, 1, 1]);
        assert_eq!(raw.face_subdomains, vec![0, 1]);
        assert!(raw.is_2d);
    }

    #[test]
    fn test_legacy_3d_detection() {
        let raw = parse_legacy("1 0 0 0.5 1 0 0").unwrap();
        assert!(!raw.is_2d);
        assert_eq!(raw.vertices, vec![Vec3::new(0.0, 0.0, 0.5)]);
        assert!(raw.faces.is_empty());
        assert_eq!(raw.vertex_subdomains, vec![0]);
    }

    #[test]
    fn test_legacy_errors() {
        let err = parse_legacy("2 0 0 0").unwrap_err();
        assert!(err.to_string().contains("end of file"));
        let err = parse_legacy("1 0 0 x").unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }

    proptest! {
        /// Test planar vertex data is promoted to 3D with z = 0.
        #[test]
        fn prop_2d_promotion(coords in prop::collection::vec(-1e6f32..1e6, 0..64)) {
            let coords = &coords[..coords.len() / 2 * 2];
            let raw = parse_binary(coords, None, None, true).unwrap();
            let flat: Vec<f32> = raw.vertices.iter().flat_map(|v| v.to_array()).collect();
            prop_assert_eq!(flat.len(), coords.len() / 2 * 3);
            for (i, p) in raw.vertices.iter().enumerate() {
                prop_assert_eq!(p.x, coords[2 * i]);
                prop_assert_eq!(p.y, coords[2 * i + 1]);
                prop_assert_eq!(p.z, 0.0);
            }
        }
    }
}
