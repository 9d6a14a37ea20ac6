//! Model structures for rbvis.
//!
//! This crate provides the data a loaded model is made of:
//! - Mesh geometry with transformed parts, normals and bounds
//! - Mesh transforms (identity and per-subdomain affine)
//! - Solution fields (real, complex, displacement)
//! - Simulation results bundling fields and transforms

// Geometry code intentionally uses casts for indices and counts
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod field;
pub mod geometry;
pub mod simulation;
pub mod transform;

pub use field::{ComplexField, DisplacementField, LogicSolutionField, RealField, ValueRange};
pub use geometry::{GeometryData, MeshNormals, RawGeometry};
pub use simulation::SimulationResult;
pub use transform::{AffineLinearTransform, MeshTransform};
