//! Configuration options for the visualization pipeline.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tolerance below which a value range counts as constant.
pub const CONSTANT_TOLERANCE: f32 = 1e-8;

/// Pipeline-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Alpha applied to every generated color; use 1.0 for non-blended rendering.
    pub alpha: f32,

    /// Color used for constant fields and meshes without field data.
    pub default_color: Vec3,

    /// Name of the color map used for scalar-to-color mapping.
    pub color_map: String,

    /// Range width below which a field is treated as constant.
    pub constant_tolerance: f32,

    /// When vertex normals are recomputed after mesh transforms.
    pub normal_policy: NormalPolicy,

    /// Displacements are divided by this value before being applied.
    pub displacement_scaling: f32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            alpha: 0.8,
            default_color: Vec3::new(0.0, 0.0, 1.0),
            color_map: "jet".to_string(),
            constant_tolerance: CONSTANT_TOLERANCE,
            normal_policy: NormalPolicy::default(),
            displacement_scaling: 1.0,
        }
    }
}

impl PipelineOptions {
    /// Parses options from JSON; absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Policy for recomputing normals once mesh transforms produced several parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NormalPolicy {
    /// Compute normals once, for the first (canonical) part only.
    #[default]
    Once,
    /// Compute a separate set of normals for every part.
    PerPart,
}
