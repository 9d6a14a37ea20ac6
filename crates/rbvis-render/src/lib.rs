//! Color mapping for rbvis.
//!
//! Turns scalar solution data into RGBA colors:
//! - [`ColorMap`] and the [`ColorMapRegistry`] of named maps
//! - [`ColorGenerator`] for value-to-color mapping with a constant-data shortcut
//! - [`element_to_vertex_colors`] for averaging face colors onto vertices
//! - [`VisualFeature`], the named color arrays handed to a renderer

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod color_generator;
pub mod color_maps;
pub mod visual_feature;

pub use color_generator::{element_to_vertex_colors, value_range, ColorGenerator};
pub use color_maps::{ColorMap, ColorMapRegistry, JET};
pub use visual_feature::{FieldId, VisualFeature};
