//! rbvis: a visualization pipeline for reduced-basis simulation models.
//!
//! A model directory holds a mesh plus solution fields computed offline.
//! rbvis loads both through a [`ModelSource`], applies the mesh transforms
//! and displacements of a [`SimulationResult`] and turns every field into
//! per-vertex colors a renderer can draw frame by frame.
//!
//! # Quick Start
//!
//! ```no_run
//! use rbvis::*;
//!
//! fn show_model(source: MemoryModelSource) -> Result<()> {
//!     init_logging();
//!     let mut loader = ModelLoader::new(source);
//!     loader.open_model("demo")?;
//!
//!     let geometry = loader.load_geometry()?;
//!     let field = loader.read_field(FieldDescriptor::real("temperature"), &["u.bin"])?;
//!
//!     let mut result = SimulationResult::new(1);
//!     result.add_field(field)?;
//!
//!     let mut data = VisualizationData::new(geometry);
//!     data.use_result(result)?;
//!     data.compute_visual_features(&ColorGenerator::default())?;
//!
//!     let mut view = RenderView::new(&data);
//!     let _colors = view.color_floats();
//!     view.advance();
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod loader;
pub mod view;
pub mod visualization;

// Re-export core types
pub use rbvis_core::{
    codec::{ByteOrder, Matrix},
    error::{RbvisError, Result},
    model::{FieldDescriptor, FieldMapping, ModelType, SolutionFieldType},
    options::{NormalPolicy, PipelineOptions},
    source::{LogProgress, MemoryModelSource, ModelMetadata, ModelSource, ProgressSink},
    Vec3, Vec4,
};

// Re-export color types
pub use rbvis_render::{ColorGenerator, ColorMap, ColorMapRegistry, FieldId, VisualFeature};

// Re-export structures
pub use rbvis_structures::{
    AffineLinearTransform, ComplexField, DisplacementField, GeometryData, LogicSolutionField,
    MeshTransform, RealField, SimulationResult,
};

pub use catalog::{scan_models, ModelDescriptor};
pub use loader::ModelLoader;
pub use view::RenderView;
pub use visualization::VisualizationData;

/// Initializes `env_logger` once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
    log::info!("rbvis {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Creates a color generator configured from pipeline options.
pub fn color_generator(options: &PipelineOptions) -> ColorGenerator {
    ColorGenerator::from_options(options, &ColorMapRegistry::new())
}

/// Loads the selected model's geometry and applies a simulation result to it.
pub fn visualize<S: ModelSource>(
    loader: &ModelLoader<S>,
    result: SimulationResult,
) -> Result<VisualizationData> {
    let options = loader.options();
    let mut data = VisualizationData::new(loader.load_geometry()?)
        .with_displacement_scaling(options.displacement_scaling);
    data.use_result(result)?;
    data.compute_visual_features(&color_generator(options))?;
    Ok(data)
}
