//! Loading models from a [`ModelSource`].

use std::io::Read;

use rbvis_core::codec::{read_f32_vector, read_f64_matrix, read_i16_vector};
use rbvis_core::error::{RbvisError, Result};
use rbvis_core::model::{FieldDescriptor, FieldMapping, ModelType};
use rbvis_core::options::PipelineOptions;
use rbvis_core::source::{ModelSource, ProgressSink};
use rbvis_structures::geometry::loader::{
    parse_binary, parse_legacy, EDGES_RESOURCE, FACES_RESOURCE, LEGACY_RESOURCE, VERTICES_RESOURCE,
};
use rbvis_structures::{AffineLinearTransform, GeometryData, LogicSolutionField, MeshTransform};

use crate::catalog::{self, ModelDescriptor};

/// Reads geometry, fields and transforms of the selected model.
///
/// Every resource opened through the loader is announced to all registered
/// progress sinks first.
pub struct ModelLoader<S> {
    source: S,
    sinks: Vec<Box<dyn ProgressSink>>,
    options: PipelineOptions,
}

impl<S: ModelSource> ModelLoader<S> {
    /// Creates a loader with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, PipelineOptions::default())
    }

    /// Creates a loader with the given options.
    pub fn with_options(source: S, options: PipelineOptions) -> Self {
        Self {
            source,
            sinks: Vec::new(),
            options,
        }
    }

    /// Registers a progress sink.
    pub fn add_sink(&mut self, sink: impl ProgressSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Selects a model directory.
    pub fn open_model(&mut self, dir: &str) -> Result<()> {
        self.source.open_model(dir)?;
        log::debug!(
            "opened model '{dir}' ({}, {:?})",
            self.source.model_type(),
            self.source.byte_order()
        );
        Ok(())
    }

    /// Lists the models the source provides, skipping unreadable ones.
    pub fn scan_models(&mut self) -> Result<Vec<ModelDescriptor>> {
        catalog::scan_models(&mut self.source)
    }

    /// Opens a resource of the selected model, notifying all sinks.
    pub fn open_resource(&self, name: &str) -> Result<Box<dyn Read + '_>> {
        for sink in &self.sinks {
            sink.notify(name);
        }
        self.source.open_resource(name)
    }

    /// Loads the geometry of the selected model.
    pub fn load_geometry(&self) -> Result<GeometryData> {
        let model_type = self.source.model_type();
        if model_type == ModelType::Unknown {
            let declared = self
                .source
                .resolve_attribute("type", None)
                .unwrap_or_else(|| model_type.to_string());
            return Err(RbvisError::UnknownModelType(declared));
        }
        let raw = if model_type.uses_legacy_geometry() {
            let mut text = String::new();
            self.open_resource(LEGACY_RESOURCE)?.read_to_string(&mut text)?;
            parse_legacy(&text)?
        } else {
            self.load_binary_geometry()?
        };
        GeometryData::build(raw, self.options.normal_policy)
    }

    fn load_binary_geometry(&self) -> Result<rbvis_structures::RawGeometry> {
        let order = self.source.byte_order();
        let vertices = read_f32_vector(self.open_resource(VERTICES_RESOURCE)?, order)?;
        let is_2d = self.source.resolve_tag("geometry.dimension").as_deref() == Some("2");

        let has_faces = self.source.resource_exists(FACES_RESOURCE)
            || self
                .source
                .resolve_tag("geometry.hasFaces")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
        let faces = if has_faces {
            Some(read_i16_vector(self.open_resource(FACES_RESOURCE)?, order)?)
        } else {
            None
        };
        let edges = if self.source.resource_exists(EDGES_RESOURCE) {
            Some(read_i16_vector(self.open_resource(EDGES_RESOURCE)?, order)?)
        } else {
            None
        };

        let mut raw = parse_binary(&vertices, faces.as_deref(), edges.as_deref(), is_2d)?;
        if let Some(mapping) = self.source.resolve_tag("geometry.fieldmapping") {
            raw.field_mapping = FieldMapping::parse(Some(&mapping));
        }
        Ok(raw)
    }

    /// Loads the geometry, logging failures instead of returning them.
    pub fn try_load_geometry(&self) -> Option<GeometryData> {
        match self.load_geometry() {
            Ok(geometry) => Some(geometry),
            Err(e) => {
                log::error!(
                    "loading geometry of model '{}' failed: {e}",
                    self.source.model_dir().unwrap_or("<none>")
                );
                None
            }
        }
    }

    /// Reads a solution field with one length-prefixed float vector per DoF resource.
    pub fn read_field(
        &self,
        descriptor: FieldDescriptor,
        resources: &[&str],
    ) -> Result<LogicSolutionField> {
        let order = self.source.byte_order();
        let dofs = resources
            .iter()
            .map(|name| read_f32_vector(self.open_resource(name)?, order))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("read {descriptor} from {} resources", dofs.len());
        LogicSolutionField::from_dofs(descriptor, dofs)
    }

    /// Reads an affine transform stored as a matrix with one 12-coefficient row per subdomain.
    pub fn read_affine_transform(&self, resource: &str) -> Result<MeshTransform> {
        let matrix = read_f64_matrix(self.open_resource(resource)?, self.source.byte_order())?;
        Ok(AffineLinearTransform::from_matrix(&matrix)?.into())
    }
}
