//! Model sources and progress reporting.
//!
//! A [`ModelSource`] gives access to a collection of model directories. Each
//! directory holds one model: a metadata document plus binary or text
//! resources. Transport (filesystem, web, asset bundles) and the metadata
//! format are up to the implementation; the pipeline only relies on this trait.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use serde::{Deserialize, Serialize};

use crate::codec::ByteOrder;
use crate::error::{RbvisError, Result};
use crate::model::ModelType;

/// Access to model directories, their metadata and their resources.
pub trait ModelSource {
    /// Selects `dir` as the current model, reading its metadata.
    ///
    /// On failure the previously selected model stays selected.
    fn open_model(&mut self, dir: &str) -> Result<()>;

    /// Returns the currently selected model directory.
    fn model_dir(&self) -> Option<&str>;

    /// Returns the text content of a dotted metadata tag path such as `geometry.dimension`.
    fn resolve_tag(&self, path: &str) -> Option<String>;

    /// Returns an attribute of the root model tag, or of `tag` if given.
    fn resolve_attribute(&self, name: &str, tag: Option<&str>) -> Option<String>;

    /// Whether a metadata tag exists.
    fn tag_exists(&self, path: &str) -> bool;

    /// Opens a resource of the current model for reading.
    fn open_resource(&self, name: &str) -> Result<Box<dyn Read + '_>>;

    /// Whether the current model provides the named resource.
    fn resource_exists(&self, name: &str) -> bool;

    /// Lists all model directories; they are not validated.
    fn list_model_directories(&self) -> Result<Vec<String>>;

    /// Byte order of the current model's binary resources.
    fn byte_order(&self) -> ByteOrder {
        ByteOrder::from_machine_format(self.resolve_attribute("machformat", None).as_deref())
    }

    /// Kind of the current model.
    fn model_type(&self) -> ModelType {
        self.resolve_attribute("type", None)
            .map_or(ModelType::Unknown, |t| ModelType::parse(&t))
    }
}

/// Receives a notification whenever a resource stream is opened.
pub trait ProgressSink {
    /// Called with the resource name before the stream is opened.
    fn notify(&self, resource: &str);
}

impl<F: Fn(&str)> ProgressSink for F {
    fn notify(&self, resource: &str) {
        self(resource);
    }
}

/// A progress sink that writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn notify(&self, resource: &str) {
        log::debug!("loading resource '{resource}'");
    }
}

/// Name of the metadata document read by [`MemoryModelSource`].
pub const METADATA_RESOURCE: &str = "model.json";

/// Model metadata as stored in a `model.json` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMetadata {
    /// Attributes of the root model tag (`type`, `title`, `machformat`, ...).
    pub attributes: BTreeMap<String, String>,
    /// Text content per dotted tag path.
    pub tags: BTreeMap<String, String>,
    /// Attributes per dotted tag path.
    pub tag_attributes: BTreeMap<String, BTreeMap<String, String>>,
}

impl ModelMetadata {
    /// Creates metadata for a model of the given type.
    pub fn new(model_type: ModelType) -> Self {
        let mut meta = Self::default();
        meta.attributes
            .insert("type".to_string(), model_type.as_str().to_string());
        meta
    }

    /// Sets a root attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the text of a tag.
    #[must_use]
    pub fn with_tag(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(path.into(), value.into());
        self
    }
}

/// An in-memory model source; each model directory is a map of named resources.
#[derive(Debug, Default)]
pub struct MemoryModelSource {
    models: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    current: Option<(String, ModelMetadata)>,
}

impl MemoryModelSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model directory with the given metadata.
    pub fn insert_model(&mut self, dir: impl Into<String>, metadata: &ModelMetadata) -> Result<()> {
        let json = serde_json::to_vec_pretty(metadata)?;
        self.insert_resource(dir, METADATA_RESOURCE, json);
        Ok(())
    }

    /// Adds (or replaces) a resource in a model directory, creating the directory if needed.
    pub fn insert_resource(
        &mut self,
        dir: impl Into<String>,
        name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) {
        self.models
            .entry(dir.into())
            .or_default()
            .insert(name.into(), bytes.into());
    }

    fn current_files(&self) -> Option<&BTreeMap<String, Vec<u8>>> {
        let (dir, _) = self.current.as_ref()?;
        self.models.get(dir)
    }

    fn metadata(&self) -> Option<&ModelMetadata> {
        self.current.as_ref().map(|(_, m)| m)
    }
}

impl ModelSource for MemoryModelSource {
    fn open_model(&mut self, dir: &str) -> Result<()> {
        let files = self.models.get(dir).ok_or_else(|| RbvisError::Metadata {
            dir: dir.to_string(),
            message: "no such model directory".to_string(),
        })?;
        let raw = files
            .get(METADATA_RESOURCE)
            .ok_or_else(|| RbvisError::Metadata {
                dir: dir.to_string(),
                message: format!("no {METADATA_RESOURCE} present"),
            })?;
        let metadata: ModelMetadata =
            serde_json::from_slice(raw).map_err(|e| RbvisError::Metadata {
                dir: dir.to_string(),
                message: e.to_string(),
            })?;
        self.current = Some((dir.to_string(), metadata));
        Ok(())
    }

    fn model_dir(&self) -> Option<&str> {
        self.current.as_ref().map(|(d, _)| d.as_str())
    }

    fn resolve_tag(&self, path: &str) -> Option<String> {
        self.metadata()?.tags.get(path).cloned()
    }

    fn resolve_attribute(&self, name: &str, tag: Option<&str>) -> Option<String> {
        let meta = self.metadata()?;
        match tag {
            None => meta.attributes.get(name).cloned(),
            Some(tag) => meta.tag_attributes.get(tag)?.get(name).cloned(),
        }
    }

    fn tag_exists(&self, path: &str) -> bool {
        self.metadata()
            .is_some_and(|m| m.tags.contains_key(path) || m.tag_attributes.contains_key(path))
    }

    fn open_resource(&self, name: &str) -> Result<Box<dyn Read + '_>> {
        let files = self.current_files().ok_or(RbvisError::NoModelSelected)?;
        let bytes = files
            .get(name)
            .ok_or_else(|| RbvisError::ResourceNotFound(name.to_string()))?;
        Ok(Box::new(Cursor::new(bytes.as_slice())))
    }

    fn resource_exists(&self, name: &str) -> bool {
        self.current_files().is_some_and(|f| f.contains_key(name))
    }

    fn list_model_directories(&self) -> Result<Vec<String>> {
        Ok(self.models.keys().cloned().collect())
    }
}
