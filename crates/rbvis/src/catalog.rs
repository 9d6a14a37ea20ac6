//! Model catalog: summaries of every model a source provides.

use rbvis_core::error::Result;
use rbvis_core::model::ModelType;
use rbvis_core::source::ModelSource;

/// Summary of one model directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    /// Model directory.
    pub dir: String,
    /// Display title; the directory name if the model declares none.
    pub title: String,
    pub model_type: ModelType,
    /// Short description, empty if absent.
    pub short_description: String,
    /// Creation date as written in the metadata.
    pub created: Option<String>,
    /// Preview image resource, if the model ships it.
    pub image: Option<String>,
}

/// Opens every model directory and describes the ones with a known model type.
///
/// Directories whose metadata cannot be read are logged and skipped. The
/// last successfully opened model stays selected.
pub fn scan_models<S: ModelSource + ?Sized>(source: &mut S) -> Result<Vec<ModelDescriptor>> {
    let dirs = source.list_model_directories()?;
    let mut models = Vec::with_capacity(dirs.len());
    for dir in dirs {
        if let Err(e) = source.open_model(&dir) {
            log::warn!("skipping model directory '{dir}': {e}");
            continue;
        }
        let model_type = source.model_type();
        if model_type == ModelType::Unknown {
            log::debug!("skipping model directory '{dir}': unknown model type");
            continue;
        }
        let image = source
            .resolve_tag("description.image")
            .filter(|name| source.resource_exists(name));
        models.push(ModelDescriptor {
            title: source
                .resolve_tag("description.name")
                .unwrap_or_else(|| dir.clone()),
            short_description: source.resolve_tag("description.short").unwrap_or_default(),
            created: source.resolve_tag("description.created"),
            image,
            model_type,
            dir,
        });
    }
    log::info!("found {} models", models.len());
    Ok(models)
}
