//! Core abstractions for rbvis.
//!
//! This crate provides the fundamental types used throughout rbvis:
//! - [`RbvisError`] and the crate-wide [`Result`] alias
//! - The binary numeric [`codec`] for model resources
//! - Model metadata types ([`ModelType`], [`FieldDescriptor`], ...)
//! - The [`ModelSource`] and [`ProgressSink`] collaborator traits
//! - Pipeline configuration ([`PipelineOptions`])

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod error;
pub mod model;
pub mod options;
pub mod source;

pub use codec::{ByteOrder, Matrix, NumericReader, NumericWriter};
pub use error::{RbvisError, Result};
pub use model::{FieldDescriptor, FieldMapping, ModelType, SolutionFieldType};
pub use options::{NormalPolicy, PipelineOptions, CONSTANT_TOLERANCE};
pub use source::{LogProgress, MemoryModelSource, ModelMetadata, ModelSource, ProgressSink};

// Re-export glam types for convenience
pub use glam::{Vec3, Vec4};
