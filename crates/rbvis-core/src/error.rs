//! Error types for rbvis.

use thiserror::Error;

/// The main error type for rbvis operations.
#[derive(Error, Debug)]
pub enum RbvisError {
    /// A model resource was requested that the source does not provide.
    #[error("resource '{0}' not found")]
    ResourceNotFound(String),

    /// No model directory has been opened on the model source.
    #[error("no model directory selected")]
    NoModelSelected,

    /// The model metadata of a directory could not be read or parsed.
    #[error("invalid model metadata in '{dir}': {message}")]
    Metadata { dir: String, message: String },

    /// The model type is not supported by the requested operation.
    #[error("unknown model type '{0}'")]
    UnknownModelType(String),

    /// A length prefix or dimension read from a stream was negative.
    #[error("negative length {0} in binary stream")]
    NegativeLength(i32),

    /// Malformed textual or binary content.
    #[error("format error: {0}")]
    Format(String),

    /// A field mapping is not valid for the requested field kind.
    #[error("invalid field mapping {mapping} for {context}")]
    InvalidFieldMapping { mapping: String, context: String },

    /// The number of DoF arrays does not match the field type.
    #[error("field type {field_type} requires {expected} DoF arrays, got {actual}")]
    ComponentCount {
        field_type: String,
        expected: usize,
        actual: usize,
    },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// An index lies outside the addressable range.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A vertex selects an affine function the transform does not define.
    #[error("vertex {vertex} selects transform function {function}, only {available} defined")]
    TransformFunction {
        vertex: usize,
        function: usize,
        available: usize,
    },

    /// Solution fields disagree on the number of frames they contain.
    #[error("incompatible frame count for field '{field}': expected {expected}, got {actual}")]
    FrameMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for rbvis operations.
pub type Result<T> = std::result::Result<T, RbvisError>;
