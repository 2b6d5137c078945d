use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("the glTF `asset` field is missing or invalid")]
    InvalidOrMissingAssetField,

    #[error("document requires unsupported extensions: {}", extensions.join(", "))]
    MissingExtensions { extensions: Vec<String> },

    #[error("failed to parse glTF JSON: {message}")]
    InvalidJson { message: String },

    #[error("invalid glTF in {context}: {message}")]
    InvalidGltf { context: String, message: String },

    #[error("missing or invalid required field '{field}' in {context}")]
    InvalidOrMissingRequiredField { context: String, field: String },

    #[error("{context}: {field} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        context: String,
        field: String,
        index: usize,
        len: usize,
    },

    #[error("no data location could be resolved for {context}")]
    MissingData { context: String },

    #[error("validation requires at least one parsed category")]
    NothingParsed,

    #[error("unsupported MIME type '{value}'")]
    UnsupportedMimeType { value: String },

    #[error("unsupported or malformed URI '{uri}'")]
    InvalidUri { uri: String },

    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {message}", path.display())]
    FileRead { path: PathBuf, message: String },

    #[cfg(feature = "binary")]
    #[error("failed to parse GLB container: {message}")]
    InvalidGlb { message: String },
}

impl Error {
    pub(crate) fn invalid(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidGltf {
            context: context.into(),
            message: message.into(),
        }
    }

    pub(crate) fn missing_field(context: impl Into<String>, field: &str) -> Self {
        Self::InvalidOrMissingRequiredField {
            context: context.into(),
            field: field.to_string(),
        }
    }

    pub(crate) fn out_of_range(
        context: impl Into<String>,
        field: &str,
        index: usize,
        len: usize,
    ) -> Self {
        Self::IndexOutOfRange {
            context: context.into(),
            field: field.to_string(),
            index,
            len,
        }
    }
}
