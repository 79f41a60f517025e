use std::path::PathBuf;
use thiserror::Error;

/// The main error type for imgfind operations.
///
/// Unresolved and ambiguous references are not errors; they are reported
/// as diagnostics (see [`crate::resolve::Diagnostic`]).
#[derive(Debug, Error)]
pub enum ImgfindError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read image header from {path}: {source}")]
    ImageHeader {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to copy image {source_path} to {dest}: {source}")]
    ImageCopy {
        source_path: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document {path}: {message}")]
    DocumentParse { path: PathBuf, message: String },

    #[error("Failed to parse config from {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write JSON report: {0}")]
    ReportWrite(#[source] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
