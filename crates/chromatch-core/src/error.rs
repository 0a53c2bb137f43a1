//! Error types for the transfer pipeline.
//!
//! Zero-variance channels are not represented here: they are an expected
//! input (solid fills, grayscale targets) and are handled numerically.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("failed to load image {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write image {}: {source}", path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} would overwrite {}, already claimed by an earlier target", target.display(), output.display())]
    DuplicateOutput { target: PathBuf, output: PathBuf },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TransferError {
    /// Whether this failure came from decoding an input image.
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::ImageLoad { .. })
    }
}
