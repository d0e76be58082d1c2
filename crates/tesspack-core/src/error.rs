//! Domain-specific errors for wheel conversion

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unexpected wheel filename format: {filename}")]
    MalformedFilename { filename: String },

    #[error("No .dist-info directory found in {}", path.display())]
    MissingMetadataDirectory { path: PathBuf },

    #[error("Unsupported interpreter version '{tag}': expected a major digit followed by a numeric minor version")]
    UnsupportedInterpreterTag { tag: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Attach the offending path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Adds the failing path to `io::Result`s so diagnostics name the file.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T, ConvertError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T, ConvertError> {
        self.map_err(|e| ConvertError::io(path, e))
    }
}
