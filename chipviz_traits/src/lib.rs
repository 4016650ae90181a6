use std::path::PathBuf;
use thiserror::Error;

mod diagnostic;
mod label;

pub use diagnostic::{LineDiagnostic, LineIssue, Parsed};
pub use label::ClusterLabel;

/// A point of the 2-D plane the boundaries are drawn in.
pub type Point2 = [f64; 2];

/// File level and geometry level failures.
///
/// Malformed lines inside a file are not errors, they are reported as [`LineDiagnostic`]s
/// and the parse goes on.
#[derive(Error, Debug)]
pub enum ChipError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Malformed content in {}: {reason}", .path.display())]
    MalformedContent { path: PathBuf, reason: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No positive intersection with the viewport for a ray from {origin:?} along {direction:?}")]
    DegenerateRay { origin: Point2, direction: Point2 },

    #[error("Expected {expected} dimensions, got {found}")]
    UnsupportedDimensions { expected: usize, found: usize },

    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChipError {
    /// Classifies an I/O failure on `path` into the distinct file level conditions.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => ChipError::FileNotFound(path),
            std::io::ErrorKind::InvalidData => ChipError::MalformedContent {
                path,
                reason: source.to_string(),
            },
            _ => ChipError::Io { path, source },
        }
    }
}

// Generic Result type for chipviz.
pub type ChipResult<T> = Result<T, ChipError>;
