//! Error types for mesh loading and validation

use std::path::PathBuf;

use thiserror::Error;

/// Mesh errors
#[derive(Debug, Error)]
pub enum MeshError {
    /// Source file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed OBJ/MTL line
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A present attribute channel has the wrong length
    #[error("Channel '{channel}' has {actual} entries, expected {expected}")]
    ChannelMismatch {
        channel: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Vertex count is not a whole number of triangles
    #[error("Vertex count {0} is not a multiple of 3")]
    NotTriangles(usize),
}

/// Result type for mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;
