//! Error types for scene configuration

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::ViewerConfig`]
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;
