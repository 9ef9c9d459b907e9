//! Viewer Configuration
//!
//! Every field has a default, so a config file only needs the values it changes.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variable: `LAUNCHPAD_CONFIG=/path/to/launchpad.toml`
//! 2. `launchpad.toml` in the working directory
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! [window]
//! title = "Launchpad"
//! width = 1280
//! height = 720
//! vsync = true
//!
//! [camera]
//! fov_degrees = 60.0
//! move_speed = 0.1
//! fast_speed = 2.0
//!
//! [particles]
//! emit_rate = 50.0
//! lifetime = 0.5
//!
//! [rocket]
//! shape_subdivisions = 128
//!
//! [assets]
//! root = "assets"
//!
//! [diagnostics]
//! log_frame_times = true
//! ```

use std::path::{Path, PathBuf};

use launch_particles::EmitterConfig;
use serde::{Deserialize, Serialize};

use crate::camera::CameraSettings;
use crate::error::{ConfigError, Result};
use crate::rocket::RocketSettings;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "LAUNCHPAD_CONFIG";
/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "launchpad.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Present with vsync (Fifo) instead of the lowest-latency mode
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Launchpad".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

/// Asset file names, relative to `root`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub root: PathBuf,
    pub terrain: String,
    pub terrain_texture: String,
    pub landing_pad: String,
    pub particle_texture: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            terrain: "langerso.obj".to_string(),
            terrain_texture: "L3211E-4k.jpg".to_string(),
            landing_pad: "landingpad.obj".to_string(),
            particle_texture: "particle.png".to_string(),
        }
    }
}

impl AssetConfig {
    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Log frame-to-frame and CPU submit times at debug level
    pub log_frame_times: bool,
}

/// Complete viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraSettings,
    pub particles: EmitterConfig,
    pub rocket: RocketSettings,
    pub assets: AssetConfig,
    pub diagnostics: DiagnosticsConfig,
}

impl ViewerConfig {
    /// Load from the first available source; falls back to defaults.
    ///
    /// A file that exists but fails to parse is reported and skipped.
    pub fn load() -> Self {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                candidates.push(PathBuf::from(path));
            }
        }
        candidates.push(PathBuf::from(CONFIG_FILE));

        for path in &candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
