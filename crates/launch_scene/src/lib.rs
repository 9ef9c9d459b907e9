//! # launch_scene - Scene state for the Launchpad viewer
//!
//! Everything the viewer simulates, independent of the GPU:
//!
//! - **Cameras**: yaw/pitch free flight, rocket chase, ground view, one-shot reset
//! - **Rocket**: launch kinematics, carried point lights and the procedural mesh
//! - **Intents**: queued input, drained once per frame
//! - **Views**: single or split-screen viewports with per-camera billboards
//! - **Config**: TOML viewer configuration with defaults for every field
//!
//! ```ignore
//! use launch_scene::{Intent, SceneState, ViewerConfig};
//!
//! let config = ViewerConfig::load();
//! let mut scene = SceneState::new(&config);
//! let mut views = Vec::new();
//!
//! scene.push_intent(Intent::TogglePlay);
//! scene.update(dt, &mut rand::rng());
//! scene.write_views(width, height, &mut views);
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod intent;
pub mod rocket;
pub mod state;
pub mod transform;

pub use camera::{
    CameraControl, CameraFrame, CameraMode, CameraSettings, MoveDirection, MoveFlags, SpeedKey,
    SpeedKeys, SpeedModifier,
};
pub use config::{AssetConfig, DiagnosticsConfig, ViewerConfig, WindowConfig};
pub use error::{ConfigError, Result};
pub use intent::{Intent, IntentQueue, ViewSlot};
pub use rocket::{build_rocket_mesh, PointLight, RocketControl, RocketSettings};
pub use state::{SceneLighting, SceneState, SceneView, Viewport};
pub use transform::{
    landing_pad_transforms, normal_matrix, transform_point, GL_TO_WGPU_CLIP,
    LANDING_PAD_POSITIONS,
};
