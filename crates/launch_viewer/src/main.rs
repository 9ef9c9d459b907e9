//! Launchpad
//!
//! Textured terrain, two landing pads and a procedurally built rocket that launches
//! with a particle exhaust. Single or split-screen views with free, chase and
//! ground cameras.
//!
//! Run with: cargo run --bin launchpad
//!
//! Settings come from `launchpad.toml` (or the file named by `LAUNCHPAD_CONFIG`).
//! A config path given as the first argument must load, otherwise startup fails.

mod app;
mod error;
mod input;
mod presenter;
mod renderer;
mod texture;

use launch_scene::ViewerConfig;

use crate::error::Result;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("Launchpad failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let config = ViewerConfig::load_from_file(&path)?;
            log::info!("Loaded config from {}", path);
            config
        }
        None => ViewerConfig::load(),
    };

    log::info!(
        "Starting Launchpad: {}x{}, assets in {}",
        config.window.width,
        config.window.height,
        config.assets.root.display()
    );

    app::run(config)
}
