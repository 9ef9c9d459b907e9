//! Emitter configuration

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How the exhaust emits and draws particles
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Particles per second
    pub emit_rate: f32,
    /// Seconds a particle stays alive
    pub lifetime: f32,
    /// Velocity before jitter
    pub base_direction: [f32; 3],
    /// Upper bound of the per-axis jitter; offsets fall in [0, spread)
    pub spread: f32,
    /// Billboard half-size
    pub billboard_size: f32,
    /// Offset from the rocket origin to the nozzle
    pub exhaust_offset: [f32; 3],
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            emit_rate: 50.0,
            lifetime: 0.5,
            base_direction: [0.0, -2.0, 0.0],
            spread: 0.4,
            billboard_size: 0.5,
            exhaust_offset: [0.0, -1.0, 0.0],
        }
    }
}

impl EmitterConfig {
    pub fn base_direction(&self) -> Vec3 {
        Vec3::from(self.base_direction)
    }

    pub fn exhaust_offset(&self) -> Vec3 {
        Vec3::from(self.exhaust_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EmitterConfig::default();
        assert_eq!(config.emit_rate, 50.0);
        assert_eq!(config.lifetime, 0.5);
        assert_eq!(config.base_direction(), Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(config.exhaust_offset(), Vec3::NEG_Y);
    }

    #[test]
    fn test_partial_toml() {
        let config: EmitterConfig = toml::from_str("emit_rate = 120.0\nspread = 0.1").unwrap();
        assert_eq!(config.emit_rate, 120.0);
        assert_eq!(config.spread, 0.1);
        assert_eq!(config.lifetime, 0.5);
    }
}
