//! Rocket animation, lights and geometry

use glam::{Mat4, Vec3};
use launch_mesh::{concatenate, make_cone, make_cube, make_cylinder, MeshData, ShapeParams};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::transform::transform_point;

/// Point lights carried by the rocket, in rocket-local space
pub const LIGHT_OFFSETS: [Vec3; 3] = [
    Vec3::new(1.5, 2.0, 1.5),
    Vec3::new(-0.5, 2.0, -0.5),
    Vec3::new(0.0, -1.0, 0.0),
];

pub const LIGHT_COLORS: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

const BODY_COLOR: Vec3 = Vec3::new(0.5, 0.5, 0.5);
const TRIM_COLOR: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Launch parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketSettings {
    pub start_position: [f32; 3],
    pub max_velocity: f32,
    pub acceleration: f32,
    /// Fixed simulation step per frame, independent of the frame time
    pub time_step: f32,
    /// Angular resolution of the cylinder and cones
    pub shape_subdivisions: usize,
}

impl Default for RocketSettings {
    fn default() -> Self {
        Self {
            start_position: [6.0, 0.0, -6.0],
            max_velocity: 1.0,
            acceleration: 0.02,
            time_step: 0.016,
            shape_subdivisions: 128,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
}

/// Rocket kinematics and the play/pause/reset flags
#[derive(Clone, Debug, PartialEq)]
pub struct RocketControl {
    pub position: Vec3,
    pub velocity: f32,
    /// Tilt around X in radians
    pub rotation: f32,
    pub play: bool,
    pub pause: bool,
    pub reset: bool,
    settings: RocketSettings,
}

impl RocketControl {
    pub fn new(settings: RocketSettings) -> Self {
        Self {
            position: Vec3::from(settings.start_position),
            velocity: 0.0,
            rotation: 0.0,
            play: false,
            pause: false,
            reset: false,
            settings,
        }
    }

    /// Exhaust runs while the launch is playing and not paused
    pub fn is_emitting(&self) -> bool {
        self.play && !self.pause
    }

    /// One fixed simulation step. Climb and drift grow with the square of the
    /// velocity; the tilt follows `0.6 * atan(v)`.
    pub fn advance(&mut self) {
        if !self.is_emitting() {
            return;
        }

        let s = &self.settings;
        self.velocity = (self.velocity + s.acceleration * s.time_step).min(s.max_velocity);

        let v2 = self.velocity * self.velocity;
        self.position.y += v2;
        self.position.z += 0.09 * v2;
        self.rotation = 0.6 * self.velocity.atan();
    }

    /// Put the rocket back on the pad if a reset was requested
    pub fn apply_reset(&mut self) {
        if !self.reset {
            return;
        }
        self.play = false;
        self.reset = false;
        self.velocity = 0.0;
        self.position = Vec3::from(self.settings.start_position);
        self.rotation = 0.0;
        log::info!("Rocket reset to launch pad");
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_rotation_x(self.rotation)
    }

    /// Where exhaust particles spawn
    pub fn exhaust_origin(&self, offset: Vec3) -> Vec3 {
        self.position + offset
    }

    pub fn point_lights(&self) -> [PointLight; 3] {
        let model = self.model_matrix();
        std::array::from_fn(|i| PointLight {
            position: transform_point(&model, LIGHT_OFFSETS[i]),
            color: LIGHT_COLORS[i],
        })
    }
}

impl Default for RocketControl {
    fn default() -> Self {
        Self::new(RocketSettings::default())
    }
}

/// Assemble the rocket from unit shapes, standing upright along +Y.
///
/// Body cylinder, nose cone, two wing plates and four fin cones.
pub fn build_rocket_mesh(subdivisions: usize) -> MeshData {
    let upright = Mat4::from_rotation_z(FRAC_PI_2);
    let scale = |x: f32, y: f32, z: f32| Mat4::from_scale(Vec3::new(x, y, z));
    let shift = |x: f32, y: f32, z: f32| Mat4::from_translation(Vec3::new(x, y, z));

    let body = make_cylinder(&ShapeParams::new(
        true,
        subdivisions,
        BODY_COLOR,
        upright * scale(1.5, 0.2, 0.2),
    ));
    let nose = make_cone(&ShapeParams::new(
        true,
        subdivisions,
        TRIM_COLOR,
        upright * scale(0.5, 0.2, 0.2) * shift(3.0, 0.0, 0.0),
    ));
    let wings = [2.0, -2.0].map(|y| {
        make_cube(&ShapeParams::new(
            true,
            subdivisions,
            TRIM_COLOR,
            upright * scale(0.05, 0.1, 0.1) * shift(18.0, y, 0.0),
        ))
    });
    let fins = [(0.7, 0.7), (0.7, -0.7), (-0.7, 0.7), (-0.7, -0.7)].map(|(y, z)| {
        make_cone(&ShapeParams::new(
            true,
            subdivisions,
            TRIM_COLOR,
            upright * scale(0.6, 0.17, 0.17) * shift(0.0, y, z),
        ))
    });

    let [wing1, wing2] = wings;
    let [fin1, fin2, fin3, fin4] = fins;

    let mut rocket = concatenate(body, &nose);
    rocket = concatenate(wing1, &rocket);
    rocket = concatenate(wing2, &rocket);
    rocket = concatenate(fin1, &rocket);
    rocket = concatenate(fin2, &rocket);
    rocket = concatenate(fin3, &rocket);
    concatenate(fin4, &rocket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_idle_rocket_does_not_move() {
        let mut rocket = RocketControl::default();
        rocket.advance();
        assert_eq!(rocket.position, Vec3::new(6.0, 0.0, -6.0));
        assert_eq!(rocket.velocity, 0.0);
    }

    #[test]
    fn test_first_step() {
        let mut rocket = RocketControl::default();
        rocket.play = true;
        rocket.advance();

        let v = 0.02 * 0.016;
        assert_abs_diff_eq!(rocket.velocity, v, epsilon = 1e-9);
        assert_abs_diff_eq!(rocket.position.y, v * v, epsilon = 1e-9);
        assert_abs_diff_eq!(rocket.position.z, -6.0 + 0.09 * v * v, epsilon = 1e-6);
        assert_abs_diff_eq!(rocket.rotation, 0.6 * v.atan(), epsilon = 1e-9);
    }

    #[test]
    fn test_velocity_clamps() {
        let mut rocket = RocketControl::new(RocketSettings {
            acceleration: 10.0,
            time_step: 0.1,
            ..Default::default()
        });
        rocket.play = true;
        for _ in 0..5 {
            rocket.advance();
        }
        assert_eq!(rocket.velocity, 1.0);
        assert_abs_diff_eq!(rocket.rotation, 0.6 * std::f32::consts::FRAC_PI_4, epsilon = 1e-6);
    }

    #[test]
    fn test_pause_freezes() {
        let mut rocket = RocketControl::default();
        rocket.play = true;
        rocket.pause = true;
        assert!(!rocket.is_emitting());
        rocket.advance();
        assert_eq!(rocket.velocity, 0.0);
    }

    #[test]
    fn test_reset() {
        let mut rocket = RocketControl::default();
        rocket.play = true;
        for _ in 0..100 {
            rocket.advance();
        }
        assert!(rocket.position.y > 0.0);

        rocket.apply_reset();
        assert!(rocket.play);

        rocket.reset = true;
        rocket.apply_reset();
        assert!(!rocket.play && !rocket.reset);
        assert_eq!(rocket.position, Vec3::new(6.0, 0.0, -6.0));
        assert_eq!(rocket.velocity, 0.0);
        assert_eq!(rocket.rotation, 0.0);
    }

    #[test]
    fn test_point_lights_follow_rocket() {
        let mut rocket = RocketControl::default();
        let lights = rocket.point_lights();
        assert_abs_diff_eq!(lights[0].position, Vec3::new(7.5, 2.0, -4.5), epsilon = 1e-6);
        assert_abs_diff_eq!(lights[2].position, Vec3::new(6.0, -1.0, -6.0), epsilon = 1e-6);
        assert_eq!(lights[1].color, Vec3::Y);

        rocket.position.y += 10.0;
        assert_abs_diff_eq!(rocket.point_lights()[2].position.y, 9.0, epsilon = 1e-5);
    }

    #[test]
    fn test_exhaust_origin() {
        let rocket = RocketControl::default();
        assert_eq!(rocket.exhaust_origin(Vec3::NEG_Y), Vec3::new(6.0, -1.0, -6.0));
    }

    #[test]
    fn test_rocket_mesh() {
        let n = 16;
        let mesh = build_rocket_mesh(n);
        // cylinder 12n, five capped cones 6n each, two cubes
        assert_eq!(mesh.vertex_count(), 12 * n + 5 * 6 * n + 2 * 36);
        assert!(mesh.validate().is_ok());

        // Last part appended is the nose cone, whose apex sits at the top
        let apex = mesh.positions[mesh.vertex_count() - 6 * n];
        assert_abs_diff_eq!(apex, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-5);

        // Body is upright: it spans y in [0, 1.5]
        let top = mesh.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert_abs_diff_eq!(top, 2.0, epsilon = 1e-5);
    }
}
