//! Yaw/pitch camera control
//!
//! `phi` is yaw around world Y and `theta` is pitch around the camera X axis. The
//! view matrix is `Rx(theta) * Ry(phi) * T(-position)`.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::transform::{camera_basis, perspective_gl, world_to_camera};

/// Free-camera start pose
pub const HOME_POSITION: Vec3 = Vec3::new(0.0, 5.0, 10.0);
/// Ground-level viewpoint next to the launch pad
pub const GROUND_FIXED_POSITION: Vec3 = Vec3::new(6.0, 0.3, -1.0);
/// Chase camera offset from the rocket origin
pub const FOLLOW_OFFSET: Vec3 = Vec3::new(5.0, 1.0, 3.0);
pub const FOLLOW_PHI: f32 = -1.26;
pub const FOLLOW_THETA: f32 = -0.03;

/// Camera tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Units per second without modifiers
    pub move_speed: f32,
    /// Units per second while Shift is held
    pub fast_speed: f32,
    /// Units per second while Ctrl is held
    pub slow_speed: f32,
    /// Radians per pixel of cursor motion
    pub mouse_sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 100.0,
            move_speed: 0.1,
            fast_speed: 2.0,
            slow_speed: 0.5,
            mouse_sensitivity: 0.01,
        }
    }
}

impl CameraSettings {
    pub fn speed(&self, modifier: SpeedModifier) -> f32 {
        match modifier {
            SpeedModifier::Normal => self.move_speed,
            SpeedModifier::Fast => self.fast_speed,
            SpeedModifier::Slow => self.slow_speed,
        }
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        perspective_gl(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }
}

/// Camera behaviour, cycled with the camera key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraMode {
    /// WASD/EQ flight with optional mouse look
    #[default]
    Free,
    /// Chase position beside the rocket
    FollowRocket,
    /// Ground-level view of the pad
    GroundFixed,
    /// Snap back to the home pose, then become `Free`
    Reset,
}

impl CameraMode {
    pub fn next(self) -> Self {
        match self {
            Self::Free => Self::FollowRocket,
            Self::FollowRocket => Self::GroundFixed,
            Self::GroundFixed => Self::Reset,
            Self::Reset => Self::Free,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Which movement keys are held
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveFlags {
    pub fn set(&mut self, direction: MoveDirection, active: bool) {
        match direction {
            MoveDirection::Forward => self.forward = active,
            MoveDirection::Backward => self.backward = active,
            MoveDirection::Left => self.left = active,
            MoveDirection::Right => self.right = active,
            MoveDirection::Up => self.up = active,
            MoveDirection::Down => self.down = active,
        }
    }
}

/// Movement speed selected by the held modifier key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpeedModifier {
    #[default]
    Normal,
    Fast,
    Slow,
}

/// Modifier key that changes movement speed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedKey {
    Shift,
    Ctrl,
}

/// Speed keys currently held down
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpeedKeys {
    pub shift: bool,
    pub ctrl: bool,
}

impl SpeedKeys {
    pub fn set(&mut self, key: SpeedKey, held: bool) {
        match key {
            SpeedKey::Shift => self.shift = held,
            SpeedKey::Ctrl => self.ctrl = held,
        }
    }

    /// Shift takes precedence when both keys are held
    pub fn modifier(&self) -> SpeedModifier {
        if self.shift {
            SpeedModifier::Fast
        } else if self.ctrl {
            SpeedModifier::Slow
        } else {
            SpeedModifier::Normal
        }
    }
}

/// Camera vectors in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraAxes {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

/// Per-view matrices and billboard basis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFrame {
    pub view: Mat4,
    /// OpenGL clip convention
    pub projection: Mat4,
    pub right: Vec3,
    pub up: Vec3,
    pub position: Vec3,
}

impl CameraFrame {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

impl Default for CameraFrame {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            right: Vec3::X,
            up: Vec3::Y,
            position: Vec3::ZERO,
        }
    }
}

/// One controllable camera
#[derive(Clone, Debug, PartialEq)]
pub struct CameraControl {
    pub position: Vec3,
    /// Yaw in radians
    pub phi: f32,
    /// Pitch in radians, kept within +-pi/2
    pub theta: f32,
    pub mode: CameraMode,
    pub mouse_look: bool,
    pub movement: MoveFlags,
    pub ground_fixed_position: Vec3,
    last_cursor: Option<Vec2>,
}

impl Default for CameraControl {
    fn default() -> Self {
        Self {
            position: HOME_POSITION,
            phi: 0.0,
            theta: 0.0,
            mode: CameraMode::Free,
            mouse_look: false,
            movement: MoveFlags::default(),
            ground_fixed_position: GROUND_FIXED_POSITION,
            last_cursor: None,
        }
    }
}

impl CameraControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward, right and up from the current yaw/pitch
    pub fn axes(&self) -> CameraAxes {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();

        let forward = Vec3::new(sin_phi * cos_theta, -sin_theta, -cos_phi * cos_theta).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward).normalize();
        CameraAxes { forward, right, up }
    }

    /// Advance to the next mode. Scripted modes switch mouse look off.
    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
        if matches!(self.mode, CameraMode::FollowRocket | CameraMode::GroundFixed) {
            self.mouse_look = false;
        }
        log::debug!("Camera mode: {:?}", self.mode);
    }

    pub fn toggle_mouse_look(&mut self) -> bool {
        self.mouse_look = !self.mouse_look;
        self.mouse_look
    }

    /// Feed an absolute cursor position. Only rotates while mouse look is on, but
    /// always remembers the position so enabling it later does not jump.
    pub fn look(&mut self, cursor: Vec2, sensitivity: f32) {
        if let (true, Some(last)) = (self.mouse_look, self.last_cursor) {
            let delta = cursor - last;
            self.phi += delta.x * sensitivity;
            self.theta = (self.theta + delta.y * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
        }
        self.last_cursor = Some(cursor);
    }

    /// Apply held movement (free mode) or the scripted pose of the current mode
    pub fn update(&mut self, delta_time: f32, speed: f32, rocket_position: Vec3) {
        match self.mode {
            CameraMode::Free => {
                let axes = self.axes();
                let step = speed * delta_time;
                let m = self.movement;

                if m.forward {
                    self.position += axes.forward * step;
                }
                if m.backward {
                    self.position -= axes.forward * step;
                }
                if m.left {
                    self.position -= axes.right * step;
                }
                if m.right {
                    self.position += axes.right * step;
                }
                if m.up {
                    self.position += axes.up * step;
                }
                if m.down {
                    self.position -= axes.up * step;
                }
            }
            CameraMode::FollowRocket => {
                self.position = rocket_position + FOLLOW_OFFSET;
                self.phi = FOLLOW_PHI;
                self.theta = FOLLOW_THETA;
            }
            CameraMode::GroundFixed => {
                self.position = self.ground_fixed_position;
                self.phi = 0.0;
                self.theta = 0.0;
            }
            CameraMode::Reset => {
                self.position = HOME_POSITION;
                self.phi = 0.0;
                self.theta = 0.0;
                self.mode = CameraMode::Free;
            }
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        world_to_camera(self.position, self.phi, self.theta)
    }

    /// Matrices for a viewport of the given aspect ratio
    pub fn frame(&self, aspect: f32, settings: &CameraSettings) -> CameraFrame {
        let view = self.view_matrix();
        let (right, up) = camera_basis(&view);
        CameraFrame {
            view,
            projection: settings.projection(aspect),
            right,
            up,
            position: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_pose() {
        let camera = CameraControl::new();
        assert_eq!(camera.position, Vec3::new(0.0, 5.0, 10.0));
        assert_eq!(camera.mode, CameraMode::Free);

        let axes = camera.axes();
        assert_abs_diff_eq!(axes.forward, Vec3::NEG_Z, epsilon = 1e-6);
        assert_abs_diff_eq!(axes.right, Vec3::X, epsilon = 1e-6);
        assert_abs_diff_eq!(axes.up, Vec3::Y, epsilon = 1e-6);
    }

    #[test]
    fn test_mode_cycle() {
        let mut mode = CameraMode::Free;
        let mut seen = Vec::new();
        for _ in 0..4 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                CameraMode::FollowRocket,
                CameraMode::GroundFixed,
                CameraMode::Reset,
                CameraMode::Free
            ]
        );
    }

    #[test]
    fn test_free_movement_uses_speed() {
        let mut camera = CameraControl::new();
        camera.movement.set(MoveDirection::Forward, true);
        camera.update(0.5, 2.0, Vec3::ZERO);
        assert_abs_diff_eq!(camera.position, Vec3::new(0.0, 5.0, 9.0), epsilon = 1e-5);

        camera.movement.set(MoveDirection::Forward, false);
        camera.movement.set(MoveDirection::Up, true);
        camera.movement.set(MoveDirection::Right, true);
        camera.update(1.0, 0.5, Vec3::ZERO);
        assert_abs_diff_eq!(camera.position, Vec3::new(0.5, 5.5, 9.0), epsilon = 1e-5);
    }

    #[test]
    fn test_follow_and_ground_modes() {
        let mut camera = CameraControl::new();
        camera.mouse_look = true;
        camera.movement.set(MoveDirection::Forward, true);

        camera.cycle_mode();
        assert!(!camera.mouse_look);
        let rocket = Vec3::new(6.0, 3.0, -6.0);
        camera.update(0.1, 2.0, rocket);
        assert_eq!(camera.position, rocket + FOLLOW_OFFSET);
        assert_eq!(camera.phi, FOLLOW_PHI);
        assert_eq!(camera.theta, FOLLOW_THETA);

        camera.cycle_mode();
        camera.update(0.1, 2.0, rocket);
        assert_eq!(camera.position, GROUND_FIXED_POSITION);
        assert_eq!((camera.phi, camera.theta), (0.0, 0.0));
    }

    #[test]
    fn test_reset_mode_is_one_shot() {
        let mut camera = CameraControl::new();
        camera.position = Vec3::new(40.0, 1.0, 2.0);
        camera.phi = 1.0;
        camera.mode = CameraMode::Reset;

        camera.update(0.016, 0.1, Vec3::ZERO);
        assert_eq!(camera.position, HOME_POSITION);
        assert_eq!(camera.phi, 0.0);
        assert_eq!(camera.mode, CameraMode::Free);
    }

    #[test]
    fn test_mouse_look() {
        let mut camera = CameraControl::new();
        camera.look(Vec2::new(100.0, 100.0), 0.01);
        camera.look(Vec2::new(150.0, 100.0), 0.01);
        assert_eq!(camera.phi, 0.0);

        camera.toggle_mouse_look();
        camera.look(Vec2::new(160.0, 120.0), 0.01);
        assert_abs_diff_eq!(camera.phi, 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.theta, 0.2, epsilon = 1e-6);

        camera.look(Vec2::new(160.0, 10_000.0), 0.01);
        assert_eq!(camera.theta, FRAC_PI_2);
        camera.look(Vec2::new(160.0, -10_000.0), 0.01);
        assert_eq!(camera.theta, -FRAC_PI_2);
    }

    #[test]
    fn test_frame_basis_matches_axes() {
        let mut camera = CameraControl::new();
        camera.phi = 0.8;
        camera.theta = -0.4;
        let frame = camera.frame(16.0 / 9.0, &CameraSettings::default());
        let axes = camera.axes();

        assert_abs_diff_eq!(frame.right, axes.right, epsilon = 1e-5);
        assert_abs_diff_eq!(frame.up, axes.up, epsilon = 1e-5);
        assert_eq!(frame.position, camera.position);
    }

    #[test]
    fn test_speed_selection() {
        let settings = CameraSettings::default();
        assert_eq!(settings.speed(SpeedModifier::Normal), 0.1);
        assert_eq!(settings.speed(SpeedModifier::Fast), 2.0);
        assert_eq!(settings.speed(SpeedModifier::Slow), 0.5);
    }

    #[test]
    fn test_speed_keys_overlap() {
        let mut keys = SpeedKeys::default();
        assert_eq!(keys.modifier(), SpeedModifier::Normal);

        keys.set(SpeedKey::Shift, true);
        keys.set(SpeedKey::Ctrl, true);
        assert_eq!(keys.modifier(), SpeedModifier::Fast);

        keys.set(SpeedKey::Ctrl, false);
        assert_eq!(keys.modifier(), SpeedModifier::Fast);

        keys.set(SpeedKey::Ctrl, true);
        keys.set(SpeedKey::Shift, false);
        assert_eq!(keys.modifier(), SpeedModifier::Slow);
    }
}
