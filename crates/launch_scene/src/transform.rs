//! Scene transform math
//!
//! Projections follow the OpenGL convention (clip depth in [-1, 1]). Renderers
//! targeting wgpu pre-multiply [`GL_TO_WGPU_CLIP`] to land in [0, 1].

use glam::{Mat3, Mat4, Vec3};

/// Remaps clip-space depth from [-1, 1] to [0, 1]
pub const GL_TO_WGPU_CLIP: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

/// World positions of the two landing pads
pub const LANDING_PAD_POSITIONS: [Vec3; 2] = [
    Vec3::new(6.0, 0.0, -6.0),
    Vec3::new(-10.0, 0.0, -3.0),
];

/// First-person view matrix: `Rx(theta) * Ry(phi) * T(-position)`
pub fn world_to_camera(position: Vec3, phi: f32, theta: f32) -> Mat4 {
    Mat4::from_rotation_x(theta) * Mat4::from_rotation_y(phi) * Mat4::from_translation(-position)
}

/// Camera right and up in world space, read from the inverse view matrix
pub fn camera_basis(world_to_camera: &Mat4) -> (Vec3, Vec3) {
    let camera_to_world = world_to_camera.inverse();
    (camera_to_world.x_axis.truncate(), camera_to_world.y_axis.truncate())
}

/// Right-handed perspective projection with OpenGL clip depth
pub fn perspective_gl(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_y_radians, aspect, near, far)
}

/// Inverse-transpose of the upper 3x3, for transforming normals
pub fn normal_matrix(model: &Mat4) -> Mat3 {
    Mat3::from_mat4(model.inverse().transpose())
}

/// Transform a point without the perspective divide
pub fn transform_point(model: &Mat4, point: Vec3) -> Vec3 {
    (*model * point.extend(1.0)).truncate()
}

pub fn landing_pad_transforms() -> [Mat4; 2] {
    LANDING_PAD_POSITIONS.map(Mat4::from_translation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Vec4;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_perspective_matches_reference_values() {
        let p = perspective_gl(60f32.to_radians(), 1280.0 / 720.0, 0.1, 100.0);

        // (row, col) is p.col(col)[row]
        assert_abs_diff_eq!(p.x_axis.x, 0.974279, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y_axis.y, 1.732051, epsilon = 1e-6);
        assert_abs_diff_eq!(p.z_axis.z, -1.002002, epsilon = 1e-6);
        assert_abs_diff_eq!(p.w_axis.z, -0.200200, epsilon = 1e-6);
        assert_abs_diff_eq!(p.z_axis.w, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.w_axis.w, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_wgpu_clip_remap() {
        let p = GL_TO_WGPU_CLIP * perspective_gl(1.0, 1.0, 0.1, 100.0);
        let near = p * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert_abs_diff_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_view_moves_camera_to_origin() {
        let position = Vec3::new(0.0, 5.0, 10.0);
        let view = world_to_camera(position, 0.3, -0.2);
        assert_abs_diff_eq!(view.transform_point3(position), Vec3::ZERO, epsilon = 1e-5);
    }

    #[test]
    fn test_basis_identity_view() {
        let (right, up) = camera_basis(&world_to_camera(Vec3::new(1.0, 2.0, 3.0), 0.0, 0.0));
        assert_abs_diff_eq!(right, Vec3::X, epsilon = 1e-6);
        assert_abs_diff_eq!(up, Vec3::Y, epsilon = 1e-6);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        for (phi, theta) in [(0.7, 0.2), (-1.26, -0.03), (3.0, FRAC_PI_2 - 0.01)] {
            let (right, up) = camera_basis(&world_to_camera(Vec3::ONE, phi, theta));
            assert_abs_diff_eq!(right.length(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(up.length(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(right.dot(up), 0.0, epsilon = 1e-5);
            // Yaw-pitch cameras never roll
            assert_abs_diff_eq!(right.y, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_normal_matrix() {
        let scale = Mat4::from_scale(Vec3::new(2.0, 4.0, 1.0));
        let n = normal_matrix(&scale);
        assert_abs_diff_eq!(n * Vec3::ONE, Vec3::new(0.5, 0.25, 1.0), epsilon = 1e-6);

        let moved = Mat4::from_translation(Vec3::new(3.0, 0.0, 1.0));
        assert_abs_diff_eq!(normal_matrix(&moved), Mat3::IDENTITY, epsilon = 1e-6);
    }

    #[test]
    fn test_transform_point() {
        let m =
            Mat4::from_translation(Vec3::new(6.0, 0.0, -6.0)) * Mat4::from_rotation_x(FRAC_PI_2);
        assert_abs_diff_eq!(
            transform_point(&m, Vec3::new(0.0, -1.0, 0.0)),
            Vec3::new(6.0, 0.0, -7.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_landing_pads() {
        let [a, b] = landing_pad_transforms();
        assert_eq!(a.w_axis.truncate(), Vec3::new(6.0, 0.0, -6.0));
        assert_eq!(b.w_axis.truncate(), Vec3::new(-10.0, 0.0, -3.0));
    }
}
