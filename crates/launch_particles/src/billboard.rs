//! Camera-facing particle quads
//!
//! Every active particle becomes two triangles around its center, built from the
//! camera's right/up vectors so the quad always faces the viewer:
//!
//! ```text
//!   TL ---- TR      triangle 1: TL, BL, BR
//!   |  \     |      triangle 2: TL, BR, TR
//!   |    \   |
//!   BL ---- BR
//! ```

use std::mem::size_of;

use glam::Vec3;

/// Vertices emitted per particle
pub const VERTICES_PER_PARTICLE: usize = 6;

/// Position + texcoord (5 floats)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BillboardVertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
}

impl BillboardVertex {
    fn new(position: Vec3, texcoord: [f32; 2]) -> Self {
        Self { position: position.to_array(), texcoord }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<BillboardVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Clear `out` and fill it with one quad per center.
///
/// `right` and `up` are expected unit length and orthogonal; `size` is the
/// half-extent of the quad along each.
pub fn write_billboards(
    centers: impl IntoIterator<Item = Vec3>,
    right: Vec3,
    up: Vec3,
    size: f32,
    out: &mut Vec<BillboardVertex>,
) {
    out.clear();

    let right = right * size;
    let up = up * size;

    for center in centers {
        let top_left = center - right + up;
        let bottom_left = center - right - up;
        let bottom_right = center + right - up;
        let top_right = center + right + up;

        out.extend([
            BillboardVertex::new(top_left, [0.0, 1.0]),
            BillboardVertex::new(bottom_left, [0.0, 0.0]),
            BillboardVertex::new(bottom_right, [1.0, 0.0]),
            BillboardVertex::new(top_left, [0.0, 1.0]),
            BillboardVertex::new(bottom_right, [1.0, 0.0]),
            BillboardVertex::new(top_right, [1.0, 1.0]),
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_quad_layout() {
        let mut out = Vec::new();
        write_billboards([Vec3::ZERO], Vec3::X, Vec3::Y, 0.5, &mut out);

        assert_eq!(out.len(), VERTICES_PER_PARTICLE);

        let tl = [-0.5, 0.5, 0.0];
        let bl = [-0.5, -0.5, 0.0];
        let br = [0.5, -0.5, 0.0];
        let tr = [0.5, 0.5, 0.0];
        let positions: Vec<[f32; 3]> = out.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![tl, bl, br, tl, br, tr]);

        let texcoords: Vec<[f32; 2]> = out.iter().map(|v| v.texcoord).collect();
        assert_eq!(
            texcoords,
            vec![[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]
        );
    }

    #[test]
    fn test_buffer_is_rebuilt() {
        let mut out = Vec::new();
        write_billboards([Vec3::ZERO, Vec3::X, Vec3::Y], Vec3::X, Vec3::Y, 1.0, &mut out);
        assert_eq!(out.len(), 18);

        write_billboards(std::iter::empty(), Vec3::X, Vec3::Y, 1.0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_quad_follows_camera_basis() {
        let mut out = Vec::new();
        let center = Vec3::new(2.0, 3.0, 4.0);
        write_billboards([center], Vec3::Z, Vec3::X, 0.25, &mut out);

        assert_eq!(out[0].position, [2.25, 3.0, 3.75]);
        assert_eq!(out[5].position, [2.25, 3.0, 4.25]);
    }

    #[test]
    fn test_flat_float_view() {
        let mut out = Vec::new();
        write_billboards([Vec3::ZERO, Vec3::ONE], Vec3::X, Vec3::Y, 0.5, &mut out);

        let floats: &[f32] = bytemuck::cast_slice(&out);
        assert_eq!(floats.len(), 2 * VERTICES_PER_PARTICLE * 5);
        assert_eq!(&floats[..5], &[-0.5, 0.5, 0.0, 0.0, 1.0]);
        assert_eq!(size_of::<BillboardVertex>(), 20);
    }
}
