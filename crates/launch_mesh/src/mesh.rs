//! Mesh data container
//!
//! A mesh is a fully expanded triangle list: every three consecutive vertices form
//! one triangle. Positions, colors and normals are always present; texcoords are
//! optional and, when present, match the other channels in length.

use glam::{Vec2, Vec3};

use crate::error::{MeshError, Result};
use crate::vertex::{ShapeVertex, TexturedVertex};

/// Parallel per-vertex attribute channels
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Empty when the mesh carries no texture coordinates
    pub texcoords: Vec<Vec2>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one untextured vertex
    pub fn push(&mut self, position: Vec3, color: Vec3, normal: Vec3) {
        self.positions.push(position);
        self.colors.push(color);
        self.normals.push(normal);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Check the channel-length and triangle-list invariants
    pub fn validate(&self) -> Result<()> {
        let expected = self.positions.len();
        let channels = [
            ("colors", self.colors.len()),
            ("normals", self.normals.len()),
        ];
        for (channel, actual) in channels {
            if actual != expected {
                return Err(MeshError::ChannelMismatch { channel, expected, actual });
            }
        }
        if self.has_texcoords() && self.texcoords.len() != expected {
            return Err(MeshError::ChannelMismatch {
                channel: "texcoords",
                expected,
                actual: self.texcoords.len(),
            });
        }
        if expected % 3 != 0 {
            return Err(MeshError::NotTriangles(expected));
        }
        Ok(())
    }

    /// Interleave into position/color/normal records
    pub fn to_shape_vertices(&self) -> Vec<ShapeVertex> {
        self.positions
            .iter()
            .zip(&self.colors)
            .zip(&self.normals)
            .map(|((p, c), n)| ShapeVertex {
                position: p.to_array(),
                color: c.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }

    /// Interleave into position/color/normal/texcoord records.
    ///
    /// Meshes without texcoords get `(0, 0)` for every vertex.
    pub fn to_textured_vertices(&self) -> Vec<TexturedVertex> {
        (0..self.vertex_count())
            .map(|i| TexturedVertex {
                position: self.positions[i].to_array(),
                color: self.colors.get(i).copied().unwrap_or(Vec3::ONE).to_array(),
                normal: self.normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
                texcoord: self.texcoords.get(i).copied().unwrap_or(Vec2::ZERO).to_array(),
            })
            .collect()
    }
}

/// Append `b` after `a`.
///
/// Vertex order inside each input is kept and `a` comes first. If only one side has
/// texcoords the other side is padded with `(0, 0)` so the channel stays aligned.
pub fn concatenate(mut a: MeshData, b: &MeshData) -> MeshData {
    match (a.has_texcoords(), b.has_texcoords()) {
        (true, true) => a.texcoords.extend_from_slice(&b.texcoords),
        (true, false) => a
            .texcoords
            .extend(std::iter::repeat(Vec2::ZERO).take(b.vertex_count())),
        (false, true) => {
            a.texcoords = vec![Vec2::ZERO; a.vertex_count()];
            a.texcoords.extend_from_slice(&b.texcoords);
        }
        (false, false) => {}
    }

    a.positions.extend_from_slice(&b.positions);
    a.colors.extend_from_slice(&b.colors);
    a.normals.extend_from_slice(&b.normals);
    a
}
