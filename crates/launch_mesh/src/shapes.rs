//! Procedural unit shapes
//!
//! Each generator builds a unit primitive in local space and bakes a pre-transform
//! into it. Positions go through the full 4x4 (with a divide by `w`); normals go
//! through the inverse-transpose of the linear part and are NOT renormalized, so a
//! non-uniform scale leaves them non-unit.
//!
//! The cone and cube use simplified per-vertex normals (the raw local position of
//! each vertex). That gives their faceted look and is kept on purpose.
//!
//! Nothing here validates its input. Zero subdivisions give an empty mesh and a
//! singular pre-transform gives non-finite normals.

use std::f32::consts::TAU;

use glam::{Mat3, Mat4, Vec2, Vec3};

use crate::mesh::MeshData;

/// Unit cube corners, two triangles per face
const CUBE_POSITIONS: [[f32; 3]; 36] = [
    [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0],

    [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0],

    [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0],

    [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0],

    [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0],

    [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0],
];

/// Inputs shared by every generator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeParams {
    /// Emit end caps (cylinder, cone)
    pub capped: bool,
    /// Angular steps around the axis (cylinder, cone)
    pub subdivisions: usize,
    /// Flat color for every vertex
    pub color: Vec3,
    /// Baked into positions, and as its inverse-transpose into normals
    pub pre_transform: Mat4,
}

impl ShapeParams {
    pub fn new(capped: bool, subdivisions: usize, color: Vec3, pre_transform: Mat4) -> Self {
        Self { capped, subdivisions, color, pre_transform }
    }
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            capped: true,
            subdivisions: 16,
            color: Vec3::ONE,
            pre_transform: Mat4::IDENTITY,
        }
    }
}

/// Walks the unit circle in the YZ plane, remembering the previous sample.
///
/// Sample `k` sits at angle `k * 2pi / n`; the walk starts at angle 0.
struct Ring {
    subdivisions: usize,
    prev: Vec2,
}

impl Ring {
    fn new(subdivisions: usize) -> Self {
        Self { subdivisions, prev: Vec2::new(1.0, 0.0) }
    }

    /// Returns `(previous, current)` for step `i` and advances
    fn step(&mut self, i: usize) -> (Vec2, Vec2) {
        let angle = (i + 1) as f32 * TAU / self.subdivisions as f32;
        let curr = Vec2::new(angle.cos(), angle.sin());
        (std::mem::replace(&mut self.prev, curr), curr)
    }
}

#[inline]
fn rim(x: f32, sample: Vec2) -> Vec3 {
    Vec3::new(x, sample.x, sample.y)
}

/// Bake the pre-transform and color into raw local geometry
fn bake(positions: Vec<Vec3>, normals: Vec<Vec3>, params: &ShapeParams) -> MeshData {
    let m = params.pre_transform;
    let normal_matrix = Mat3::from_mat4(m.inverse().transpose());

    MeshData {
        colors: vec![params.color; positions.len()],
        positions: positions.into_iter().map(|p| m.project_point3(p)).collect(),
        normals: normals.into_iter().map(|n| normal_matrix * n).collect(),
        texcoords: Vec::new(),
    }
}

/// Unit cylinder along local X from 0 to 1, radius 1.
///
/// Lateral surface is `6 * subdivisions` vertices; caps add another
/// `6 * subdivisions` (X=1 disk facing +X, X=0 disk facing -X).
pub fn make_cylinder(params: &ShapeParams) -> MeshData {
    let n = params.subdivisions;
    let per_step = if params.capped { 12 } else { 6 };
    let mut pos = Vec::with_capacity(n * per_step);
    let mut normal = Vec::with_capacity(n * per_step);

    let mut ring = Ring::new(n);
    for i in 0..n {
        let (prev, curr) = ring.step(i);

        pos.extend([
            rim(0.0, prev), rim(0.0, curr), rim(1.0, prev),
            rim(0.0, curr), rim(1.0, curr), rim(1.0, prev),
        ]);
        normal.extend([
            rim(0.0, prev), rim(0.0, curr), rim(0.0, prev),
            rim(0.0, curr), rim(0.0, curr), rim(0.0, prev),
        ]);
    }

    if params.capped {
        // Continues from where the lateral walk stopped (angle 2pi)
        for i in 0..n {
            let (prev, curr) = ring.step(i);

            pos.extend([Vec3::X, rim(1.0, curr), rim(1.0, prev)]);
            normal.extend([Vec3::X; 3]);

            pos.extend([Vec3::ZERO, rim(0.0, prev), rim(0.0, curr)]);
            normal.extend([Vec3::NEG_X; 3]);
        }
    }

    bake(pos, normal, params)
}

/// Unit cone with apex at local (1,0,0) and a radius-1 base disk at X=0.
///
/// Every normal is the vertex's own local position, including the zero normal at
/// the base center. With caps, each step emits its side triangle followed by its
/// base triangle.
pub fn make_cone(params: &ShapeParams) -> MeshData {
    let n = params.subdivisions;
    let per_step = if params.capped { 6 } else { 3 };
    let mut pos = Vec::with_capacity(n * per_step);
    let mut normal = Vec::with_capacity(n * per_step);

    let mut ring = Ring::new(n);
    for i in 0..n {
        let (prev, curr) = ring.step(i);

        let side = [Vec3::X, rim(0.0, prev), rim(0.0, curr)];
        pos.extend(side);
        normal.extend(side);

        if params.capped {
            let base = [Vec3::ZERO, rim(0.0, curr), rim(0.0, prev)];
            pos.extend(base);
            normal.extend(base);
        }
    }

    bake(pos, normal, params)
}

/// Cube spanning [-1,1] on every axis, always 36 vertices.
///
/// `capped` and `subdivisions` are ignored. Each normal is the corner position.
pub fn make_cube(params: &ShapeParams) -> MeshData {
    let pos: Vec<Vec3> = CUBE_POSITIONS.iter().copied().map(Vec3::from).collect();
    let normal = pos.clone();
    bake(pos, normal, params)
}
