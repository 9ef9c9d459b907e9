//! # launch_mesh - Triangle-list meshes
//!
//! CPU-side mesh data for the Launchpad viewer.
//!
//! ## Features
//!
//! - **MeshData**: parallel position/color/normal/texcoord channels, fully expanded
//!   triangle list (no index buffer)
//! - **Shapes**: unit cylinder, cone and cube with a baked pre-transform
//! - **OBJ**: Wavefront loader with `mtllib`/`usemtl` diffuse colors
//! - **Vertex packing**: Pod vertex records with matching wgpu layouts
//!
//! ## Example
//!
//! ```ignore
//! use glam::{Mat4, Vec3};
//! use launch_mesh::{concatenate, make_cone, make_cylinder, ShapeParams};
//!
//! let body = make_cylinder(&ShapeParams::new(true, 64, Vec3::splat(0.5), Mat4::IDENTITY));
//! let nose = make_cone(&ShapeParams::new(true, 64, Vec3::Z, Mat4::from_translation(Vec3::X)));
//! let rocket = concatenate(body, &nose);
//! let vertices = rocket.to_shape_vertices();
//! ```

pub mod error;
pub mod mesh;
pub mod obj;
pub mod shapes;
pub mod vertex;

pub use error::{MeshError, Result};
pub use mesh::{concatenate, MeshData};
pub use obj::{load_obj, parse_mtl, parse_obj, MaterialColors};
pub use shapes::{make_cone, make_cube, make_cylinder, ShapeParams};
pub use vertex::{ShapeVertex, TexturedVertex};
