//! Wavefront OBJ loader
//!
//! Produces an expanded triangle list. Supports:
//! - `v`, `vt`, `vn` and `f` with `v`, `v/vt`, `v//vn`, `v/vt/vn` (negative indices
//!   count back from the end)
//! - polygons, fan-triangulated
//! - `mtllib`/`usemtl`, using the material's `Kd` as vertex color
//!
//! Faces without normals get a flat face normal. Texture V is flipped so that
//! (0,0) is the top-left texel, matching wgpu's texture origin.

use std::collections::HashMap;
use std::path::Path;

use glam::{Vec2, Vec3};

use crate::error::{MeshError, Result};
use crate::mesh::MeshData;

/// Diffuse color per material name
pub type MaterialColors = HashMap<String, Vec3>;

/// Load an OBJ file and any material libraries it references.
///
/// Material libraries are resolved relative to the OBJ file. A missing library is
/// logged and its materials fall back to white.
pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    let source = read(path)?;

    let mut materials = MaterialColors::new();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    for line in source.lines() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("mtllib") {
            continue;
        }
        for lib in parts {
            let lib_path = dir.join(lib);
            match read(&lib_path).and_then(|text| parse_mtl(&text)) {
                Ok(colors) => materials.extend(colors),
                Err(e) => log::warn!("Skipping material library {}: {}", lib_path.display(), e),
            }
        }
    }

    let mesh = parse_obj(&source, &materials)?;
    log::info!(
        "Loaded {} ({} triangles, {} materials)",
        path.display(),
        mesh.triangle_count(),
        materials.len()
    );
    Ok(mesh)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse the `newmtl`/`Kd` pairs of an MTL file
pub fn parse_mtl(source: &str) -> Result<MaterialColors> {
    let mut colors = MaterialColors::new();
    let mut current: Option<String> = None;

    for (index, line) in source.lines().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["newmtl", name, ..] => {
                current = Some(name.to_string());
                colors.entry(name.to_string()).or_insert(Vec3::ONE);
            }
            ["Kd", rest @ ..] => {
                let kd = parse_vec3(rest, index + 1)?;
                if let Some(name) = &current {
                    colors.insert(name.clone(), kd);
                }
            }
            _ => {}
        }
    }

    Ok(colors)
}

/// Per-corner indices of a face, already resolved to zero-based
#[derive(Clone, Copy)]
struct Corner {
    position: usize,
    texcoord: Option<usize>,
    normal: Option<usize>,
}

/// Parse OBJ text. `materials` supplies `usemtl` colors; unknown names are white.
pub fn parse_obj(source: &str, materials: &MaterialColors) -> Result<MeshData> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();

    let mut mesh = MeshData::new();
    let mut texcoords: Vec<Option<Vec2>> = Vec::new();
    let mut color = Vec3::ONE;

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&keyword, args)) = parts.split_first() else {
            continue;
        };

        match keyword {
            "v" => positions.push(parse_vec3(args, line_no)?),
            "vn" => normals.push(parse_vec3(args, line_no)?),
            "vt" => {
                let u = parse_float(args.first(), line_no)?;
                let v = match args.get(1) {
                    Some(_) => parse_float(args.get(1), line_no)?,
                    None => 0.0,
                };
                uvs.push(Vec2::new(u, 1.0 - v));
            }
            "usemtl" => {
                color = args
                    .first()
                    .and_then(|name| materials.get(*name))
                    .copied()
                    .unwrap_or(Vec3::ONE);
            }
            "f" => {
                if args.len() < 3 {
                    return Err(parse_error(line_no, "face needs at least 3 vertices"));
                }
                let corners = args
                    .iter()
                    .map(|token| {
                        parse_corner(token, positions.len(), uvs.len(), normals.len(), line_no)
                    })
                    .collect::<Result<Vec<_>>>()?;

                // Fan triangulation
                for i in 1..corners.len() - 1 {
                    let tri = [corners[0], corners[i], corners[i + 1]];
                    let flat = face_normal(
                        positions[tri[0].position],
                        positions[tri[1].position],
                        positions[tri[2].position],
                    );
                    for corner in tri {
                        let normal = corner.normal.map(|n| normals[n]).unwrap_or(flat);
                        mesh.push(positions[corner.position], color, normal);
                        texcoords.push(corner.texcoord.map(|t| uvs[t]));
                    }
                }
            }
            _ => {}
        }
    }

    if texcoords.iter().any(Option::is_some) {
        mesh.texcoords = texcoords
            .into_iter()
            .map(|t| t.unwrap_or(Vec2::ZERO))
            .collect();
    }

    Ok(mesh)
}

/// Parse one face corner like `3`, `3/1`, `3//2` or `3/1/2`
fn parse_corner(
    token: &str,
    position_count: usize,
    uv_count: usize,
    normal_count: usize,
    line: usize,
) -> Result<Corner> {
    let mut fields = token.split('/');

    let position = match fields.next() {
        Some(field) if !field.is_empty() => resolve_index(field, position_count, line)?,
        _ => return Err(parse_error(line, format!("missing position index in '{}'", token))),
    };
    let texcoord = match fields.next() {
        Some(field) if !field.is_empty() => Some(resolve_index(field, uv_count, line)?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(field) if !field.is_empty() => Some(resolve_index(field, normal_count, line)?),
        _ => None,
    };

    Ok(Corner { position, texcoord, normal })
}

/// OBJ indices are 1-based; negative values count back from the current end
fn resolve_index(field: &str, count: usize, line: usize) -> Result<usize> {
    let raw: i64 = field
        .parse()
        .map_err(|_| parse_error(line, format!("invalid index '{}'", field)))?;

    let resolved = if raw > 0 {
        raw - 1
    } else {
        count as i64 + raw
    };

    if raw == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(parse_error(
            line,
            format!("index {} out of range ({} available)", raw, count),
        ));
    }
    Ok(resolved as usize)
}

fn face_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    let normal = (p1 - p0).cross(p2 - p0);
    if normal.length_squared() > 1e-12 {
        normal.normalize()
    } else {
        Vec3::Y
    }
}

fn parse_float(field: Option<&&str>, line: usize) -> Result<f32> {
    let field = field.ok_or_else(|| parse_error(line, "missing component"))?;
    field
        .parse()
        .map_err(|_| parse_error(line, format!("invalid number '{}'", field)))
}

fn parse_vec3(args: &[&str], line: usize) -> Result<Vec3> {
    Ok(Vec3::new(
        parse_float(args.first(), line)?,
        parse_float(args.get(1), line)?,
        parse_float(args.get(2), line)?,
    ))
}

fn parse_error(line: usize, message: impl Into<String>) -> MeshError {
    MeshError::Parse { line, message: message.into() }
}
