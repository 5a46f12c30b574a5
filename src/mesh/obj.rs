//! Wavefront OBJ import
//!
//! Supports `v`, `vt`, `vn` and `f` records. Faces may use `v`, `v/t`, `v//n`
//! or `v/t/n` corners with 1-based or negative (relative) indices. Polygons are
//! fan-triangulated from their first corner. Everything else (groups,
//! materials, smoothing) is ignored.

use std::fs;
use std::path::Path;

use crate::rasterizer::{Mesh, Vec2, Vec3, Vertex};

/// Error type for mesh loading
#[derive(Debug)]
pub enum ObjError {
    IoError(std::io::Error),
    ParseError { line: usize, message: String },
}

impl From<std::io::Error> for ObjError {
    fn from(e: std::io::Error) -> Self {
        ObjError::IoError(e)
    }
}

impl std::fmt::Display for ObjError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjError::IoError(e) => write!(f, "IO error: {}", e),
            ObjError::ParseError { line, message } => write!(f, "Parse error on line {}: {}", line, message),
        }
    }
}

impl std::error::Error for ObjError {}

/// Load a mesh from an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let mesh = parse_obj(&contents)?;
    log::info!(
        "Loaded mesh {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text into an indexed triangle list
pub fn parse_obj(text: &str) -> Result<Mesh, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut texcoords: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for (line_idx, raw) in text.lines().enumerate() {
        let line = line_idx + 1;
        let err = |message: String| ObjError::ParseError { line, message };

        let mut tokens = raw.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, 3).map_err(err)?;
                positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                // A third (w) texture coordinate is allowed and dropped
                let [u, v] = parse_floats::<2>(&mut tokens, 1).map_err(err)?;
                texcoords.push(Vec2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, 3).map_err(err)?;
                normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let mut corners = Vec::new();
                for token in tokens {
                    corners.push(parse_corner(token, &positions, &texcoords, &normals).map_err(err)?);
                }
                if corners.len() < 3 {
                    return Err(err(format!("face has {} corners, need at least 3", corners.len())));
                }

                fill_missing_normals(&mut corners);

                let base = vertices.len() as u32;
                vertices.extend(corners.iter().map(|c| c.vertex));
                for i in 1..corners.len() as u32 - 1 {
                    indices.extend_from_slice(&[base, base + i, base + i + 1]);
                }
            }
            _ => {}
        }
    }

    Ok(Mesh::new(vertices, indices))
}

struct Corner {
    vertex: Vertex,
    has_normal: bool,
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    required: usize,
) -> Result<[f32; N], String> {
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        match tokens.next() {
            Some(t) => {
                *slot = t.parse().map_err(|_| format!("invalid number '{}'", t))?;
            }
            None if i < required => return Err(format!("expected {} numbers, got {}", required, i)),
            None => break,
        }
    }
    Ok(out)
}

fn parse_corner(
    token: &str,
    positions: &[Vec3],
    texcoords: &[Vec2],
    normals: &[Vec3],
) -> Result<Corner, String> {
    let mut parts = token.split('/');

    let pos = match parts.next() {
        Some(p) if !p.is_empty() => positions[resolve(p, positions.len(), "position")?],
        _ => return Err(format!("face corner '{}' has no position", token)),
    };

    let uv = match parts.next() {
        Some(t) if !t.is_empty() => texcoords[resolve(t, texcoords.len(), "texture coordinate")?],
        _ => Vec2::default(),
    };

    let (normal, has_normal) = match parts.next() {
        Some(n) if !n.is_empty() => (normals[resolve(n, normals.len(), "normal")?], true),
        _ => (Vec3::ZERO, false),
    };

    Ok(Corner {
        vertex: Vertex::new(pos, uv, normal),
        has_normal,
    })
}

/// Turn a 1-based or negative OBJ index into a slice index
fn resolve(token: &str, len: usize, kind: &str) -> Result<usize, String> {
    let idx: i64 = token
        .parse()
        .map_err(|_| format!("invalid {} index '{}'", kind, token))?;

    let resolved = if idx > 0 {
        idx - 1
    } else if idx < 0 {
        len as i64 + idx
    } else {
        return Err(format!("{} index 0 is not valid", kind));
    };

    if resolved < 0 || resolved >= len as i64 {
        return Err(format!("{} index {} out of range ({} defined)", kind, idx, len));
    }
    Ok(resolved as usize)
}

/// Corners without a normal get the face normal
fn fill_missing_normals(corners: &mut [Corner]) {
    if corners.iter().all(|c| c.has_normal) {
        return;
    }

    let p0 = corners[0].vertex.pos;
    let n = (corners[1].vertex.pos - p0).cross(corners[2].vertex.pos - p0);
    let face_normal = if n.len() > 0.0 { n.normalize() } else { Vec3::ZERO };

    for c in corners.iter_mut().filter(|c| !c.has_normal) {
        c.vertex.normal = face_normal;
    }
}
