//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use super::math::{Vec2, Vec3};

/// 8-bit color, laid out B,G,R,A to match a packed 32-bit framebuffer pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert unit-range channels to bytes (`channel * 255`, truncated)
    pub fn from_unit(rgb: Rgb, alpha: u8) -> Self {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
        Self {
            r: to_byte(rgb.r),
            g: to_byte(rgb.g),
            b: to_byte(rgb.b),
            a: alpha,
        }
    }

    /// Framebuffer byte order
    pub fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }

    pub fn from_bgra(bytes: [u8; 4]) -> Self {
        Self { b: bytes[0], g: bytes[1], r: bytes[2], a: bytes[3] }
    }

    /// Byte order expected by textures and PNG files
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear material color, each channel in 0.0-1.0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Multiply by light intensity
    pub fn shade(self, intensity: f32) -> Self {
        Self {
            r: self.r * intensity,
            g: self.g * intensity,
            b: self.b * intensity,
        }
    }
}

/// A vertex with position, texture coordinate, and normal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self { pos, uv, normal }
    }

    /// Blend three vertices with barycentric weights `[a, b, c]`
    pub fn mix(vs: &[Vertex; 3], [a, b, c]: [f32; 3]) -> Vertex {
        Vertex {
            pos: vs[0].pos * a + vs[1].pos * b + vs[2].pos * c,
            uv: vs[0].uv * a + vs[1].uv * b + vs[2].uv * c,
            normal: vs[0].normal * a + vs[1].normal * b + vs[2].normal * c,
        }
    }
}

/// Indexed triangle list
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    /// Three indices per triangle
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0);
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate the triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Unit cube centered on the origin, two triangles per face, outward normals
    pub fn cube() -> Self {
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        let positions = [
            // Front face
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            // Back face
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            // Top face
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.5, 0.5, -0.5),
            // Bottom face
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            // Right face
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            // Left face
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, -0.5),
        ];

        // Front, back, top, bottom, right, left
        let normals = [Vec3::Z, -Vec3::Z, Vec3::UP, -Vec3::UP, Vec3::X, -Vec3::X];

        let uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];

        for (face_idx, normal) in normals.iter().enumerate() {
            let base = face_idx * 4;
            for i in 0..4 {
                vertices.push(Vertex::new(positions[base + i], uvs[i], *normal));
            }

            let base = base as u32;
            indices.extend_from_slice(&[base, base + 1, base + 2]);
            indices.extend_from_slice(&[base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }
}

/// Frame compositor settings
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Horizontal field of view in radians
    pub fov: f32,
    /// Near clipping distance (camera space, positive)
    pub near: f32,
    /// Far clipping distance (camera space, positive)
    pub far: f32,
    /// Direction towards the light, in camera space
    pub light_dir: Vec3,
    /// Ambient light intensity (0.0-1.0)
    pub ambient: f32,
    /// Base surface color
    pub material: Rgb,
    /// Alpha written with every shaded pixel
    pub alpha: u8,
    /// Draw triangle edges over the shaded surface
    pub wireframe: bool,
    pub wire_color: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_2,
            near: 0.5,
            far: 15.0,
            light_dir: Vec3::Z,
            ambient: 0.0,
            material: Rgb::new(1.0, 0.0, 0.5),
            alpha: 255,
            wireframe: false,
            wire_color: Color::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_bgra_layout() {
        let c = Color::new(10, 20, 30);
        assert_eq!(c.to_bgra(), [30, 20, 10, 255]);
        assert_eq!(c.to_rgba(), [10, 20, 30, 255]);
        assert_eq!(Color::from_bgra(c.to_bgra()), c);
    }

    #[test]
    fn test_color_from_unit_truncates() {
        let c = Color::from_unit(Rgb::new(0.5, 0.0, 1.0), 255);
        assert_eq!(c, Color::new(127, 0, 255));
        assert_eq!(Color::from_unit(Rgb::new(0.999, 0.0, 0.0), 7).r, 254);
        assert_eq!(Color::from_unit(Rgb::new(0.0, 0.0, 0.0), 7).a, 7);
    }

    #[test]
    fn test_vertex_mix_weights() {
        let vs = [
            Vertex::new(Vec3::new(0.0, 0.0, 0.0), Vec2::new(0.0, 0.0), Vec3::X),
            Vertex::new(Vec3::new(1.0, 0.0, 0.0), Vec2::new(1.0, 0.0), Vec3::UP),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), Vec2::new(0.0, 1.0), Vec3::Z),
        ];
        let m = Vertex::mix(&vs, [0.25, 0.25, 0.5]);
        assert_eq!(m.pos, Vec3::new(0.25, 0.5, 0.0));
        assert_eq!(m.uv, Vec2::new(0.25, 0.5));
        assert_eq!(m.normal, Vec3::new(0.25, 0.25, 0.5));

        assert_eq!(Vertex::mix(&vs, [1.0, 0.0, 0.0]), vs[0]);
    }

    #[test]
    fn test_cube_mesh() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.triangle_count(), 12);

        // Every triangle winds so its geometric normal agrees with the vertex normal
        for [a, b, c] in cube.triangles() {
            let n = (b.pos - a.pos).cross(c.pos - a.pos);
            assert!(n.dot(a.normal) > 0.0);
        }
    }
}
