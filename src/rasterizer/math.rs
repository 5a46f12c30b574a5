//! Vector math for 3D rendering
//!
//! Small `Copy` value types: `Vec2`, `Vec3`, `Vec4` and a row-major `Mat3`.

use std::ops::{Add, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const X: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// The zero vector has no direction; normalizing it is a caller bug.
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        debug_assert!(l > 0.0, "normalize of a zero-length vector");
        self.scale(1.0 / l)
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Drop the z component
    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        self.scale(-1.0)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// 2D Vector (texture coordinates, screen-space edges)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Signed area of the parallelogram spanned by `self` and `other`
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - other.x * self.y
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

/// Homogeneous clip-space position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Perspective divide
    pub fn to_ndc(self) -> Vec3 {
        Vec3::new(self.x / self.w, self.y / self.w, self.z / self.w)
    }
}

/// Row-major 3x3 matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub rows: [Vec3; 3],
}

impl Mat3 {
    pub fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self { rows: [r0, r1, r2] }
    }

    /// Camera orientation looking along `dir` with `up` as the rough up vector.
    ///
    /// Rows are the orthonormal basis (right, up, dir) with
    /// `right = up x dir` and the up vector recomputed as `dir x right`.
    /// `up` must not be parallel to `dir`.
    pub fn rotate(dir: Vec3, up: Vec3) -> Mat3 {
        let dir = dir.normalize();
        let right = up.cross(dir).normalize();
        let upper = dir.cross(right).normalize();
        Mat3::from_rows(right, upper, dir)
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        Vec3 {
            x: self.rows[0].dot(v),
            y: self.rows[1].dot(v),
            z: self.rows[2].dot(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).len() < 1e-5
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = Vec3::new(3.0, 4.0, 12.0).normalize();
        assert!((n.len() - 1.0).abs() < 1e-6);
        assert!(approx(n, Vec3::new(3.0 / 13.0, 4.0 / 13.0, 12.0 / 13.0)));
    }

    #[test]
    fn test_vec2_signed_area() {
        let a = Vec2::new(2.0, 0.0);
        let b = Vec2::new(0.0, 3.0);
        assert_eq!(a.cross(b), 6.0);
        assert_eq!(b.cross(a), -6.0);
    }

    #[test]
    fn test_vec4_perspective_divide() {
        let v = Vec4::new(2.0, -4.0, 1.0, -2.0).to_ndc();
        assert_eq!(v, Vec3::new(-1.0, 2.0, -0.5));
    }

    #[test]
    fn test_rotate_looking_down_z_is_identity() {
        let m = Mat3::rotate(Vec3::new(0.0, 0.0, 5.0), Vec3::UP);
        assert!(approx(m.rows[0], Vec3::X));
        assert!(approx(m.rows[1], Vec3::UP));
        assert!(approx(m.rows[2], Vec3::Z));
    }

    #[test]
    fn test_rotate_is_orthonormal_and_right_handed() {
        let m = Mat3::rotate(Vec3::new(1.0, 2.0, -0.5), Vec3::new(0.3, 1.0, 0.1));
        let [r, u, d] = m.rows;
        assert!(r.dot(u).abs() < 1e-5);
        assert!(r.dot(d).abs() < 1e-5);
        assert!(u.dot(d).abs() < 1e-5);
        assert!(approx(r.cross(u), d));

        // Rotations preserve length
        let p = Vec3::new(0.7, -1.2, 3.0);
        assert!(((m * p).len() - p.len()).abs() < 1e-5);
    }

    #[test]
    fn test_mat3_vec_multiply() {
        let m = Mat3::from_rows(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 2.0),
        );
        assert_eq!(m * Vec3::new(1.0, 1.0, 1.0), Vec3::new(6.0, 1.0, 1.0));
    }
}
