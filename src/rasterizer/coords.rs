//! Coordinate conversions: world space, normalized screen space, pixels
//!
//! Screen space spans `[-range_x, range_x] x [-range_y, range_y]` and maps
//! affinely onto the pixel grid. Pixel `p` covers the screen interval whose
//! center is `pixel_to_screen(p)`, and `screen_to_pixel` rounds to the nearest
//! such center, so the two maps round-trip exactly on valid pixels.

use serde::{Serialize, Deserialize};
use super::math::Vec3;

/// Output size in pixels.
///
/// Only built through `new`, so both dimensions are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "resolution must be at least 1x1");
        Self { width, height }
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn contains(self, p: PixelCoords) -> bool {
        p.x < self.width && p.y < self.height
    }

    /// Row-major index of a pixel
    pub fn index(self, p: PixelCoords) -> usize {
        assert!(
            self.contains(p),
            "pixel ({}, {}) outside {}x{}",
            p.x, p.y, self.width, self.height
        );
        p.y as usize * self.width as usize + p.x as usize
    }
}

/// Integer pixel position, valid when inside the owning `Resolution`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCoords {
    pub x: u32,
    pub y: u32,
}

impl PixelCoords {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Normalized projective screen position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenCoords {
    pub x: f32,
    pub y: f32,
}

impl ScreenCoords {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Principal rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Maps between world, screen and pixel coordinates for one resolution
#[derive(Debug, Clone)]
pub struct CoordsCounter {
    resolution: Resolution,
    range_x: f32,
    range_y: f32,
    distance: f32,
    /// Half a pixel, in screen units
    half_step_x: f32,
    half_step_y: f32,
}

impl CoordsCounter {
    /// Unit screen range and a 90 degree field of view
    pub fn new(resolution: Resolution) -> Self {
        Self::with_range(resolution, 1.0, 1.0, 1.0)
    }

    pub fn with_range(resolution: Resolution, range_x: f32, range_y: f32, distance: f32) -> Self {
        assert!(range_x > 0.0 && range_y > 0.0, "screen range must be positive");
        Self {
            resolution,
            range_x,
            range_y,
            distance,
            half_step_x: range_x / resolution.width as f32,
            half_step_y: range_y / resolution.height as f32,
        }
    }

    /// Unit screen range with `distance = 1 / tan(fov / 2)`
    pub fn with_fov(resolution: Resolution, fov: f32) -> Self {
        Self::with_range(resolution, 1.0, 1.0, distance_for_fov(1.0, fov))
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Perspective projection of a camera-space point (camera looks down -z).
    ///
    /// The point must not lie in the camera plane (`z == 0`).
    pub fn world_to_screen(&self, p: Vec3) -> ScreenCoords {
        debug_assert!(p.z != 0.0, "point lies in the camera plane");
        ScreenCoords {
            x: self.distance * p.x / -p.z,
            y: self.distance * p.y / -p.z,
        }
    }

    /// Nearest pixel to a screen position inside the configured range
    pub fn screen_to_pixel(&self, s: ScreenCoords) -> PixelCoords {
        debug_assert!(s.x.abs() <= self.range_x, "screen x {} out of range", s.x);
        debug_assert!(s.y.abs() <= self.range_y, "screen y {} out of range", s.y);

        PixelCoords {
            x: to_pixel(s.x, self.range_x, self.resolution.width),
            y: to_pixel(s.y, self.range_y, self.resolution.height),
        }
    }

    /// Screen position of a pixel center
    pub fn pixel_to_screen(&self, p: PixelCoords) -> ScreenCoords {
        assert!(self.resolution.contains(p), "pixel ({}, {}) out of range", p.x, p.y);

        let w = self.resolution.width as f32;
        let h = self.resolution.height as f32;
        ScreenCoords {
            x: 2.0 * self.range_x * p.x as f32 / w - self.range_x + self.half_step_x,
            y: 2.0 * self.range_y * p.y as f32 / h - self.range_y + self.half_step_y,
        }
    }

    pub fn world_to_pixel(&self, p: Vec3) -> PixelCoords {
        self.screen_to_pixel(self.world_to_screen(p))
    }
}

/// Right-hand rotation of `p` by `angle` radians about a principal axis
pub fn rotate(p: Vec3, angle: f32, axis: Axis) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    match axis {
        Axis::X => Vec3::new(p.x, cos * p.y - sin * p.z, sin * p.y + cos * p.z),
        Axis::Y => Vec3::new(cos * p.x + sin * p.z, p.y, cos * p.z - sin * p.x),
        Axis::Z => Vec3::new(cos * p.x - sin * p.y, sin * p.x + cos * p.y, p.z),
    }
}

/// Projection distance giving `fov` radians across a screen half-extent of `range`
pub fn distance_for_fov(range: f32, fov: f32) -> f32 {
    range / (fov * 0.5).tan()
}

fn to_pixel(coord: f32, range: f32, extent: u32) -> u32 {
    debug_assert!(extent > 0);
    // Shift by half a pixel so rounding lands on pixel centers
    let p = ((coord + range) * extent as f32 / (2.0 * range) - 0.5).round();
    p.clamp(0.0, (extent - 1) as f32) as u32
}
