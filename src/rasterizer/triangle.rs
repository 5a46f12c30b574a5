//! Triangle rasterization with perspective-correct barycentrics
//!
//! Input vertices are in clip space (before the perspective divide). Coverage
//! is tested with edge functions at pixel centers, depth is interpolated
//! linearly in NDC, and the emitted weights are corrected by `1/w` so that
//! attributes interpolate linearly in camera space.

use super::coords::{CoordsCounter, PixelCoords, Resolution, ScreenCoords};
use super::math::{Vec2, Vec3, Vec4};

/// Bounding-box clamp keeps coordinates strictly inside the screen range
const CLAMP_EPS: f32 = 1e-6;

/// A covered pixel with everything needed to depth-test and shade it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub x: u32,
    pub y: u32,
    /// Linear NDC depth, -1 at the near plane and 1 at the far plane
    pub depth: f32,
    /// Perspective-corrected weight of vertex 1
    pub b: f32,
    /// Perspective-corrected weight of vertex 2
    pub c: f32,
}

impl Fragment {
    /// Perspective-corrected weight of vertex 0
    pub fn a(&self) -> f32 {
        1.0 - self.b - self.c
    }

    /// All three weights, in vertex order
    pub fn weights(&self) -> [f32; 3] {
        [self.a(), self.b, self.c]
    }

    pub fn pixel(&self) -> PixelCoords {
        PixelCoords::new(self.x, self.y)
    }
}

/// Converts clip-space triangles into fragments for one output resolution
#[derive(Debug, Clone)]
pub struct Rasterizer {
    coords: CoordsCounter,
}

impl Rasterizer {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            coords: CoordsCounter::new(resolution),
        }
    }

    /// Append the fragments covered by `vs` to `out`.
    ///
    /// Returns the number of fragments emitted. Degenerate triangles (zero or
    /// non-finite signed area) emit nothing.
    pub fn rasterize(&self, vs: &[Vec4; 3], out: &mut Vec<Fragment>) -> usize {
        let v: [Vec3; 3] = [vs[0].to_ndc(), vs[1].to_ndc(), vs[2].to_ndc()];
        if !v.iter().all(|p| p.is_finite()) {
            log::trace!("skipping triangle with a vertex on the camera plane");
            return 0;
        }

        let e1 = v[1].xy() - v[0].xy();
        let e2 = v[2].xy() - v[0].xy();

        let det = e1.cross(e2);
        if det == 0.0 || !det.is_finite() {
            log::trace!("skipping degenerate triangle");
            return 0;
        }

        let min_x = v[0].x.min(v[1].x).min(v[2].x);
        let max_x = v[0].x.max(v[1].x).max(v[2].x);
        let min_y = v[0].y.min(v[1].y).min(v[2].y);
        let max_y = v[0].y.max(v[1].y).max(v[2].y);

        let lo = self.coords.screen_to_pixel(ScreenCoords::new(clamp_ndc(min_x), clamp_ndc(min_y)));
        let hi = self.coords.screen_to_pixel(ScreenCoords::new(clamp_ndc(max_x), clamp_ndc(max_y)));

        let before = out.len();
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                let s = self.coords.pixel_to_screen(PixelCoords::new(x, y));
                let p = Vec2::new(s.x, s.y) - v[0].xy();

                let b0 = p.cross(e2) / det;
                let c0 = e1.cross(p) / det;
                let a0 = 1.0 - b0 - c0;

                // Pixels exactly on an edge belong to neither neighbour
                if !(a0 > 0.0 && b0 > 0.0 && c0 > 0.0) {
                    continue;
                }

                let depth = a0 * v[0].z + b0 * v[1].z + c0 * v[2].z;

                let a = a0 / vs[0].w;
                let b = b0 / vs[1].w;
                let c = c0 / vs[2].w;
                let sum = a + b + c;

                out.push(Fragment {
                    x,
                    y,
                    depth,
                    b: b / sum,
                    c: c / sum,
                });
            }
        }

        out.len() - before
    }
}

fn clamp_ndc(x: f32) -> f32 {
    x.clamp(-1.0 + CLAMP_EPS, 1.0 - CLAMP_EPS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashSet};

    fn rasterize(res: Resolution, vs: [Vec4; 3]) -> Vec<Fragment> {
        let mut out = Vec::new();
        let n = Rasterizer::new(res).rasterize(&vs, &mut out);
        assert_eq!(n, out.len());
        out
    }

    fn reference_triangle() -> [Vec4; 3] {
        [
            Vec4::new(-1.0, -1.0, -5.0, 1.0),
            Vec4::new(1.0, -1.0, -5.0, 1.0),
            Vec4::new(0.0, 1.0, -5.0, 1.0),
        ]
    }

    #[test]
    fn test_reference_triangle_coverage() {
        let res = Resolution::new(64, 64);
        let frags = rasterize(res, reference_triangle());
        assert!(!frags.is_empty());

        // Half the screen, within a rounding band along the two slanted edges
        let expected = (64 * 64) as f32 / 2.0;
        let got = frags.len() as f32;
        assert!((got - expected).abs() < 64.0 * 2.0, "got {} fragments", got);

        for f in &frags {
            assert!(res.contains(f.pixel()));
            assert!((f.depth + 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_reference_triangle_rows_are_contiguous() {
        let frags = rasterize(Resolution::new(48, 32), reference_triangle());

        let mut rows: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for f in &frags {
            rows.entry(f.y).or_default().push(f.x);
        }

        for xs in rows.values_mut() {
            xs.sort_unstable();
            for pair in xs.windows(2) {
                assert_eq!(pair[1], pair[0] + 1, "gap in scanline");
            }
        }
    }

    #[test]
    fn test_no_duplicate_pixels() {
        let frags = rasterize(
            Resolution::new(40, 30),
            [
                Vec4::new(-0.9, -0.8, 0.1, 1.0),
                Vec4::new(0.7, -0.2, 0.3, 2.0),
                Vec4::new(-0.1, 0.95, 0.5, 1.5),
            ],
        );
        let unique: HashSet<_> = frags.iter().map(|f| (f.x, f.y)).collect();
        assert_eq!(unique.len(), frags.len());
    }

    #[test]
    fn test_winding_does_not_matter() {
        let res = Resolution::new(32, 32);
        let [a, b, c] = reference_triangle();
        let mut ccw: Vec<_> = rasterize(res, [a, b, c]).iter().map(|f| (f.x, f.y)).collect();
        let mut cw: Vec<_> = rasterize(res, [a, c, b]).iter().map(|f| (f.x, f.y)).collect();
        ccw.sort_unstable();
        cw.sort_unstable();
        assert_eq!(ccw, cw);
    }

    #[test]
    fn test_degenerate_triangle_emits_nothing() {
        let res = Resolution::new(16, 16);
        let collinear = [
            Vec4::new(-0.5, -0.5, 0.0, 1.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(0.5, 0.5, 0.0, 1.0),
        ];
        assert!(rasterize(res, collinear).is_empty());

        let point = [Vec4::new(0.1, 0.1, 0.0, 1.0); 3];
        assert!(rasterize(res, point).is_empty());
    }

    #[test]
    fn test_behind_camera_stays_in_bounds() {
        let res = Resolution::new(20, 10);

        let zero_w = [
            Vec4::new(-1.0, -1.0, 0.0, 0.0),
            Vec4::new(1.0, -1.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
        ];
        assert!(rasterize(res, zero_w).is_empty());

        let negative_w = [
            Vec4::new(-1.0, -1.0, 0.5, -1.0),
            Vec4::new(1.0, -1.0, 0.5, -2.0),
            Vec4::new(0.0, 1.0, 0.5, -1.5),
        ];
        for f in rasterize(res, negative_w) {
            assert!(res.contains(f.pixel()));
        }
    }

    #[test]
    fn test_offscreen_triangle_stays_in_bounds() {
        let res = Resolution::new(20, 10);

        // Entirely to the right of the screen
        let right = [
            Vec4::new(2.0, -0.5, 0.0, 1.0),
            Vec4::new(3.0, -0.5, 0.0, 1.0),
            Vec4::new(2.5, 0.5, 0.0, 1.0),
        ];
        for f in rasterize(res, right) {
            assert!(res.contains(f.pixel()));
        }
        assert!(rasterize(res, right).is_empty());

        // Much larger than the screen, covers all of it
        let huge = [
            Vec4::new(-10.0, -10.0, 0.0, 1.0),
            Vec4::new(30.0, -10.0, 0.0, 1.0),
            Vec4::new(-10.0, 30.0, 0.0, 1.0),
        ];
        let frags = rasterize(res, huge);
        assert_eq!(frags.len(), res.pixel_count());
        for f in frags {
            assert!(res.contains(f.pixel()));
        }
    }

    #[test]
    fn test_weights_are_normalized() {
        let frags = rasterize(
            Resolution::new(32, 32),
            [
                Vec4::new(-0.8, -0.8, 0.0, 1.0),
                Vec4::new(3.2, -1.6, 2.0, 4.0),
                Vec4::new(0.0, 1.6, 1.0, 2.0),
            ],
        );
        assert!(!frags.is_empty());
        for f in frags {
            assert!(f.a() > 0.0 && f.b > 0.0 && f.c > 0.0);
            assert!((f.a() + f.b + f.c - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_perspective_correction() {
        // Same screen-space triangle, vertex 1 pushed four times as far away.
        // Its camera-space attribute share must shrink relative to the affine weight.
        let res = Resolution::new(32, 32);
        let flat = rasterize(
            res,
            [
                Vec4::new(-0.8, -0.8, 0.0, 1.0),
                Vec4::new(0.8, -0.8, 0.0, 1.0),
                Vec4::new(0.0, 0.8, 0.0, 1.0),
            ],
        );
        let deep = rasterize(
            res,
            [
                Vec4::new(-0.8, -0.8, 0.0, 1.0),
                Vec4::new(3.2, -3.2, 0.0, 4.0),
                Vec4::new(0.0, 0.8, 0.0, 1.0),
            ],
        );
        assert_eq!(flat.len(), deep.len());

        for (f, d) in flat.iter().zip(&deep) {
            assert_eq!((f.x, f.y), (d.x, d.y));
            assert!(d.b < f.b);

            // Undo the correction: b0/w1 relative to a0/w0 and c0/w2
            let a0 = f.a();
            let expected_b = (f.b / 4.0) / (a0 + f.b / 4.0 + f.c);
            assert!((d.b - expected_b).abs() < 1e-4);
        }
    }
}
