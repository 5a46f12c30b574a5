//! Single-pixel-wide DDA lines
//!
//! Steps one pixel at a time along the dominant axis and rounds the other
//! coordinate, so each column (or row) of the line holds exactly one pixel.

use super::coords::PixelCoords;

/// Pixels of the segment between two endpoints, both inclusive
#[derive(Debug, Clone)]
pub struct Line {
    x_major: bool,
    initial: i64,
    iter_start: i64,
    iter_end: i64,
    slope: f32,
    next: i64,
}

impl Line {
    pub fn new(start: PixelCoords, end: PixelCoords) -> Self {
        let dx = end.x as i64 - start.x as i64;
        let dy = end.y as i64 - start.y as i64;

        // Ties go to x
        let x_major = dx.abs() >= dy.abs();

        let (start, end) = if (x_major && start.x > end.x) || (!x_major && start.y > end.y) {
            (end, start)
        } else {
            (start, end)
        };

        let (initial, iter_start, iter_end, minor_delta) = if x_major {
            (start.y as i64, start.x as i64, end.x as i64, end.y as i64 - start.y as i64)
        } else {
            (start.x as i64, start.y as i64, end.y as i64, end.x as i64 - start.x as i64)
        };

        // Identical endpoints: one pixel, no slope
        let dominant_delta = iter_end - iter_start;
        let slope = if dominant_delta == 0 {
            0.0
        } else {
            minor_delta as f32 / dominant_delta as f32
        };

        Self {
            x_major,
            initial,
            iter_start,
            iter_end,
            slope,
            next: iter_start,
        }
    }
}

impl Iterator for Line {
    type Item = PixelCoords;

    fn next(&mut self) -> Option<PixelCoords> {
        if self.next > self.iter_end {
            return None;
        }

        let i = self.next;
        self.next += 1;

        let j = self.initial + (self.slope * (i - self.iter_start) as f32).round() as i64;
        Some(if self.x_major {
            PixelCoords::new(i as u32, j as u32)
        } else {
            PixelCoords::new(j as u32, i as u32)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.iter_end - self.next + 1).max(0) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Line {}
