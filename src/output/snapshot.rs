//! PNG snapshots of the framebuffer

use std::path::Path;

use image::{Rgba, RgbaImage};

use super::OutputError;
use crate::rasterizer::{Framebuffer, PixelCoords};

/// Save the current frame as a PNG file
pub fn save_png<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<(), OutputError> {
    let path = path.as_ref();
    let img = RgbaImage::from_fn(fb.width(), fb.height(), |x, y| {
        Rgba(fb.pixel(PixelCoords::new(x, y)).to_rgba())
    });
    img.save(path)?;

    log::info!("Saved snapshot {} ({}x{})", path.display(), fb.width(), fb.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Color, Resolution};

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        let mut fb = Framebuffer::new(Resolution::new(3, 2));
        fb.clear(Color::BLACK);
        fb.set_pixel(PixelCoords::new(2, 1), Color::new(200, 100, 50));
        save_png(&fb, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [200, 100, 50, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_snapshot_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let fb = Framebuffer::new(Resolution::new(1, 1));
        assert!(save_png(&fb, dir.path().join("missing/frame.png")).is_err());
    }
}
