//! Raw framebuffer device writer

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::OutputError;
use crate::rasterizer::{Framebuffer, Resolution};

/// Mirrors frames into a device such as `/dev/fb0`, one full frame per flush.
///
/// The device is closed when the writer is dropped.
pub struct DeviceWriter {
    file: File,
    path: PathBuf,
    resolution: Resolution,
}

impl DeviceWriter {
    /// Open `path` for writing without truncating it (devices cannot be truncated)
    pub fn open<P: AsRef<Path>>(path: P, resolution: Resolution) -> Result<Self, OutputError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().write(true).create(true).truncate(false).open(&path)?;
        log::info!("Opened output device {} ({}x{})", path.display(), resolution.width(), resolution.height());
        Ok(Self { file, path, resolution })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole frame at offset 0 and rewind for the next one
    pub fn flush(&mut self, fb: &Framebuffer) -> Result<(), OutputError> {
        let bytes = fb.as_bgra();
        if fb.resolution() != self.resolution {
            return Err(OutputError::SizeMismatch {
                expected: self.resolution.pixel_count() * 4,
                actual: bytes.len(),
            });
        }

        self.file.write_all(bytes)?;
        self.file.flush()?;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Color, PixelCoords};

    #[test]
    fn test_flush_overwrites_from_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fb0");
        let res = Resolution::new(2, 2);

        let mut fb = Framebuffer::new(res);
        let mut writer = DeviceWriter::open(&path, res).unwrap();
        assert_eq!(writer.path(), path.as_path());

        fb.clear(Color::new(255, 0, 0));
        writer.flush(&fb).unwrap();
        fb.set_pixel(PixelCoords::new(1, 0), Color::new(1, 2, 3));
        writer.flush(&fb).unwrap();
        drop(writer);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &[0, 0, 255, 255]);
        assert_eq!(&bytes[4..8], &[3, 2, 1, 255]);
    }

    #[test]
    fn test_flush_rejects_wrong_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DeviceWriter::open(dir.path().join("fb0"), Resolution::new(4, 4)).unwrap();
        let fb = Framebuffer::new(Resolution::new(2, 2));
        assert!(matches!(
            writer.flush(&fb),
            Err(OutputError::SizeMismatch { expected: 64, actual: 16 })
        ));
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = DeviceWriter::open(dir.path().join("no/such/dir/fb0"), Resolution::new(1, 1));
        assert!(matches!(result, Err(OutputError::IoError(_))));
    }
}
