//! Output sinks for finished frames
//!
//! - `device` - raw framebuffer devices (or plain files), B,G,R,A bytes
//! - `snapshot` - PNG images of a single frame

mod device;
mod snapshot;

pub use device::*;
pub use snapshot::*;

/// Error type for frame output
#[derive(Debug)]
pub enum OutputError {
    IoError(std::io::Error),
    ImageError(image::ImageError),
    SizeMismatch { expected: usize, actual: usize },
}

impl From<std::io::Error> for OutputError {
    fn from(e: std::io::Error) -> Self {
        OutputError::IoError(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::ImageError(e)
    }
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::IoError(e) => write!(f, "IO error: {}", e),
            OutputError::ImageError(e) => write!(f, "Image error: {}", e),
            OutputError::SizeMismatch { expected, actual } => {
                write!(f, "Frame is {} bytes, expected {}", actual, expected)
            }
        }
    }
}

impl std::error::Error for OutputError {}
