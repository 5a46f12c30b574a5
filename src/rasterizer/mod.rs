//! Software rasterizer
//!
//! Features:
//! - Perspective projection through normalized screen space to pixels
//! - Perspective-correct barycentric interpolation
//! - Z-buffer with a linear NDC depth range of [-1, 1]
//! - Single-pixel DDA lines for wireframes and debug drawing
//! - Directional light with an optional ambient term

mod coords;
mod line;
mod math;
mod render;
mod triangle;
mod types;

pub use coords::*;
pub use line::*;
pub use math::*;
pub use render::*;
pub use triangle::*;
pub use types::*;
