//! Mesh loading
//!
//! Turns Wavefront OBJ text into the indexed triangle lists the rasterizer draws.

mod obj;

pub use obj::*;
