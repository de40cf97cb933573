//! Software rasterizer
//!
//! Features:
//! - Homogeneous 4x4 transforms (perspective + look-at camera)
//! - Edge-function scan conversion with a lenient inclusion tolerance
//! - Plane-derived per-pixel depth and a z-buffer
//! - Flat directional shading in grayscale

mod math;
mod camera;
mod scan;
mod types;
mod render;

pub use math::*;
pub use camera::*;
pub use scan::*;
pub use types::*;
pub use render::*;

/// Default output dimensions
pub const WIDTH: usize = 640;
pub const HEIGHT: usize = 640;
