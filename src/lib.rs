//! Terrain Raster: height-field rendering through a software pipeline
//!
//! - Homogeneous vector/matrix algebra with a perspective look-at camera
//! - Edge-function triangle scan with plane-derived depth and a z-buffer
//! - Flat directional shading in grayscale
//! - Delimited height grids turned into quad meshes, written out as PNG

pub mod config;
pub mod error;
pub mod rasterizer;
pub mod terrain;

pub use config::{load_config, load_config_from_str, save_config, RenderConfig};
pub use error::{ConfigError, GridError, MathError, RenderError};
