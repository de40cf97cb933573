//! Terrain module - height grid input and quad mesh generation
//!
//! - Delimited text loading with ragged-row tolerance
//! - Normalization against the global extremes
//! - One quad per grid cell, scaled by an elevation factor

mod grid;
mod mesh;

pub use grid::*;
pub use mesh::*;
