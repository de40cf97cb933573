//! Terrain mesh assembly
//!
//! Each grid cell becomes one quad; the renderer splits it into two triangles.

use indicatif::{ProgressBar, ProgressStyle};

use super::grid::HeightGrid;
use crate::rasterizer::{Renderer, Vec4};

/// Four corners handed to `Renderer::draw_rectangle` in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [Vec4; 4],
}

impl Quad {
    pub fn new(a: Vec4, b: Vec4, c: Vec4, d: Vec4) -> Self {
        Self { corners: [a, b, c, d] }
    }
}

/// Build the quad mesh for an already normalized grid
///
/// Points live in (row, elevation, column) space. Adjacent rows are paired up
/// to the shorter row's length.
pub fn build_terrain(grid: &HeightGrid, elevation: f64) -> Vec<Quad> {
    let mut quads = Vec::new();
    for (ri, pair) in grid.rows.windows(2).enumerate() {
        let (row1, row2) = (&pair[0], &pair[1]);
        let len = row1.len().min(row2.len());
        let r0 = ri as f64;
        let r1 = r0 + 1.0;
        for ci in 0..len.saturating_sub(1) {
            let c0 = ci as f64;
            let c1 = c0 + 1.0;
            let a = Vec4::point(r0, row1[ci] * elevation, c0);
            let b = Vec4::point(r1, row2[ci] * elevation, c0);
            let c = Vec4::point(r0, row1[ci + 1] * elevation, c1);
            let d = Vec4::point(r1, row2[ci + 1] * elevation, c1);
            quads.push(Quad::new(a, b, d, c));
        }
    }
    quads
}

/// Axis-aligned box centred on the origin, open at the front (-z)
pub fn reference_cube(w: f64, h: f64, d: f64) -> Vec<Quad> {
    let lll = Vec4::point(-w, -h, -d);
    let llh = Vec4::point(-w, -h, d);
    let lhl = Vec4::point(-w, h, -d);
    let lhh = Vec4::point(-w, h, d);

    let hll = Vec4::point(w, -h, -d);
    let hlh = Vec4::point(w, -h, d);
    let hhl = Vec4::point(w, h, -d);
    let hhh = Vec4::point(w, h, d);

    vec![
        Quad::new(lll, llh, lhh, lhl), // left
        Quad::new(hll, hhl, hhh, hlh), // right
        Quad::new(lll, hll, hlh, llh), // bottom
        Quad::new(lhl, lhh, hhh, hhl), // top
        Quad::new(llh, hlh, hhh, lhh), // back
    ]
}

/// Draw every quad, optionally ticking a progress bar
pub fn render_quads(renderer: &mut Renderer, quads: &[Quad], show_progress: bool) {
    let progress = if show_progress {
        let bar = ProgressBar::new(quads.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} quads ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    for quad in quads {
        let [a, b, c, d] = quad.corners;
        renderer.draw_rectangle(a, b, c, d);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let stats = renderer.stats();
    log::info!(
        "{} triangles: {} drawn ({} fragments), {} outside viewport, {} degenerate",
        stats.triangles(),
        stats.drawn,
        stats.fragments,
        stats.outside_viewport,
        stats.degenerate
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_quad_per_cell() {
        let grid = HeightGrid::new(vec![vec![0.0; 4], vec![0.0; 4], vec![0.0; 4]]);
        assert_eq!(build_terrain(&grid, 5.0).len(), 2 * 3);
    }

    #[test]
    fn test_ragged_rows_truncate() {
        let grid = HeightGrid::new(vec![vec![0.0; 5], vec![0.0; 2], vec![0.0; 4]]);
        // rows 0/1 share 2 columns -> 1 cell, rows 1/2 share 2 -> 1 cell
        assert_eq!(build_terrain(&grid, 1.0).len(), 2);
        assert!(build_terrain(&HeightGrid::new(vec![vec![1.0, 2.0]]), 1.0).is_empty());
    }

    #[test]
    fn test_corner_layout() {
        let grid = HeightGrid::new(vec![vec![0.0, 0.25], vec![0.5, 1.0]]);
        let quads = build_terrain(&grid, 4.0);
        assert_eq!(
            quads,
            vec![Quad::new(
                Vec4::point(0.0, 0.0, 0.0),
                Vec4::point(1.0, 2.0, 0.0),
                Vec4::point(1.0, 4.0, 1.0),
                Vec4::point(0.0, 1.0, 1.0),
            )]
        );
    }

    #[test]
    fn test_reference_cube_faces() {
        let cube = reference_cube(1.0, 2.0, 3.0);
        assert_eq!(cube.len(), 5);
        for quad in &cube {
            for corner in quad.corners {
                assert_eq!(corner.x.abs(), 1.0);
                assert_eq!(corner.y.abs(), 2.0);
                assert_eq!(corner.z.abs(), 3.0);
            }
        }
    }
}
