//! Edge-function triangle scan
//!
//! Walks the pixel grid of a screen-space triangle's bounding box (grown by one
//! pixel on every side) row by row and stops on each pixel whose centre passes
//! the containment test. Depth at the centre comes from the triangle's
//! supporting plane.

use serde::{Serialize, Deserialize};

use super::math::{plane, Vec4};

/// Default edge-inclusion tolerance. Slightly over-includes boundary pixels so
/// triangles sharing an edge leave no seam.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// How a pixel's depth is derived from the supporting plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepthInterpolation {
    /// `z = -(nx*x + ny*y + d) / nz`
    #[default]
    Plane,
    /// `z = -(nx*x + nx*y + d)`, reproduces older renders bit for bit
    Legacy,
}

/// Integer pixel coordinate. May lie one pixel outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Centre of the pixel in screen space
    pub fn center(self) -> (f64, f64) {
        (self.x as f64 + 0.5, self.y as f64 + 0.5)
    }
}

/// Signed area test of `p` against the directed edge (u, v)
#[inline]
pub fn edge_sign(p: Vec4, u: Vec4, v: Vec4) -> f64 {
    (p.x - v.x) * (u.y - v.y) - (u.x - v.x) * (p.y - v.y)
}

/// Scan state for one triangle
#[derive(Debug, Clone)]
pub struct TriangleScan {
    a: Vec4,
    b: Vec4,
    c: Vec4,
    tolerance: f64,
    depth: DepthInterpolation,
    // Supporting plane; None when no pixel can be produced
    plane: Option<Vec4>,

    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,

    cursor: Pixel,
    current: Option<(Pixel, Vec4)>,
}

impl TriangleScan {
    pub fn new(a: Vec4, b: Vec4, c: Vec4, tolerance: f64, depth: DepthInterpolation) -> Self {
        let plane = plane(a, b, c).ok().filter(|p| match depth {
            DepthInterpolation::Plane => p.z.abs() > 1e-12,
            DepthInterpolation::Legacy => true,
        });

        let min_x = a.x.min(b.x).min(c.x).floor() as i32 - 1;
        let min_y = a.y.min(b.y).min(c.y).floor() as i32 - 1;
        let max_x = a.x.max(b.x).max(c.x).floor() as i32 + 1;
        let max_y = a.y.max(b.y).max(c.y).floor() as i32 + 1;

        let mut scan = Self {
            a,
            b,
            c,
            tolerance,
            depth,
            plane,
            min_x,
            min_y,
            max_x,
            max_y,
            cursor: Pixel::new(min_x, min_y),
            current: None,
        };
        scan.restart();
        scan
    }

    /// Rewind to the first accepted pixel
    pub fn restart(&mut self) {
        self.cursor = Pixel::new(self.min_x, self.min_y);
        self.current = None;
        if self.plane.is_some() {
            self.seek();
        } else {
            self.cursor.y = self.max_y + 1;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.current.is_none()
    }

    /// Pixel under the cursor and its point (pixel centre, plane depth)
    pub fn current(&self) -> Option<(Pixel, Vec4)> {
        self.current
    }

    /// Move to the next accepted pixel
    pub fn advance(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.step();
        self.seek();
    }

    /// Containment test for the centre of `pixel`
    pub fn contains(&self, pixel: Pixel) -> bool {
        let (x, y) = pixel.center();
        let p = Vec4::point(x, y, 0.0);
        let t = self.tolerance;
        let b1 = edge_sign(p, self.a, self.b) <= t;
        let b2 = edge_sign(p, self.b, self.c) <= t;
        let b3 = edge_sign(p, self.c, self.a) <= t;
        b1 == b2 && b2 == b3
    }

    fn step(&mut self) {
        self.cursor.x += 1;
        if self.cursor.x > self.max_x {
            self.cursor.x = self.min_x;
            self.cursor.y += 1;
        }
    }

    // Settle on the first accepted pixel at or after the cursor
    fn seek(&mut self) {
        self.current = None;
        let Some(plane) = self.plane else {
            return;
        };
        while self.cursor.y <= self.max_y {
            if self.contains(self.cursor) {
                let (x, y) = self.cursor.center();
                let z = match self.depth {
                    DepthInterpolation::Plane => -(plane.x * x + plane.y * y + plane.w) / plane.z,
                    DepthInterpolation::Legacy => -(plane.x * x + plane.x * y + plane.w),
                };
                self.current = Some((self.cursor, Vec4::point(x, y, z)));
                return;
            }
            self.step();
        }
    }
}

impl Iterator for TriangleScan {
    type Item = (Pixel, Vec4);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.current()?;
        self.advance();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> (Vec4, Vec4, Vec4) {
        (
            Vec4::point(10.0, 50.0, 0.2),
            Vec4::point(100.0, 50.0, 0.4),
            Vec4::point(50.0, 80.0, 0.6),
        )
    }

    #[test]
    fn test_emits_exactly_contained_pixels() {
        let (a, b, c) = tri();
        let emitted: Vec<Pixel> = TriangleScan::new(a, b, c, DEFAULT_TOLERANCE, DepthInterpolation::Plane)
            .map(|(p, _)| p)
            .collect();

        let mut expected = Vec::new();
        for y in 49..=81 {
            for x in 9..=101 {
                let p = Vec4::point(x as f64 + 0.5, y as f64 + 0.5, 0.0);
                let signs = [edge_sign(p, a, b), edge_sign(p, b, c), edge_sign(p, c, a)]
                    .map(|e| e <= DEFAULT_TOLERANCE);
                if signs.iter().all(|&s| s == signs[0]) {
                    expected.push(Pixel::new(x, y));
                }
            }
        }
        assert!(!expected.is_empty());
        assert_eq!(emitted, expected);
    }

    #[test]
    fn test_boundary_pixel_depends_on_tolerance() {
        // Bottom edge sits 0.0025 above the centres of row 0, so pixel (10, 0)
        // scores 0.05 against it and negative against the other two edges.
        let a = Vec4::point(0.0, 0.5025, 0.1);
        let c = Vec4::point(10.0, 20.0, 0.3);
        let b = Vec4::point(20.0, 0.5025, 0.2);
        let scan = |t| -> Vec<Pixel> {
            TriangleScan::new(a, c, b, t, DepthInterpolation::Plane)
                .map(|(p, _)| p)
                .collect()
        };
        let tight = scan(0.0);
        let loose = scan(DEFAULT_TOLERANCE);

        assert!(!tight.contains(&Pixel::new(10, 0)));
        assert!(loose.contains(&Pixel::new(10, 0)));
        for pixels in [&tight, &loose] {
            assert!(pixels.contains(&Pixel::new(10, 1)));
            assert!(!pixels.contains(&Pixel::new(10, -1)));
            assert!(!pixels.contains(&Pixel::new(18, 15)));
        }
    }

    #[test]
    fn test_row_major_order_and_interior() {
        let (a, b, c) = tri();
        let pixels: Vec<Pixel> = TriangleScan::new(a, b, c, DEFAULT_TOLERANCE, DepthInterpolation::Plane)
            .map(|(p, _)| p)
            .collect();
        assert!(pixels.windows(2).all(|w| (w[0].y, w[0].x) < (w[1].y, w[1].x)));
        assert!(pixels.contains(&Pixel::new(50, 60)));
        assert!(!pixels.contains(&Pixel::new(5, 60)));
        assert!(!pixels.contains(&Pixel::new(50, 90)));
    }

    #[test]
    fn test_winding_does_not_matter() {
        let (a, b, c) = tri();
        let cw: Vec<Pixel> = TriangleScan::new(a, b, c, DEFAULT_TOLERANCE, DepthInterpolation::Plane)
            .map(|(p, _)| p)
            .collect();
        let ccw: Vec<Pixel> = TriangleScan::new(a, c, b, DEFAULT_TOLERANCE, DepthInterpolation::Plane)
            .map(|(p, _)| p)
            .collect();
        assert!(cw.contains(&Pixel::new(50, 60)));
        assert!(ccw.contains(&Pixel::new(50, 60)));
    }

    #[test]
    fn test_plane_depth_interpolates_vertices() {
        let a = Vec4::point(0.0, 0.0, 0.0);
        let b = Vec4::point(40.0, 0.0, 0.4);
        let c = Vec4::point(0.0, 40.0, 0.0);
        for (pixel, p) in TriangleScan::new(a, b, c, DEFAULT_TOLERANCE, DepthInterpolation::Plane) {
            let (x, y) = pixel.center();
            assert_eq!((p.x, p.y), (x, y));
            assert!((p.z - x * 0.01).abs() < 1e-9);
        }
    }

    #[test]
    fn test_legacy_depth_uses_x_twice() {
        let a = Vec4::point(0.0, 0.0, 0.0);
        let b = Vec4::point(40.0, 0.0, 0.4);
        let c = Vec4::point(0.0, 40.0, 0.0);
        let n = plane(a, b, c).unwrap();
        let (pixel, p) = TriangleScan::new(a, b, c, DEFAULT_TOLERANCE, DepthInterpolation::Legacy)
            .next()
            .unwrap();
        let (x, y) = pixel.center();
        assert!((p.z + (n.x * x + n.x * y + n.w)).abs() < 1e-12);
    }

    #[test]
    fn test_restart_replays_sequence() {
        let (a, b, c) = tri();
        let mut scan = TriangleScan::new(a, b, c, DEFAULT_TOLERANCE, DepthInterpolation::Plane);
        let first = scan.current();
        for _ in 0..25 {
            scan.advance();
        }
        assert!(!scan.is_exhausted());
        scan.restart();
        assert_eq!(scan.current(), first);
    }

    #[test]
    fn test_cursor_api_matches_iterator() {
        let (a, b, c) = tri();
        let mut scan = TriangleScan::new(a, b, c, DEFAULT_TOLERANCE, DepthInterpolation::Plane);
        let via_iter: Vec<_> = scan.clone().collect();
        let mut via_cursor = Vec::new();
        while !scan.is_exhausted() {
            via_cursor.push(scan.current().unwrap());
            scan.advance();
        }
        assert_eq!(via_cursor, via_iter);
        scan.advance();
        assert!(scan.is_exhausted());
    }

    #[test]
    fn test_collinear_triangle_is_empty() {
        let a = Vec4::point(0.0, 0.0, 0.0);
        let b = Vec4::point(5.0, 5.0, 0.0);
        let c = Vec4::point(10.0, 10.0, 0.0);
        let mut scan = TriangleScan::new(a, b, c, DEFAULT_TOLERANCE, DepthInterpolation::Plane);
        assert!(scan.is_exhausted());
        assert_eq!(scan.next(), None);
    }

    #[test]
    fn test_tolerance_grows_coverage() {
        // Interior of (a, c, b) evaluates negative on every edge
        let (a, b, c) = tri();
        let tight: Vec<Pixel> = TriangleScan::new(a, c, b, 0.0, DepthInterpolation::Plane)
            .map(|(p, _)| p)
            .collect();
        let loose: Vec<Pixel> = TriangleScan::new(a, c, b, DEFAULT_TOLERANCE, DepthInterpolation::Plane)
            .map(|(p, _)| p)
            .collect();
        assert!(tight.iter().all(|p| loose.contains(p)));
    }
}
