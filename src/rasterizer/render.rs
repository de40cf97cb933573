//! Core rendering functions
//! Flat-shaded triangles with a depth-tested framebuffer

use std::path::Path;

use super::camera::Camera;
use super::math::Vec4;
use super::scan::{Pixel, TriangleScan};
use super::types::{Color, DepthTest, RasterSettings, Shading};
use crate::error::RenderError;

/// Depth buffer value for a pixel nothing has been drawn to
pub const DEPTH_CLEAR: f64 = -2.0;

/// Fragments with depth below this are never written
pub const DEPTH_MIN: f64 = -1.0;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f64>,  // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let mut fb = Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![DEPTH_CLEAR; width * height],
            width,
            height,
        };
        fb.clear(Color::BLACK);
        fb
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(DEPTH_CLEAR);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut bytes = [0; 4];
        bytes.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(Color::from_bytes(bytes))
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.zbuffer[y * self.width + x])
    }

    /// Depth-tested write. Pixels outside the image are ignored.
    ///
    /// Writes when `z >= DEPTH_MIN` and the pixel is still clear or `z` wins
    /// against the stored depth.
    pub fn set_pixel_with_depth(&mut self, pixel: Pixel, z: f64, color: Color, test: DepthTest) -> bool {
        let Some(idx) = self.index(pixel.x, pixel.y) else {
            return false;
        };
        let stored = self.zbuffer[idx];
        if z >= DEPTH_MIN && (stored == DEPTH_CLEAR || test.passes(z, stored)) {
            self.zbuffer[idx] = z;
            self.pixels[idx * 4..idx * 4 + 4].copy_from_slice(&color.to_bytes());
            return true;
        }
        false
    }

    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let idx = (y as usize * self.width + x as usize) * 4;
            image::Rgba([
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ])
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// What happened to a triangle handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    /// Rasterized; `pixels` fragments passed the depth test
    Drawn { pixels: usize },
    /// Zero area in world space, no normal to light it with
    Degenerate,
    /// At least one vertex projects outside the image
    OutsideViewport,
}

/// Running tally over a render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub degenerate: usize,
    pub outside_viewport: usize,
    pub fragments: usize,
}

impl RenderStats {
    fn record(&mut self, outcome: TriangleOutcome) {
        match outcome {
            TriangleOutcome::Drawn { pixels } => {
                self.drawn += 1;
                self.fragments += pixels;
            }
            TriangleOutcome::Degenerate => self.degenerate += 1,
            TriangleOutcome::OutsideViewport => self.outside_viewport += 1,
        }
    }

    pub fn triangles(&self) -> usize {
        self.drawn + self.degenerate + self.outside_viewport
    }
}

/// Render context: owns the buffers plus everything a pass reads
pub struct Renderer {
    pub framebuffer: Framebuffer,
    pub camera: Camera,
    pub shading: Shading,
    pub settings: RasterSettings,
    stats: RenderStats,
}

impl Renderer {
    pub fn new(width: usize, height: usize, camera: Camera, shading: Shading, settings: RasterSettings) -> Self {
        log::debug!("allocating {}x{} framebuffer", width, height);
        Self {
            framebuffer: Framebuffer::new(width, height),
            camera,
            shading,
            settings,
            stats: RenderStats::default(),
        }
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// NDC to pixel coordinates; depth passes through
    pub fn to_screen(&self, ndc: Vec4) -> Vec4 {
        let w = self.framebuffer.width as f64 / 2.0;
        let h = self.framebuffer.height as f64 / 2.0;
        Vec4::point(ndc.x * w + w, -ndc.y * h + h, ndc.z)
    }

    fn in_viewport(&self, s: Vec4) -> bool {
        s.is_finite()
            && s.x >= 0.0
            && s.y >= 0.0
            && s.x < self.framebuffer.width as f64
            && s.y < self.framebuffer.height as f64
    }

    /// Draw one world-space triangle
    pub fn draw_triangle(&mut self, a: Vec4, b: Vec4, c: Vec4) -> TriangleOutcome {
        let outcome = self.rasterize(a, b, c);
        if !matches!(outcome, TriangleOutcome::Drawn { .. }) {
            log::trace!("skipped {} {} {}: {:?}", a, b, c, outcome);
        }
        self.stats.record(outcome);
        outcome
    }

    fn rasterize(&mut self, a: Vec4, b: Vec4, c: Vec4) -> TriangleOutcome {
        let Ok(normal) = (a - c).cross(a - b).normalize() else {
            return TriangleOutcome::Degenerate;
        };
        let color = self.shading.color(self.shading.light_factor(normal));

        let sa = self.to_screen(self.camera.project(a));
        let sb = self.to_screen(self.camera.project(b));
        let sc = self.to_screen(self.camera.project(c));

        if ![sa, sb, sc].iter().all(|&s| self.in_viewport(s)) {
            return TriangleOutcome::OutsideViewport;
        }

        let scan = TriangleScan::new(sa, sb, sc, self.settings.tolerance, self.settings.depth);
        let test = self.settings.depth_test;
        let mut pixels = 0;
        for (pixel, p) in scan {
            if self.framebuffer.set_pixel_with_depth(pixel, p.z, color, test) {
                pixels += 1;
            }
        }
        TriangleOutcome::Drawn { pixels }
    }

    /// Draw a planar quad as (a, b, c) and (a, c, d)
    pub fn draw_rectangle(&mut self, a: Vec4, b: Vec4, c: Vec4, d: Vec4) -> [TriangleOutcome; 2] {
        [self.draw_triangle(a, b, c), self.draw_triangle(a, c, d)]
    }
}
