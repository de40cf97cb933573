//! Core types for the rasterizer

use serde::{Serialize, Deserialize};

use super::math::Vec4;
use super::scan::{DepthInterpolation, DEFAULT_TOLERANCE};
use crate::error::MathError;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self { r: bytes[0], g: bytes[1], b: bytes[2], a: bytes[3] }
    }
}

/// Which of two depths wins the z-test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepthTest {
    /// Smaller stored depth is nearer
    #[default]
    Less,
    Greater,
}

impl DepthTest {
    pub fn passes(self, incoming: f64, stored: f64) -> bool {
        match self {
            DepthTest::Less => incoming < stored,
            DepthTest::Greater => incoming > stored,
        }
    }
}

/// Rasterizer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Edge-function inclusion tolerance
    pub tolerance: f64,
    pub depth: DepthInterpolation,
    pub depth_test: DepthTest,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            depth: DepthInterpolation::Plane,
            depth_test: DepthTest::Less,
        }
    }
}

/// Flat directional lighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    light_dir: Vec4,
    pub ambient: u8,
    pub max_brightness: u8,
}

impl Shading {
    pub fn new(light_dir: Vec4, ambient: u8, max_brightness: u8) -> Result<Self, MathError> {
        Ok(Self {
            light_dir: light_dir.normalize()?,
            ambient,
            max_brightness,
        })
    }

    pub fn light_dir(&self) -> Vec4 {
        self.light_dir
    }

    /// Angle between the face normal and the light, scaled to [0, 1]
    ///
    /// 0 when the face points along the light direction, 1 when against it.
    pub fn light_factor(&self, normal: Vec4) -> f64 {
        normal.dot(self.light_dir).clamp(-1.0, 1.0).acos() / std::f64::consts::PI
    }

    /// Gray level between ambient and max brightness
    pub fn color(&self, factor: f64) -> Color {
        let a = self.ambient as f64;
        let m = self.max_brightness as f64;
        Color::gray((a + (m - a) * factor) as u8)
    }
}
