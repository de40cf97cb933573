//! Render configuration loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable config files. Every
//! field has a default, so a partial file only overrides what it names.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{ConfigError, RenderError};
use crate::rasterizer::{Camera, RasterSettings, Renderer, Shading, Vec4, HEIGHT, WIDTH};

/// Largest accepted image side, in pixels
pub const MAX_IMAGE_SIDE: usize = 16_384;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub width: usize,
    pub height: usize,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self { width: WIDTH, height: HEIGHT }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub near: f64,
    pub far: f64,
    pub eye: Vec4,
    pub focus: Vec4,
    pub up: Vec4,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            near: 1.0,
            far: 1000.0,
            eye: Vec4::point(10.0, -2.0, -20.0) * 0.6,
            focus: Vec4::point(8.0, 0.0, 8.0),
            up: Vec4::UP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    pub direction: Vec4,
    /// Gray level of a face pointing along the light
    pub ambient: u8,
    /// Gray level of a face pointing against the light
    pub max_brightness: u8,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            direction: Vec4::point(0.3, -1.0, 0.5),
            ambient: 50,
            max_brightness: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Height of a normalized sample of 1.0
    pub elevation: f64,
    /// Field separator of the height grid file
    pub delimiter: char,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self { elevation: 5.0, delimiter: ',' }
    }
}

/// Everything a render pass reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub image: ImageSettings,
    pub camera: CameraSettings,
    pub lighting: LightingSettings,
    pub terrain: TerrainSettings,
    pub raster: RasterSettings,
}

impl RenderConfig {
    /// Reject settings the pipeline cannot render with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };
        if self.image.width == 0 || self.image.height == 0 {
            return invalid(format!("image size {}x{} is empty", self.image.width, self.image.height));
        }
        if self.image.width > MAX_IMAGE_SIDE || self.image.height > MAX_IMAGE_SIDE {
            return invalid(format!(
                "image size {}x{} exceeds {} pixels per side",
                self.image.width, self.image.height, MAX_IMAGE_SIDE
            ));
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return invalid(format!(
                "camera planes must satisfy 0 < near < far (near {}, far {})",
                self.camera.near, self.camera.far
            ));
        }
        if self.lighting.ambient > self.lighting.max_brightness {
            log::warn!(
                "ambient {} is brighter than max_brightness {}; shading is inverted",
                self.lighting.ambient,
                self.lighting.max_brightness
            );
        }
        if !self.terrain.elevation.is_finite() {
            return invalid("elevation must be finite".to_string());
        }
        if !self.raster.tolerance.is_finite() {
            return invalid("tolerance must be finite".to_string());
        }
        Ok(())
    }

    pub fn camera(&self) -> Result<Camera, RenderError> {
        let c = &self.camera;
        Ok(Camera::new(c.near, c.far, c.eye, c.focus, c.up)?)
    }

    pub fn shading(&self) -> Result<Shading, RenderError> {
        let l = &self.lighting;
        Ok(Shading::new(l.direction, l.ambient, l.max_brightness)?)
    }

    /// Fresh render context with cleared buffers
    pub fn build_renderer(&self) -> Result<Renderer, RenderError> {
        self.validate()?;
        Ok(Renderer::new(
            self.image.width,
            self.image.height,
            self.camera()?,
            self.shading()?,
            self.raster,
        ))
    }
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load a config from a RON string
pub fn load_config_from_str(s: &str) -> Result<RenderConfig, ConfigError> {
    let config: RenderConfig = ron::from_str(s)?;
    config.validate()?;
    Ok(config)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}
