//! Scene defaults loaded from TOML
//!
//! Every section and field is optional; missing values fall back to the
//! built-in defaults. Colors are written as `0xRRGGBB` integers.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::dimensions::TankDimensionsCm;
use crate::placement::{GRAVEL_BATCH, PLANT_MODEL_SCALE};
use crate::tank::{rgb_hex, TankStylePreset};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub tank: TankConfig,
    #[serde(default)]
    pub gravel: GravelConfig,
    #[serde(default)]
    pub plant: PlantConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankConfig {
    /// Initial width in centimeters
    #[serde(default = "default_width_cm")]
    pub width_cm: f32,
    #[serde(default = "default_height_cm")]
    pub height_cm: f32,
    #[serde(default = "default_depth_cm")]
    pub depth_cm: f32,
    #[serde(default)]
    pub style: TankStylePreset,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            width_cm: default_width_cm(),
            height_cm: default_height_cm(),
            depth_cm: default_depth_cm(),
            style: TankStylePreset::default(),
        }
    }
}

impl TankConfig {
    pub fn dimensions_cm(&self) -> TankDimensionsCm {
        TankDimensionsCm::new(self.width_cm, self.height_cm, self.depth_cm)
    }
}

fn default_width_cm() -> f32 {
    60.0
}

fn default_height_cm() -> f32 {
    40.0
}

fn default_depth_cm() -> f32 {
    30.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravelConfig {
    /// Particles added per "Add gravel" request
    #[serde(default = "default_gravel_count")]
    pub count_per_batch: usize,
    /// Flat color used while no texture is loaded
    #[serde(default = "default_gravel_color")]
    pub color: u32,
}

impl Default for GravelConfig {
    fn default() -> Self {
        Self {
            count_per_batch: default_gravel_count(),
            color: default_gravel_color(),
        }
    }
}

impl GravelConfig {
    pub fn color_rgb(&self) -> [f32; 3] {
        rgb_hex(self.color)
    }
}

fn default_gravel_count() -> usize {
    GRAVEL_BATCH
}

fn default_gravel_color() -> u32 {
    0x8d6e63
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Uniform scale applied to loaded plant models
    #[serde(default = "default_model_scale")]
    pub model_scale: f32,
    #[serde(default = "default_stem_color")]
    pub stem_color: u32,
    #[serde(default = "default_leaf_color")]
    pub leaf_color: u32,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            model_scale: default_model_scale(),
            stem_color: default_stem_color(),
            leaf_color: default_leaf_color(),
        }
    }
}

fn default_model_scale() -> f32 {
    PLANT_MODEL_SCALE
}

fn default_stem_color() -> u32 {
    0x2e7d32
}

fn default_leaf_color() -> u32 {
    0x66bb6a
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Initial camera position, looking at the origin
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Smoothing factor for orbit damping (higher = snappier)
    #[serde(default = "default_damping")]
    pub damping: f32,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            damping: default_damping(),
            sensitivity: default_sensitivity(),
            zoom_speed: default_zoom_speed(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [4.0, 3.0, 5.0]
}

fn default_fov() -> f32 {
    45.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    100.0
}

fn default_damping() -> f32 {
    0.15
}

fn default_sensitivity() -> f32 {
    0.005
}

fn default_zoom_speed() -> f32 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingConfig {
    #[serde(default = "default_ambient_color")]
    pub ambient_color: u32,
    /// Ambient brightness (cd/m^2)
    #[serde(default = "default_ambient_brightness")]
    pub ambient_brightness: f32,
    /// Directional illuminance (lux)
    #[serde(default = "default_illuminance")]
    pub directional_illuminance: f32,
    /// Directional light position; it always points at the origin
    #[serde(default = "default_light_position")]
    pub directional_position: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: default_ambient_color(),
            ambient_brightness: default_ambient_brightness(),
            directional_illuminance: default_illuminance(),
            directional_position: default_light_position(),
        }
    }
}

fn default_ambient_color() -> u32 {
    0xffffff
}

fn default_ambient_brightness() -> f32 {
    400.0
}

fn default_illuminance() -> f32 {
    8000.0
}

fn default_light_position() -> [f32; 3] {
    [5.0, 10.0, 7.0]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Width of the control panel excluded from the render area (logical px)
    #[serde(default = "default_panel_width")]
    pub panel_width: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            panel_width: default_panel_width(),
        }
    }
}

fn default_panel_width() -> f32 {
    300.0
}

impl SceneConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded scene configuration");
        Ok(config)
    }
}
