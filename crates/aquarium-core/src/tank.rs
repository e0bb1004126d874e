//! Tank geometry - glass and water boxes derived from the tank dimensions

use serde::{Deserialize, Serialize};

use crate::dimensions::TankDimensions;

/// Fraction of the tank height filled with water
pub const WATER_FILL_HEIGHT: f32 = 0.9;
/// Fraction of the tank width/depth occupied by the water volume
pub const WATER_FILL_LATERAL: f32 = 0.98;

/// An axis-aligned box: full extents plus center, in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSpec {
    pub size: [f32; 3],
    pub center: [f32; 3],
}

impl BoxSpec {
    /// Box centered on the vertical axis whose base sits on the floor plane (y = 0)
    pub fn on_floor(width: f32, height: f32, depth: f32) -> Self {
        Self {
            size: [width, height, depth],
            center: [0.0, height / 2.0, 0.0],
        }
    }

    pub fn base_y(&self) -> f32 {
        self.center[1] - self.size[1] / 2.0
    }
}

/// Tank glass and water volume for a given set of dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankLayout {
    pub tank: BoxSpec,
    pub water: BoxSpec,
}

impl TankLayout {
    pub fn from_dimensions(dims: &TankDimensions) -> Self {
        let tank = BoxSpec::on_floor(dims.width(), dims.height(), dims.depth());
        let water = BoxSpec::on_floor(
            dims.width() * WATER_FILL_LATERAL,
            dims.height() * WATER_FILL_HEIGHT,
            dims.depth() * WATER_FILL_LATERAL,
        );
        Self { tank, water }
    }
}

/// Surface appearance of a primitive, independent of any renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// sRGB components in 0.0-1.0
    pub color: [f32; 3],
    pub opacity: f32,
    #[serde(default)]
    pub double_sided: bool,
    #[serde(default)]
    pub unlit: bool,
}

impl MaterialSpec {
    pub fn opaque(color: [f32; 3]) -> Self {
        Self {
            color,
            opacity: 1.0,
            double_sided: false,
            unlit: false,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Convert a 0xRRGGBB color into RGB floats
pub fn rgb_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Named tank appearance preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TankStylePreset {
    #[default]
    Clear,
    Tinted,
}

/// Glass and water materials
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankStyle {
    pub glass: MaterialSpec,
    pub water: MaterialSpec,
}

impl TankStyle {
    /// Near-invisible glass over a visibly tinted water volume
    pub fn clear() -> Self {
        Self {
            glass: MaterialSpec {
                color: rgb_hex(0xffffff),
                opacity: 0.05,
                double_sided: true,
                unlit: true,
            },
            water: MaterialSpec {
                color: rgb_hex(0x64b5f6),
                opacity: 0.4,
                double_sided: false,
                unlit: false,
            },
        }
    }

    /// Blue-tinted glass that stays visible from every angle
    pub fn tinted() -> Self {
        Self {
            glass: MaterialSpec {
                color: rgb_hex(0x88ccff),
                opacity: 0.15,
                double_sided: true,
                unlit: false,
            },
            water: MaterialSpec {
                color: rgb_hex(0x1e88e5),
                opacity: 0.3,
                double_sided: false,
                unlit: false,
            },
        }
    }
}

impl From<TankStylePreset> for TankStyle {
    fn from(preset: TankStylePreset) -> Self {
        match preset {
            TankStylePreset::Clear => TankStyle::clear(),
            TankStylePreset::Tinted => TankStyle::tinted(),
        }
    }
}

impl Default for TankStyle {
    fn default() -> Self {
        Self::clear()
    }
}
