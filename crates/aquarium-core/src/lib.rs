//! Aquarium Core - Scene-composition model for the aquarium editor
//!
//! This crate holds everything about the aquarium scene that does not depend
//! on a renderer:
//! - Unit conversion and validated lengths (centimeters in, meters out)
//! - Tank and water box derivation from the current dimensions
//! - Randomized gravel and plant placement within the tank floor
//! - The asset registry deciding between built-in and user-supplied assets
//! - The `AquariumScene` composition root and its `SceneBackend` seam
//! - Scene defaults loaded from TOML

pub mod assets;
pub mod config;
pub mod dimensions;
pub mod placement;
pub mod scene;
pub mod tank;
pub mod units;

pub use assets::{AssetKind, AssetRegistry, AssetSlot};
pub use config::{ConfigError, SceneConfig};
pub use dimensions::{Axis, DimensionError, TankDimensions, TankDimensionsCm};
pub use placement::{FallbackPlant, GravelParticle, GravelSkin, PlantBody, PlantPlacement};
pub use scene::{AquariumScene, DecorationGroup, SceneBackend, SceneTypes, Viewport};
pub use tank::{BoxSpec, MaterialSpec, TankLayout, TankStyle, TankStylePreset};
pub use units::{to_meters, PositiveLength};
