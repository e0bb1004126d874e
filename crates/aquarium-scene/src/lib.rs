//! Aquarium Scene - Bevy rendering of the aquarium model
//!
//! This crate connects `aquarium-core` to Bevy: it spawns the tank, water and
//! decorations as entities, loads user-picked assets and drives the orbit camera.

pub mod assets;
pub mod backend;
pub mod camera;
pub mod decorations;
pub mod scene;
pub mod types;

use aquarium_core::SceneConfig;
use bevy::prelude::*;

/// Plugin that sets up the aquarium scene from a configuration
pub struct AquariumScenePlugin {
    pub config: SceneConfig,
}

impl AquariumScenePlugin {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }
}

impl Plugin for AquariumScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SceneSettings(self.config.clone()))
            .insert_resource(AquariumState::new(&self.config))
            .insert_resource(CameraSettings::from_config(&self.config.camera))
            .init_resource::<EditorStatus>()
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(decorations::DecorationsPlugin)
            .add_plugins(assets::AssetLoadPlugin);
    }
}

// Re-export commonly used types
pub use assets::{register_picked_source, PickedAssetDir};
pub use backend::{BevyBackend, BevyScene, SceneObject};
pub use camera::CameraSettings;
pub use types::*;
