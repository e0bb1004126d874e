//! Shared resources and messages for the aquarium scene

use aquarium_core::{AquariumScene, AssetKind, SceneConfig, TankDimensionsCm};
use bevy::prelude::*;

use crate::backend::BevyScene;

/// Scene configuration the app was started with
#[derive(Debug, Clone, Resource)]
pub struct SceneSettings(pub SceneConfig);

/// The aquarium being edited, backed by Bevy entities
#[derive(Resource)]
pub struct AquariumState {
    pub scene: AquariumScene<BevyScene>,
}

impl AquariumState {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            scene: AquariumScene::new(config),
        }
    }
}

/// Request to rebuild the tank with dimensions typed in centimeters
#[derive(Message, Debug, Clone, Copy)]
pub struct UpdateDimensions(pub TankDimensionsCm);

/// Request to add one batch of gravel
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct AddGravel;

/// Request to add a single plant
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct AddPlant;

/// A user-selected file, read into memory
#[derive(Message, Debug, Clone)]
pub struct AssetPicked {
    pub kind: AssetKind,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Status line shown in the control panel
#[derive(Debug, Clone, Default, Resource)]
pub struct EditorStatus {
    pub last_error: Option<String>,
    pub last_info: Option<String>,
}

impl EditorStatus {
    pub fn error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.last_info = Some(message.into());
        self.last_error = None;
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}
