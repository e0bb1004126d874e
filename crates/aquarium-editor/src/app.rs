//! Bevy application setup

use anyhow::{Context, Result};
use aquarium_core::SceneConfig;
use aquarium_scene::{register_picked_source, AquariumScenePlugin};
use bevy::prelude::*;
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};

use crate::file_picker::FilePickerPlugin;
use crate::ui::UiPlugin;

/// Default scene configuration shipped with the editor
const DEFAULT_CONFIG: &str = include_str!("../aquarium.toml");

/// Parse the embedded configuration
pub fn embedded_config() -> Result<SceneConfig> {
    SceneConfig::from_toml_str(DEFAULT_CONFIG).context("parsing embedded aquarium.toml")
}

/// Native builds prefer an `aquarium.toml` in the working directory
pub fn load_config() -> Result<SceneConfig> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = std::path::Path::new("aquarium.toml");
        if path.exists() {
            return SceneConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()));
        }
    }
    embedded_config()
}

pub fn run() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}, falling back to built-in defaults", e);
            SceneConfig::default()
        }
    };

    let mut app = App::new();
    // The in-memory source must exist before AssetPlugin builds its sources
    register_picked_source(&mut app);

    app.insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.15)))
        .insert_resource(WinitSettings::default())
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Aquarium Editor".to_string(),
                        canvas: Some("#aquarium-canvas".to_string()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Picked files have no .meta companions
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // Picking must be added BEFORE EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .add_plugins(AquariumScenePlugin::new(config))
        .add_plugins(FilePickerPlugin)
        .add_plugins(UiPlugin)
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = embedded_config().unwrap();
        assert_eq!(config, SceneConfig::default());
    }
}
