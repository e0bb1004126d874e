//! Loading user-picked textures and plant models
//!
//! Picked bytes are written into an in-memory asset source (`picked://`) and
//! loaded through the `AssetServer`. Loads are polled every frame; whichever
//! completes last owns the registry slot.

use aquarium_core::AssetKind;
use bevy::asset::io::memory::{Dir, MemoryAssetReader};
use bevy::asset::io::AssetSource;
use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::types::{AquariumState, AssetPicked, EditorStatus};

/// Name of the in-memory asset source holding picked files
pub const PICKED_SOURCE: &str = "picked";

/// Backing directory of the `picked://` asset source
#[derive(Resource, Clone, Default)]
pub struct PickedAssetDir(pub Dir);

/// Register the `picked://` source. Must run before `DefaultPlugins` are added.
pub fn register_picked_source(app: &mut App) -> &mut App {
    let dir = PickedAssetDir::default();
    let reader_dir = dir.0.clone();
    app.register_asset_source(
        PICKED_SOURCE,
        AssetSource::build().with_reader(move || {
            Box::new(MemoryAssetReader {
                root: reader_dir.clone(),
            })
        }),
    )
    .insert_resource(dir)
}

enum PendingHandle {
    Texture(Handle<Image>),
    Model(Handle<Gltf>),
}

struct PendingLoad {
    filename: String,
    path: PathBuf,
    handle: PendingHandle,
}

/// Loads started but not yet finished
#[derive(Resource, Default)]
pub struct PendingAssetLoads {
    loads: Vec<PendingLoad>,
    next_seq: u64,
}

impl PendingAssetLoads {
    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    pub fn is_loading(&self, kind: AssetKind) -> bool {
        self.loads.iter().any(|load| match load.handle {
            PendingHandle::Texture(_) => kind == AssetKind::GravelTexture,
            PendingHandle::Model(_) => kind == AssetKind::PlantModel,
        })
    }

    fn next_path(&mut self, kind: AssetKind, filename: &str) -> PathBuf {
        self.next_seq += 1;
        picked_path(kind, filename, self.next_seq)
    }
}

/// Unique in-memory path for a picked file, keeping its extension so the
/// matching loader is chosen
pub fn picked_path(kind: AssetKind, filename: &str, seq: u64) -> PathBuf {
    let stem = match kind {
        AssetKind::GravelTexture => "texture",
        AssetKind::PlantModel => "plant",
    };
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| kind.extensions()[0].to_string());
    PathBuf::from(format!("{stem}-{seq}.{extension}"))
}

fn repeat_sampler(settings: &mut ImageLoaderSettings) {
    settings.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    });
}

pub struct AssetLoadPlugin;

impl Plugin for AssetLoadPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<AssetPicked>()
            .init_resource::<PendingAssetLoads>()
            .add_systems(Update, (start_asset_loads, poll_asset_loads).chain());
    }
}

fn start_asset_loads(
    mut picked: MessageReader<AssetPicked>,
    dir: Option<Res<PickedAssetDir>>,
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingAssetLoads>,
    mut status: ResMut<EditorStatus>,
) {
    let Some(dir) = dir else {
        for event in picked.read() {
            warn!(file = %event.filename, "No in-memory asset source registered, ignoring picked file");
        }
        return;
    };

    for event in picked.read() {
        if event.bytes.is_empty() {
            continue;
        }
        if !event.kind.accepts(&event.filename) {
            warn!(file = %event.filename, kind = %event.kind, "Unsupported file type");
            status.error(format!(
                "{} is not a supported {} ({})",
                event.filename,
                event.kind,
                event.kind.accept_string()
            ));
            continue;
        }

        let path = pending.next_path(event.kind, &event.filename);
        dir.0.insert_asset(&path, event.bytes.clone());
        let asset_path = format!("{PICKED_SOURCE}://{}", path.display());

        let handle = match event.kind {
            AssetKind::GravelTexture => PendingHandle::Texture(
                asset_server.load_with_settings(asset_path.clone(), repeat_sampler),
            ),
            AssetKind::PlantModel => PendingHandle::Model(asset_server.load(asset_path.clone())),
        };
        info!(file = %event.filename, path = %asset_path, "Loading picked asset");
        status.info(format!("Loading {} {}", event.kind, event.filename));
        pending.loads.push(PendingLoad {
            filename: event.filename.clone(),
            path,
            handle,
        });
    }
}

fn poll_asset_loads(
    mut pending: ResMut<PendingAssetLoads>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    mut state: ResMut<AquariumState>,
    mut status: ResMut<EditorStatus>,
) {
    if pending.is_empty() {
        return;
    }

    let loads = std::mem::take(&mut pending.loads);
    for load in loads {
        let id = match &load.handle {
            PendingHandle::Texture(handle) => handle.id().untyped(),
            PendingHandle::Model(handle) => handle.id().untyped(),
        };

        match asset_server.get_load_state(id) {
            Some(LoadState::Loaded) => match load.handle {
                PendingHandle::Texture(handle) => {
                    info!(file = %load.filename, "Gravel texture loaded");
                    state.scene.set_texture(handle);
                    status.info(format!("Gravel texture: {}", load.filename));
                }
                PendingHandle::Model(handle) => {
                    let scene = gltf_assets.get(&handle).and_then(|gltf| {
                        gltf.default_scene
                            .clone()
                            .or_else(|| gltf.scenes.first().cloned())
                    });
                    match scene {
                        Some(scene) => {
                            info!(file = %load.filename, "Plant model loaded");
                            state.scene.set_plant_model(scene);
                            status.info(format!("Plant model: {}", load.filename));
                        }
                        None => {
                            warn!(file = %load.filename, "Plant model has no scenes");
                            status.error(format!("{} contains no scene", load.filename));
                        }
                    }
                }
            },
            Some(LoadState::Failed(err)) => {
                warn!(file = %load.filename, path = %load.path.display(), error = %err, "Failed to load picked asset");
                status.error(format!("Could not load {}: {}", load.filename, err));
            }
            _ => {
                // Still loading
                pending.loads.push(load);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picked_path_is_unique_and_keeps_extension() {
        assert_eq!(
            picked_path(AssetKind::PlantModel, "Fern.GLB", 3),
            PathBuf::from("plant-3.glb")
        );
        assert_eq!(
            picked_path(AssetKind::GravelTexture, "sand.jpeg", 4),
            PathBuf::from("texture-4.jpeg")
        );
        assert_eq!(
            picked_path(AssetKind::GravelTexture, "noext", 5),
            PathBuf::from("texture-5.png")
        );
    }

    #[test]
    fn test_sequence_advances() {
        let mut pending = PendingAssetLoads::default();
        let first = pending.next_path(AssetKind::PlantModel, "a.glb");
        let second = pending.next_path(AssetKind::PlantModel, "a.glb");
        assert_ne!(first, second);
        assert!(pending.is_empty());
        assert!(!pending.is_loading(AssetKind::PlantModel));
    }
}
