//! Message handlers that mutate the aquarium: dimension updates, gravel and plants

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use tracing::info;

use crate::backend::{BevyBackend, DecorationRoots};
use crate::types::{AddGravel, AddPlant, AquariumState, EditorStatus, UpdateDimensions};

/// ECS access needed to create and release scene objects
#[derive(SystemParam)]
pub struct SceneWriter<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub meshes: ResMut<'w, Assets<Mesh>>,
    pub materials: ResMut<'w, Assets<StandardMaterial>>,
    pub roots: Res<'w, DecorationRoots>,
    pub state: ResMut<'w, AquariumState>,
    pub status: ResMut<'w, EditorStatus>,
}

pub struct DecorationsPlugin;

impl Plugin for DecorationsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<UpdateDimensions>()
            .add_message::<AddGravel>()
            .add_message::<AddPlant>()
            .add_systems(
                Update,
                (handle_update_dimensions, handle_add_gravel, handle_add_plant).chain(),
            );
    }
}

fn handle_update_dimensions(mut requests: MessageReader<UpdateDimensions>, mut writer: SceneWriter) {
    for UpdateDimensions(input) in requests.read() {
        let SceneWriter {
            commands,
            meshes,
            materials,
            roots,
            state,
            status,
        } = &mut writer;
        let mut backend = BevyBackend::new(commands, meshes, materials, **roots);

        match state.scene.update_dimensions(*input, &mut backend) {
            Ok(_) => status.info(format!(
                "Tank set to {} x {} x {} cm",
                input.width, input.height, input.depth
            )),
            Err(e) => status.error(e.to_string()),
        }
    }
}

fn handle_add_gravel(mut requests: MessageReader<AddGravel>, mut writer: SceneWriter) {
    let mut rng = rand::thread_rng();
    for _ in requests.read() {
        let SceneWriter {
            commands,
            meshes,
            materials,
            roots,
            state,
            ..
        } = &mut writer;
        let mut backend = BevyBackend::new(commands, meshes, materials, **roots);
        let added = state.scene.place_gravel(&mut rng, &mut backend);
        info!(added, total = state.scene.gravel().len(), "Gravel added");
    }
}

fn handle_add_plant(mut requests: MessageReader<AddPlant>, mut writer: SceneWriter) {
    let mut rng = rand::thread_rng();
    for _ in requests.read() {
        let SceneWriter {
            commands,
            meshes,
            materials,
            roots,
            state,
            ..
        } = &mut writer;
        let mut backend = BevyBackend::new(commands, meshes, materials, **roots);
        state.scene.place_plant(&mut rng, &mut backend);
        info!(total = state.scene.plants().len(), "Plant added");
    }
}
