//! egui control panel

use aquarium_core::{AssetKind, TankDimensionsCm};
use aquarium_scene::{
    AddGravel, AddPlant, AquariumState, EditorStatus, SceneSettings, UpdateDimensions,
};
use aquarium_scene::assets::PendingAssetLoads;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::file_picker::{trigger_file_open, PendingFileResults};

/// Largest value accepted by the dimension fields (cm)
const MAX_DIMENSION_CM: f32 = 1000.0;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_dimension_form)
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

/// Values currently typed into the dimension fields (cm)
#[derive(Debug, Clone, Copy, Resource)]
pub struct DimensionForm(pub TankDimensionsCm);

fn init_dimension_form(mut commands: Commands, settings: Res<SceneSettings>) {
    commands.insert_resource(DimensionForm(settings.0.tank.dimensions_cm()));
}

/// Grouped system parameters for the control panel
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub form: Option<ResMut<'w, DimensionForm>>,
    pub settings: Res<'w, SceneSettings>,
    pub state: Res<'w, AquariumState>,
    pub status: ResMut<'w, EditorStatus>,
    pub pending_loads: Res<'w, PendingAssetLoads>,
    pub pending_files: Res<'w, PendingFileResults>,
    pub update_dimensions: MessageWriter<'w, UpdateDimensions>,
    pub add_gravel: MessageWriter<'w, AddGravel>,
    pub add_plant: MessageWriter<'w, AddPlant>,
}

fn dimension_field(ui: &mut egui::Ui, label: &str, value: &mut f32) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(
            egui::DragValue::new(value)
                .speed(0.5)
                .range(0.0..=MAX_DIMENSION_CM)
                .suffix(" cm"),
        );
    });
}

fn asset_status(params: &UiParams, kind: AssetKind) -> String {
    if params.pending_loads.is_loading(kind) {
        "loading...".to_string()
    } else if params.state.scene.registry().has(kind) {
        "custom".to_string()
    } else {
        "built-in".to_string()
    }
}

fn ui_system(mut params: UiParams) {
    let panel_width = params.settings.0.viewport.panel_width;
    let texture_status = asset_status(&params, AssetKind::GravelTexture);
    let model_status = asset_status(&params, AssetKind::PlantModel);
    let gravel_count = params.state.scene.gravel().len();
    let plant_count = params.state.scene.plants().len();
    let last_error = params.status.last_error.clone();
    let last_info = params.status.last_info.clone();

    let Some(mut form) = params.form.take() else {
        return;
    };
    let Ok(ctx) = params.contexts.ctx_mut() else { return };

    egui::SidePanel::left("aquarium_panel")
        .exact_width(panel_width)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Aquarium");
            ui.separator();

            ui.label("Tank dimensions");
            dimension_field(ui, "Width: ", &mut form.0.width);
            dimension_field(ui, "Height:", &mut form.0.height);
            dimension_field(ui, "Depth: ", &mut form.0.depth);
            if ui.button("Update dimensions").clicked() {
                params.update_dimensions.write(UpdateDimensions(form.0));
            }

            ui.separator();

            ui.label("Decorations");
            ui.horizontal(|ui| {
                if ui.button("Add gravel").clicked() {
                    params.add_gravel.write(AddGravel);
                }
                if ui.button("Add plant").clicked() {
                    params.add_plant.write(AddPlant);
                }
            });
            ui.label(format!("Gravel: {}", gravel_count));
            ui.label(format!("Plants: {}", plant_count));

            ui.separator();

            ui.label("Assets");
            if ui.button("Load gravel texture").clicked() {
                trigger_file_open(&params.pending_files, AssetKind::GravelTexture);
            }
            ui.label(format!("Gravel texture: {}", texture_status));
            if ui.button("Load plant model").clicked() {
                trigger_file_open(&params.pending_files, AssetKind::PlantModel);
            }
            ui.label(format!("Plant model: {}", model_status));

            ui.separator();

            if let Some(error) = &last_error {
                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(egui::Color32::from_rgb(230, 80, 80), error);
                    if ui.small_button("Dismiss").clicked() {
                        params.status.clear_error();
                    }
                });
            } else if let Some(info) = &last_info {
                ui.label(info);
            }
        });
}
