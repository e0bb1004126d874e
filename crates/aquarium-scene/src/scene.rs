//! Scene setup: camera, lighting, decoration groups and the initial tank

use aquarium_core::tank::rgb_hex;
use aquarium_core::Viewport;
use bevy::camera::Viewport as CameraViewport;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use tracing::debug;

use crate::backend::{BevyBackend, DecorationRoots, GravelGroup, PlantGroup};
use crate::camera::MainCamera;
use crate::types::{AquariumState, SceneSettings};

/// Plugin that builds the static parts of the scene
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene)
            .add_systems(Update, track_viewport);
    }
}

fn color(hex: u32) -> Color {
    let [r, g, b] = rgb_hex(hex);
    Color::srgb(r, g, b)
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<SceneSettings>,
    mut state: ResMut<AquariumState>,
) {
    let config = &settings.0;

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.fov_degrees.to_radians(),
            near: config.camera.near,
            far: config.camera.far,
            ..default()
        }),
        Transform::from_translation(Vec3::from_array(config.camera.position))
            .looking_at(Vec3::ZERO, Vec3::Y),
        AmbientLight {
            color: color(config.lighting.ambient_color),
            brightness: config.lighting.ambient_brightness,
            ..default()
        },
        MainCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: config.lighting.directional_illuminance,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(config.lighting.directional_position))
            .looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let roots = DecorationRoots {
        gravel: commands
            .spawn((
                Transform::default(),
                Visibility::default(),
                GravelGroup,
                Name::new("Gravel"),
            ))
            .id(),
        plants: commands
            .spawn((
                Transform::default(),
                Visibility::default(),
                PlantGroup,
                Name::new("Plants"),
            ))
            .id(),
    };
    commands.insert_resource(roots);

    let mut backend = BevyBackend::new(&mut commands, &mut meshes, &mut materials, roots);
    state.scene.initialize(&mut backend);
}

/// Physical-pixel area right of the control panel, `None` while it has no area
pub fn render_area(
    viewport: &Viewport,
    scale_factor: f32,
    physical_size: UVec2,
) -> Option<CameraViewport> {
    let x = ((viewport.panel_width * scale_factor).round() as u32).min(physical_size.x);
    let width = ((viewport.render_width() * scale_factor).round() as u32).min(physical_size.x - x);
    if width == 0 || physical_size.y == 0 {
        return None;
    }
    Some(CameraViewport {
        physical_position: UVec2::new(x, 0),
        physical_size: UVec2::new(width, physical_size.y),
        ..default()
    })
}

fn same_area(a: Option<&CameraViewport>, b: Option<&CameraViewport>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            a.physical_position == b.physical_position && a.physical_size == b.physical_size
        }
        (None, None) => true,
        _ => false,
    }
}

/// Keep the viewport model and the camera's render area in step with the
/// primary window. Runs on the first frame too, which sizes the initial view.
fn track_viewport(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut cameras: Query<&mut Camera, With<MainCamera>>,
    mut state: ResMut<AquariumState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    state.scene.resize_viewport(window.width(), window.height());

    let viewport = *state.scene.viewport();
    let area = render_area(&viewport, window.scale_factor(), window.physical_size());
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };
    if !same_area(camera.viewport.as_ref(), area.as_ref()) {
        debug!(
            width = viewport.render_width(),
            height = viewport.height,
            aspect = viewport.aspect(),
            "Render area resized"
        );
        camera.viewport = area;
    }
}
