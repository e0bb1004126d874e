//! Camera controls and orbit navigation (Y is up)

use aquarium_core::config::CameraConfig;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

const MIN_DISTANCE: f32 = 0.2;
const MAX_DISTANCE: f32 = 50.0;
const ELEVATION_LIMIT: f32 = 1.5;

/// Camera controller settings
#[derive(Debug, Clone, Resource)]
pub struct CameraSettings {
    pub distance: f32,
    pub target_distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub target: Vec3,
    pub target_focus: Vec3,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl CameraSettings {
    /// Orbit state that places the camera at the configured position, looking at the origin
    pub fn from_config(config: &CameraConfig) -> Self {
        let position = Vec3::from_array(config.position);
        let distance = position.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let azimuth = position.x.atan2(position.z);
        let elevation = (position.y / position.length().max(f32::EPSILON))
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
        Self {
            distance,
            target_distance: distance,
            azimuth,
            elevation,
            target: Vec3::ZERO,
            target_focus: Vec3::ZERO,
            sensitivity: config.sensitivity,
            zoom_speed: config.zoom_speed,
            smooth_factor: config.damping,
        }
    }

    /// Camera position relative to the orbit target
    pub fn offset(&self) -> Vec3 {
        orbit_offset(self.distance, self.azimuth, self.elevation)
    }
}

/// Spherical to cartesian, azimuth measured from +Z towards +X
pub fn orbit_offset(distance: f32, azimuth: f32, elevation: f32) -> Vec3 {
    Vec3::new(
        distance * azimuth.sin() * elevation.cos(),
        distance * elevation.sin(),
        distance * azimuth.cos() * elevation.cos(),
    )
}

/// Exponential smoothing weight for one frame
pub fn damping_factor(smooth_factor: f32, dt: f32) -> f32 {
    1.0 - (-smooth_factor * 60.0 * dt).exp()
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Update, update_camera);
    }
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut settings: ResMut<CameraSettings>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    time: Res<Time>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Leave the pointer to egui while it is over the panel
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }

    if !egui_wants_pointer {
        // Orbit with left drag
        if mouse_button.pressed(MouseButton::Left) {
            settings.azimuth -= total_motion.x * settings.sensitivity;
            settings.elevation = (settings.elevation + total_motion.y * settings.sensitivity)
                .clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
        }

        // Pan with right drag, in the camera's vertical plane
        if mouse_button.pressed(MouseButton::Right) {
            let right = Vec3::new(settings.azimuth.cos(), 0.0, -settings.azimuth.sin());
            let pan_speed = settings.distance * 0.002;
            let delta = -right * total_motion.x * pan_speed + Vec3::Y * total_motion.y * pan_speed;
            settings.target_focus += delta;
        }

        for scroll in mouse_wheel.read() {
            let zoom_factor = 1.0 - scroll.y * settings.zoom_speed;
            settings.target_distance =
                (settings.target_distance * zoom_factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }

        // One finger orbits
        if touch_input.iter().count() == 1 {
            for touch in touch_input.iter() {
                let delta = touch.delta();
                if delta != Vec2::ZERO {
                    settings.azimuth -= delta.x * settings.sensitivity;
                    settings.elevation = (settings.elevation + delta.y * settings.sensitivity)
                        .clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
                }
            }
        }
    } else {
        // Drain the scroll events even if we're not using them
        for _ in mouse_wheel.read() {}
    }

    // Two fingers pinch-zoom
    if touch_input.iter().count() == 2 {
        let touches: Vec<_> = touch_input.iter().collect();
        if let (Some(t1), Some(t2)) = (touches.first(), touches.get(1)) {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            let zoom_factor = prev_dist / curr_dist.max(1.0);
            settings.target_distance =
                (settings.target_distance * zoom_factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    let lerp_factor = damping_factor(settings.smooth_factor, time.delta_secs());
    settings.distance += (settings.target_distance - settings.distance) * lerp_factor;
    settings.target = settings.target + (settings.target_focus - settings.target) * lerp_factor;

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = settings.target + settings.offset();
        transform.look_at(settings.target, Vec3::Y);
    }
}
