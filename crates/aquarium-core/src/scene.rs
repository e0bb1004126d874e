//! Scene composition root
//!
//! `AquariumScene` owns every piece of editor state: the validated dimensions,
//! the live tank and water objects, the decoration groups, the asset registry
//! and the viewport. Renderable objects are created and released through a
//! [`SceneBackend`], so the same logic drives Bevy and the test doubles below.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::assets::AssetRegistry;
use crate::config::SceneConfig;
use crate::dimensions::{DimensionError, TankDimensions, TankDimensionsCm};
use crate::placement::{
    gravel_batch, FallbackPlant, GravelParticle, GravelSkin, PlantBody, PlantPlacement,
};
use crate::tank::{rgb_hex, BoxSpec, MaterialSpec, TankLayout, TankStyle};

/// Handle types of a scene-graph runtime
pub trait SceneTypes {
    /// Decoded image usable as a gravel surface
    type Texture: Clone;
    /// Plant model template; cloning must yield an independently transformable copy
    type Model: Clone;
    /// A live renderable object owned by the scene
    type Object;
}

/// Seam to the runtime that actually creates and frees renderable objects
pub trait SceneBackend<S: SceneTypes> {
    fn spawn_tank(&mut self, spec: &BoxSpec, material: &MaterialSpec) -> S::Object;

    fn spawn_water(&mut self, spec: &BoxSpec, material: &MaterialSpec) -> S::Object;

    fn spawn_gravel(&mut self, particle: &GravelParticle, skin: &GravelSkin<S::Texture>)
        -> S::Object;

    fn spawn_plant(&mut self, placement: &PlantPlacement, body: &PlantBody<S::Model>)
        -> S::Object;

    /// Free the object and its geometry/material resources
    fn release(&mut self, object: S::Object);
}

/// Append-only collection of decorations, clearable as a unit
#[derive(Debug)]
pub struct DecorationGroup<O> {
    members: Vec<O>,
}

impl<O> Default for DecorationGroup<O> {
    fn default() -> Self {
        Self { members: Vec::new() }
    }
}

impl<O> DecorationGroup<O> {
    pub fn push(&mut self, object: O) {
        self.members.push(object);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Release every member through the backend; returns how many were released
    pub fn clear<S, B>(&mut self, backend: &mut B) -> usize
    where
        S: SceneTypes<Object = O>,
        B: SceneBackend<S> + ?Sized,
    {
        let count = self.members.len();
        for object in self.members.drain(..) {
            backend.release(object);
        }
        count
    }
}

/// Window size and the part of it covered by the control panel (logical px)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub panel_width: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, panel_width: f32) -> Self {
        Self {
            width,
            height,
            panel_width,
        }
    }

    /// Width left for the 3D view
    pub fn render_width(&self) -> f32 {
        (self.width - self.panel_width).max(0.0)
    }

    /// Aspect ratio of the render area, 1.0 while the area is degenerate
    pub fn aspect(&self) -> f32 {
        let width = self.render_width();
        if width > 0.0 && self.height > 0.0 {
            width / self.height
        } else {
            1.0
        }
    }
}

/// The aquarium being edited
pub struct AquariumScene<S: SceneTypes> {
    dimensions: TankDimensions,
    layout: TankLayout,
    tank: Option<S::Object>,
    water: Option<S::Object>,
    gravel: DecorationGroup<S::Object>,
    plants: DecorationGroup<S::Object>,
    registry: AssetRegistry<S::Texture, S::Model>,
    style: TankStyle,
    viewport: Viewport,
    gravel_count: usize,
    gravel_color: [f32; 3],
    plant_scale: f32,
    fallback_plant: FallbackPlant,
}

impl<S: SceneTypes> AquariumScene<S> {
    /// Build the scene state from configuration. No objects exist until [`Self::initialize`].
    ///
    /// Invalid configured dimensions fall back to the default tank.
    pub fn new(config: &SceneConfig) -> Self {
        let dimensions = match config.tank.dimensions_cm().to_meters() {
            Ok(dimensions) => dimensions,
            Err(e) => {
                warn!(error = %e, "Invalid configured tank dimensions, using defaults");
                TankDimensions::default()
            }
        };
        Self {
            dimensions,
            layout: TankLayout::from_dimensions(&dimensions),
            tank: None,
            water: None,
            gravel: DecorationGroup::default(),
            plants: DecorationGroup::default(),
            registry: AssetRegistry::new(),
            style: TankStyle::from(config.tank.style),
            viewport: Viewport::new(0.0, 0.0, config.viewport.panel_width),
            gravel_count: config.gravel.count_per_batch,
            gravel_color: config.gravel.color_rgb(),
            plant_scale: config.plant.model_scale,
            fallback_plant: FallbackPlant::new(
                rgb_hex(config.plant.stem_color),
                rgb_hex(config.plant.leaf_color),
            ),
        }
    }

    /// Create the initial tank and water
    pub fn initialize<B: SceneBackend<S> + ?Sized>(&mut self, backend: &mut B) {
        self.rebuild_tank(backend);
        info!(
            width = self.dimensions.width(),
            height = self.dimensions.height(),
            depth = self.dimensions.depth(),
            "Aquarium scene initialized"
        );
    }

    /// Apply new dimensions typed in centimeters.
    ///
    /// Invalid input is rejected before anything is touched. On success the
    /// tank and water are replaced and every decoration is released.
    pub fn update_dimensions<B: SceneBackend<S> + ?Sized>(
        &mut self,
        input: TankDimensionsCm,
        backend: &mut B,
    ) -> Result<TankLayout, DimensionError> {
        let dimensions = match input.to_meters() {
            Ok(dimensions) => dimensions,
            Err(e) => {
                warn!(error = %e, "Rejected tank dimensions");
                return Err(e);
            }
        };

        self.dimensions = dimensions;
        self.layout = TankLayout::from_dimensions(&dimensions);
        self.rebuild_tank(backend);

        let gravel = self.gravel.clear::<S, B>(backend);
        let plants = self.plants.clear::<S, B>(backend);
        info!(
            width = dimensions.width(),
            height = dimensions.height(),
            depth = dimensions.depth(),
            gravel,
            plants,
            "Tank rebuilt, decorations cleared"
        );
        Ok(self.layout)
    }

    fn rebuild_tank<B: SceneBackend<S> + ?Sized>(&mut self, backend: &mut B) {
        if let Some(tank) = self.tank.take() {
            backend.release(tank);
        }
        if let Some(water) = self.water.take() {
            backend.release(water);
        }
        self.tank = Some(backend.spawn_tank(&self.layout.tank, &self.style.glass));
        self.water = Some(backend.spawn_water(&self.layout.water, &self.style.water));
    }

    /// Append one batch of gravel; returns the number of particles added
    pub fn place_gravel<R, B>(&mut self, rng: &mut R, backend: &mut B) -> usize
    where
        R: Rng + ?Sized,
        B: SceneBackend<S> + ?Sized,
    {
        let skin = GravelSkin::select(self.registry.texture(), self.gravel_color);
        let batch = gravel_batch(rng, &self.dimensions, self.gravel_count);
        for particle in &batch {
            let object = backend.spawn_gravel(particle, &skin);
            self.gravel.push(object);
        }
        debug!(
            added = batch.len(),
            total = self.gravel.len(),
            textured = skin.texture().is_some(),
            "Gravel placed"
        );
        batch.len()
    }

    /// Append a single plant, from the registered model when there is one
    pub fn place_plant<R, B>(&mut self, rng: &mut R, backend: &mut B) -> PlantPlacement
    where
        R: Rng + ?Sized,
        B: SceneBackend<S> + ?Sized,
    {
        let (body, scale) = match self.registry.plant_model() {
            Some(template) => (PlantBody::Model(template.clone()), self.plant_scale),
            None => (PlantBody::Fallback(self.fallback_plant), 1.0),
        };
        let placement = PlantPlacement::sample(rng, &self.dimensions, scale);
        let object = backend.spawn_plant(&placement, &body);
        self.plants.push(object);
        debug!(
            x = placement.position[0],
            z = placement.position[2],
            model = body.is_model(),
            total = self.plants.len(),
            "Plant placed"
        );
        placement
    }

    pub fn set_texture(&mut self, texture: S::Texture) {
        self.registry.set_texture(texture);
    }

    pub fn set_plant_model(&mut self, model: S::Model) {
        self.registry.set_plant_model(model);
    }

    /// Track a window size change. Tank and decorations are left alone.
    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn dimensions(&self) -> &TankDimensions {
        &self.dimensions
    }

    pub fn layout(&self) -> &TankLayout {
        &self.layout
    }

    pub fn gravel(&self) -> &DecorationGroup<S::Object> {
        &self.gravel
    }

    pub fn plants(&self) -> &DecorationGroup<S::Object> {
        &self.plants
    }

    pub fn registry(&self) -> &AssetRegistry<S::Texture, S::Model> {
        &self.registry
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn style(&self) -> &TankStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{GRAVEL_RADIUS, LEAF_HEIGHT, STEM_HEIGHT};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq)]
    struct MockModel {
        name: &'static str,
        translation: [f32; 3],
        scale: f32,
    }

    #[derive(Debug)]
    enum Spawned {
        Tank(BoxSpec),
        Water(BoxSpec),
        Gravel(GravelParticle, GravelSkin<&'static str>),
        Plant(PlantPlacement, PlantBody<MockModel>),
    }

    struct Mock;

    impl SceneTypes for Mock {
        type Texture = &'static str;
        type Model = MockModel;
        type Object = u32;
    }

    /// Records every live object by id
    #[derive(Default)]
    struct RecordingBackend {
        next_id: u32,
        live: HashMap<u32, Spawned>,
        released: Vec<u32>,
    }

    impl RecordingBackend {
        fn add(&mut self, spawned: Spawned) -> u32 {
            self.next_id += 1;
            self.live.insert(self.next_id, spawned);
            self.next_id
        }

        fn count(&self, pred: impl Fn(&Spawned) -> bool) -> usize {
            self.live.values().filter(|&s| pred(s)).count()
        }

        fn tanks(&self) -> Vec<&BoxSpec> {
            self.live
                .values()
                .filter_map(|s| match s {
                    Spawned::Tank(spec) => Some(spec),
                    _ => None,
                })
                .collect()
        }

        fn waters(&self) -> Vec<&BoxSpec> {
            self.live
                .values()
                .filter_map(|s| match s {
                    Spawned::Water(spec) => Some(spec),
                    _ => None,
                })
                .collect()
        }
    }

    impl SceneBackend<Mock> for RecordingBackend {
        fn spawn_tank(&mut self, spec: &BoxSpec, _material: &MaterialSpec) -> u32 {
            self.add(Spawned::Tank(*spec))
        }

        fn spawn_water(&mut self, spec: &BoxSpec, _material: &MaterialSpec) -> u32 {
            self.add(Spawned::Water(*spec))
        }

        fn spawn_gravel(&mut self, particle: &GravelParticle, skin: &GravelSkin<&'static str>) -> u32 {
            self.add(Spawned::Gravel(*particle, skin.clone()))
        }

        fn spawn_plant(&mut self, placement: &PlantPlacement, body: &PlantBody<MockModel>) -> u32 {
            let body = match body {
                PlantBody::Model(model) => {
                    let mut instance = model.clone();
                    instance.translation = placement.position;
                    instance.scale = placement.scale;
                    PlantBody::Model(instance)
                }
                PlantBody::Fallback(plant) => PlantBody::Fallback(*plant),
            };
            self.add(Spawned::Plant(*placement, body))
        }

        fn release(&mut self, object: u32) {
            assert!(self.live.remove(&object).is_some(), "double release of {}", object);
            self.released.push(object);
        }
    }

    fn is_gravel(s: &Spawned) -> bool {
        matches!(s, Spawned::Gravel(..))
    }

    fn is_plant(s: &Spawned) -> bool {
        matches!(s, Spawned::Plant(..))
    }

    fn setup() -> (AquariumScene<Mock>, RecordingBackend, StdRng) {
        let mut scene = AquariumScene::new(&SceneConfig::default());
        let mut backend = RecordingBackend::default();
        scene.initialize(&mut backend);
        (scene, backend, StdRng::seed_from_u64(42))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_new_scene_has_no_objects() {
        let scene: AquariumScene<Mock> = AquariumScene::new(&SceneConfig::default());
        assert!(scene.tank.is_none() && scene.water.is_none());
        assert!(scene.gravel().is_empty());
        assert!(scene.plants().is_empty());
        assert!(!scene.registry().has_texture());
    }

    #[test]
    fn test_invalid_config_dimensions() {
        let mut config = SceneConfig::default();
        config.tank.depth_cm = 0.0;
        let scene: AquariumScene<Mock> = AquariumScene::new(&config);
        assert_eq!(*scene.dimensions(), TankDimensions::default());
    }

    #[test]
    fn test_example_end_to_end() {
        let (mut scene, mut backend, _) = setup();
        let layout = scene
            .update_dimensions(TankDimensionsCm::new(60.0, 40.0, 30.0), &mut backend)
            .unwrap();

        let dims = scene.dimensions();
        assert!(approx(dims.width(), 0.6) && approx(dims.height(), 0.4) && approx(dims.depth(), 0.3));

        let tank = backend.tanks()[0];
        let water = backend.waters()[0];
        assert_eq!(*tank, layout.tank);
        assert_eq!(*water, layout.water);
        for (actual, expected) in water.size.iter().zip([0.588, 0.36, 0.294]) {
            assert!(approx(*actual, expected));
        }
        assert!(approx(tank.base_y(), 0.0));
        assert!(approx(water.base_y(), 0.0));
        assert!(approx(water.center[1], 0.18));
    }

    #[test]
    fn test_single_live_tank_after_rebuilds() {
        let (mut scene, mut backend, _) = setup();
        for i in 1..=10 {
            let cm = 20.0 + i as f32 * 5.0;
            scene
                .update_dimensions(TankDimensionsCm::new(cm, cm, cm), &mut backend)
                .unwrap();
            assert_eq!(backend.tanks().len(), 1);
            assert_eq!(backend.waters().len(), 1);
        }
        // Initial pair plus ten rebuilt pairs, all but the last released
        assert_eq!(backend.released.len(), 20);
        assert!(approx(backend.tanks()[0].size[0], 0.7));
    }

    #[test]
    fn test_dimension_update_clears_decorations() {
        let (mut scene, mut backend, mut rng) = setup();
        scene.place_gravel(&mut rng, &mut backend);
        scene.place_gravel(&mut rng, &mut backend);
        scene.place_plant(&mut rng, &mut backend);
        assert_eq!(backend.count(is_gravel), 100);

        scene
            .update_dimensions(TankDimensionsCm::new(80.0, 50.0, 40.0), &mut backend)
            .unwrap();

        assert!(scene.gravel().is_empty());
        assert!(scene.plants().is_empty());
        assert_eq!(backend.count(is_gravel), 0);
        assert_eq!(backend.count(is_plant), 0);
    }

    #[test]
    fn test_gravel_is_cumulative() {
        let (mut scene, mut backend, mut rng) = setup();
        assert_eq!(scene.place_gravel(&mut rng, &mut backend), 50);
        assert_eq!(scene.gravel().len(), 50);
        scene.place_gravel(&mut rng, &mut backend);
        assert_eq!(scene.gravel().len(), 100);
        assert_eq!(backend.count(is_gravel), 100);
    }

    #[test]
    fn test_gravel_within_tank_bounds() {
        let (mut scene, mut backend, mut rng) = setup();
        scene
            .update_dimensions(TankDimensionsCm::new(45.0, 30.0, 25.0), &mut backend)
            .unwrap();
        for _ in 0..4 {
            scene.place_gravel(&mut rng, &mut backend);
        }

        let (half_x, half_z) = ((0.45 - 0.1) / 2.0, (0.25 - 0.1) / 2.0);
        for spawned in backend.live.values() {
            if let Spawned::Gravel(particle, _) = spawned {
                assert!(particle.position[0].abs() <= half_x);
                assert!(particle.position[2].abs() <= half_z);
                assert!(approx(particle.position[1], GRAVEL_RADIUS / 2.0));
            }
        }
    }

    #[test]
    fn test_plant_adds_exactly_one() {
        let (mut scene, mut backend, mut rng) = setup();
        scene.place_plant(&mut rng, &mut backend);
        assert_eq!(scene.plants().len(), 1);
        scene.place_plant(&mut rng, &mut backend);
        assert_eq!(scene.plants().len(), 2);
        assert_eq!(backend.count(is_plant), 2);
    }

    #[test]
    fn test_fallback_plant_without_model() {
        let (mut scene, mut backend, mut rng) = setup();
        let placement = scene.place_plant(&mut rng, &mut backend);
        assert_eq!(placement.scale, 1.0);
        assert_eq!(placement.position[1], 0.0);

        let plant = backend.live.values().find_map(|s| match s {
            Spawned::Plant(_, PlantBody::Fallback(plant)) => Some(*plant),
            _ => None,
        });
        let plant = plant.unwrap();
        assert!(approx(plant.tip_height(), STEM_HEIGHT + LEAF_HEIGHT));
    }

    #[test]
    fn test_texture_applies_only_to_later_gravel() {
        let (mut scene, mut backend, mut rng) = setup();
        scene.place_gravel(&mut rng, &mut backend);
        scene.set_texture("pebbles.png");
        scene.place_gravel(&mut rng, &mut backend);

        let mut textured = 0;
        let mut plain = 0;
        for spawned in backend.live.values() {
            if let Spawned::Gravel(_, skin) = spawned {
                match skin {
                    GravelSkin::Textured(texture) => {
                        assert_eq!(*texture, "pebbles.png");
                        textured += 1;
                    }
                    GravelSkin::Color(color) => {
                        assert_eq!(*color, rgb_hex(0x8d6e63));
                        plain += 1;
                    }
                }
            }
        }
        assert_eq!(textured, 50);
        assert_eq!(plain, 50);
    }

    #[test]
    fn test_plant_copies_are_independent() {
        let (mut scene, mut backend, mut rng) = setup();
        let template = MockModel {
            name: "fern",
            translation: [0.0; 3],
            scale: 1.0,
        };
        scene.set_plant_model(template.clone());
        let first = scene.place_plant(&mut rng, &mut backend);
        let second = scene.place_plant(&mut rng, &mut backend);
        assert_eq!(first.scale, 0.5);
        assert_ne!(first.position, second.position);

        // Move every instance; neither the template nor other copies follow
        let ids: Vec<u32> = backend
            .live
            .iter()
            .filter(|(_, s)| is_plant(s))
            .map(|(id, _)| *id)
            .collect();
        if let Some(Spawned::Plant(_, PlantBody::Model(model))) = backend.live.get_mut(&ids[0]) {
            model.translation = [9.0, 9.0, 9.0];
        }
        if let Some(Spawned::Plant(_, PlantBody::Model(model))) = backend.live.get(&ids[1]) {
            assert_ne!(model.translation, [9.0, 9.0, 9.0]);
            assert_eq!(model.scale, 0.5);
            assert_eq!(model.name, "fern");
        } else {
            panic!("second plant is not a model copy");
        }
        assert_eq!(scene.registry().plant_model(), Some(&template));
    }

    #[test]
    fn test_rejected_dimensions_keep_state() {
        let (mut scene, mut backend, mut rng) = setup();
        scene.place_gravel(&mut rng, &mut backend);
        let before = *scene.dimensions();
        let released = backend.released.len();

        for input in [
            TankDimensionsCm::new(f32::NAN, 40.0, 30.0),
            TankDimensionsCm::new(60.0, -5.0, 30.0),
            TankDimensionsCm::new(60.0, 40.0, 0.0),
        ] {
            assert!(scene.update_dimensions(input, &mut backend).is_err());
        }

        assert_eq!(*scene.dimensions(), before);
        assert_eq!(scene.gravel().len(), 50);
        assert_eq!(backend.released.len(), released);
        assert_eq!(backend.tanks().len(), 1);
    }

    #[test]
    fn test_resize_touches_only_viewport() {
        let (mut scene, mut backend, mut rng) = setup();
        scene.place_gravel(&mut rng, &mut backend);
        let live = backend.live.len();

        scene.resize_viewport(1280.0, 720.0);

        assert_eq!(scene.viewport().render_width(), 980.0);
        assert!(approx(scene.viewport().aspect(), 980.0 / 720.0));
        assert_eq!(backend.live.len(), live);
        assert!(backend.released.is_empty());
        assert_eq!(scene.gravel().len(), 50);
    }

    #[test]
    fn test_degenerate_viewport() {
        let viewport = Viewport::new(200.0, 0.0, 300.0);
        assert_eq!(viewport.render_width(), 0.0);
        assert_eq!(viewport.aspect(), 1.0);
    }
}
