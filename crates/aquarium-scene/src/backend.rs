//! Bevy implementation of the scene backend
//!
//! Tank, water and gravel get their own mesh and material assets, removed
//! explicitly on release. Plant models are instanced through a fresh
//! `SceneRoot` so every plant has its own transform hierarchy.

use aquarium_core::placement::{PrimitivePart, GRAVEL_SEGMENTS, PRIMITIVE_RESOLUTION};
use aquarium_core::{
    BoxSpec, GravelParticle, GravelSkin, MaterialSpec, PlantBody, PlantPlacement, SceneBackend,
    SceneTypes,
};
use bevy::prelude::*;

/// Handle types used by the Bevy-backed scene
pub struct BevyScene;

impl SceneTypes for BevyScene {
    type Texture = Handle<Image>;
    type Model = Handle<Scene>;
    type Object = SceneObject;
}

/// A live entity plus the assets it exclusively owns
#[derive(Debug)]
pub struct SceneObject {
    pub entity: Entity,
    pub meshes: Vec<Handle<Mesh>>,
    pub materials: Vec<Handle<StandardMaterial>>,
}

/// Marker for the tank glass
#[derive(Component)]
pub struct TankGlass;

/// Marker for the water volume
#[derive(Component)]
pub struct WaterVolume;

/// Marker for a gravel particle
#[derive(Component)]
pub struct GravelStone;

/// Marker for a plant instance (model or fallback)
#[derive(Component)]
pub struct PlantInstance;

/// Persistent parents of the decoration groups
#[derive(Debug, Clone, Copy, Resource)]
pub struct DecorationRoots {
    pub gravel: Entity,
    pub plants: Entity,
}

/// Marker for the gravel group parent
#[derive(Component)]
pub struct GravelGroup;

/// Marker for the plant group parent
#[derive(Component)]
pub struct PlantGroup;

/// Convert a renderer-independent material description
pub fn standard_material(spec: &MaterialSpec) -> StandardMaterial {
    let [r, g, b] = spec.color;
    let mut material = StandardMaterial {
        base_color: Color::srgba(r, g, b, spec.opacity),
        alpha_mode: if spec.is_transparent() {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        unlit: spec.unlit,
        double_sided: spec.double_sided,
        perceptual_roughness: 0.6,
        ..default()
    };
    if spec.double_sided {
        material.cull_mode = None;
    }
    material
}

fn gravel_material(skin: &GravelSkin<Handle<Image>>) -> StandardMaterial {
    match skin {
        GravelSkin::Textured(texture) => StandardMaterial {
            base_color: Color::WHITE,
            base_color_texture: Some(texture.clone()),
            perceptual_roughness: 0.9,
            ..default()
        },
        GravelSkin::Color([r, g, b]) => StandardMaterial {
            base_color: Color::srgb(*r, *g, *b),
            perceptual_roughness: 0.9,
            ..default()
        },
    }
}

fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

/// Scene backend borrowing the ECS pieces it spawns into
pub struct BevyBackend<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<StandardMaterial>,
    pub roots: DecorationRoots,
}

impl<'a, 'w, 's> BevyBackend<'a, 'w, 's> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        meshes: &'a mut Assets<Mesh>,
        materials: &'a mut Assets<StandardMaterial>,
        roots: DecorationRoots,
    ) -> Self {
        Self {
            commands,
            meshes,
            materials,
            roots,
        }
    }

    fn spawn_box(
        &mut self,
        spec: &BoxSpec,
        material: &MaterialSpec,
        marker: impl Bundle,
    ) -> SceneObject {
        let [width, height, depth] = spec.size;
        let mesh = self.meshes.add(Cuboid::new(width, height, depth));
        let material = self.materials.add(standard_material(material));
        let entity = self
            .commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(vec3(spec.center)),
                marker,
            ))
            .id();
        SceneObject {
            entity,
            meshes: vec![mesh],
            materials: vec![material],
        }
    }

    fn spawn_part(
        &mut self,
        parent: Entity,
        part: &PrimitivePart,
        mesh: impl Into<Mesh>,
        object: &mut SceneObject,
    ) {
        let mesh = self.meshes.add(mesh);
        let material = self.materials.add(standard_material(&part.material));
        self.commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(vec3(part.center)),
            ChildOf(parent),
        ));
        object.meshes.push(mesh);
        object.materials.push(material);
    }
}

impl SceneBackend<BevyScene> for BevyBackend<'_, '_, '_> {
    fn spawn_tank(&mut self, spec: &BoxSpec, material: &MaterialSpec) -> SceneObject {
        self.spawn_box(spec, material, (TankGlass, Name::new("Tank")))
    }

    fn spawn_water(&mut self, spec: &BoxSpec, material: &MaterialSpec) -> SceneObject {
        self.spawn_box(spec, material, (WaterVolume, Name::new("Water")))
    }

    fn spawn_gravel(
        &mut self,
        particle: &GravelParticle,
        skin: &GravelSkin<Handle<Image>>,
    ) -> SceneObject {
        let mesh = self.meshes.add(
            Sphere::new(particle.radius)
                .mesh()
                .uv(GRAVEL_SEGMENTS, GRAVEL_SEGMENTS),
        );
        let material = self.materials.add(gravel_material(skin));
        let entity = self
            .commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(vec3(particle.position)),
                GravelStone,
                ChildOf(self.roots.gravel),
            ))
            .id();
        SceneObject {
            entity,
            meshes: vec![mesh],
            materials: vec![material],
        }
    }

    fn spawn_plant(
        &mut self,
        placement: &PlantPlacement,
        body: &PlantBody<Handle<Scene>>,
    ) -> SceneObject {
        let transform = Transform::from_translation(vec3(placement.position))
            .with_scale(Vec3::splat(placement.scale));

        match body {
            PlantBody::Model(scene) => {
                let entity = self
                    .commands
                    .spawn((
                        SceneRoot(scene.clone()),
                        transform,
                        PlantInstance,
                        ChildOf(self.roots.plants),
                    ))
                    .id();
                // Model meshes belong to the loaded template and outlive the instance
                SceneObject {
                    entity,
                    meshes: Vec::new(),
                    materials: Vec::new(),
                }
            }
            PlantBody::Fallback(plant) => {
                let entity = self
                    .commands
                    .spawn((
                        transform,
                        Visibility::default(),
                        PlantInstance,
                        ChildOf(self.roots.plants),
                    ))
                    .id();
                let mut object = SceneObject {
                    entity,
                    meshes: Vec::with_capacity(2),
                    materials: Vec::with_capacity(2),
                };
                let stem = Cylinder::new(plant.stem.radius, plant.stem.height)
                    .mesh()
                    .resolution(PRIMITIVE_RESOLUTION);
                self.spawn_part(entity, &plant.stem, stem, &mut object);
                let leaf = Cone {
                    radius: plant.leaf.radius,
                    height: plant.leaf.height,
                }
                .mesh()
                .resolution(PRIMITIVE_RESOLUTION);
                self.spawn_part(entity, &plant.leaf, leaf, &mut object);
                object
            }
        }
    }

    fn release(&mut self, object: SceneObject) {
        for mesh in &object.meshes {
            self.meshes.remove(mesh.id());
        }
        for material in &object.materials {
            self.materials.remove(material.id());
        }
        self.commands.entity(object.entity).despawn();
    }
}
