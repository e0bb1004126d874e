//! Decoration placement - gravel batches and plants on the tank floor
//!
//! Placement is uniform over the floor, shrunk by a margin so that objects
//! stay inside the glass. Nothing here is deterministic at runtime; every
//! function takes the RNG as a parameter so callers (and tests) choose the source.

use rand::Rng;

use crate::dimensions::TankDimensions;
use crate::tank::MaterialSpec;

/// Particles appended per gravel request
pub const GRAVEL_BATCH: usize = 50;
/// Gravel sphere radius (m)
pub const GRAVEL_RADIUS: f32 = 0.05;
/// Angular subdivisions of a gravel sphere (both directions)
pub const GRAVEL_SEGMENTS: u32 = 8;
/// Total margin subtracted from width/depth when placing a plant (m)
pub const PLANT_MARGIN: f32 = 0.3;
/// Uniform scale applied to user-supplied plant models
pub const PLANT_MODEL_SCALE: f32 = 0.5;

pub const STEM_RADIUS: f32 = 0.02;
pub const STEM_HEIGHT: f32 = 0.8;
pub const LEAF_RADIUS: f32 = 0.15;
pub const LEAF_HEIGHT: f32 = 0.3;
/// Radial resolution of the fallback plant primitives
pub const PRIMITIVE_RESOLUTION: u32 = 8;

/// Half-width of the sampling interval along one floor axis.
///
/// When the extent is smaller than the margin the interval collapses to the
/// center line instead of inverting.
pub fn placement_half_span(extent: f32, margin: f32) -> f32 {
    let half = (extent - margin) / 2.0;
    if half < 0.0 {
        tracing::warn!(
            extent,
            margin,
            "Tank too small for decoration margin, placing on the center line"
        );
        0.0
    } else {
        half
    }
}

fn sample_axis<R: Rng + ?Sized>(rng: &mut R, half_span: f32) -> f32 {
    if half_span > 0.0 {
        rng.gen_range(-half_span..half_span)
    } else {
        0.0
    }
}

/// Random (x, z) on the tank floor, `margin` meters in total kept free per axis
pub fn sample_floor_position<R: Rng + ?Sized>(
    rng: &mut R,
    dims: &TankDimensions,
    margin: f32,
) -> (f32, f32) {
    let half_x = placement_half_span(dims.width(), margin);
    let half_z = placement_half_span(dims.depth(), margin);
    (sample_axis(rng, half_x), sample_axis(rng, half_z))
}

/// A single gravel sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravelParticle {
    pub position: [f32; 3],
    pub radius: f32,
}

/// Generate `count` gravel particles floating at half a radius above the floor
pub fn gravel_batch<R: Rng + ?Sized>(
    rng: &mut R,
    dims: &TankDimensions,
    count: usize,
) -> Vec<GravelParticle> {
    let margin = GRAVEL_RADIUS * 2.0;
    let half_x = placement_half_span(dims.width(), margin);
    let half_z = placement_half_span(dims.depth(), margin);

    (0..count)
        .map(|_| GravelParticle {
            position: [
                sample_axis(rng, half_x),
                GRAVEL_RADIUS / 2.0,
                sample_axis(rng, half_z),
            ],
            radius: GRAVEL_RADIUS,
        })
        .collect()
}

/// Gravel surface: the registered texture, or the flat fallback color
#[derive(Debug, Clone, PartialEq)]
pub enum GravelSkin<T> {
    Textured(T),
    Color([f32; 3]),
}

impl<T: Clone> GravelSkin<T> {
    pub fn select(texture: Option<&T>, fallback: [f32; 3]) -> Self {
        match texture {
            Some(texture) => GravelSkin::Textured(texture.clone()),
            None => GravelSkin::Color(fallback),
        }
    }

    pub fn texture(&self) -> Option<&T> {
        match self {
            GravelSkin::Textured(texture) => Some(texture),
            GravelSkin::Color(_) => None,
        }
    }
}

/// Where a plant stands and how much it is scaled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantPlacement {
    pub position: [f32; 3],
    pub scale: f32,
}

impl PlantPlacement {
    /// Random floor position (base at y = 0) with the given uniform scale
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, dims: &TankDimensions, scale: f32) -> Self {
        let (x, z) = sample_floor_position(rng, dims, PLANT_MARGIN);
        Self {
            position: [x, 0.0, z],
            scale,
        }
    }
}

/// A primitive mesh part of the fallback plant, positioned relative to the plant base
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitivePart {
    pub radius: f32,
    pub height: f32,
    /// Center of the part relative to the plant origin
    pub center: [f32; 3],
    pub material: MaterialSpec,
}

impl PrimitivePart {
    pub fn base_y(&self) -> f32 {
        self.center[1] - self.height / 2.0
    }

    pub fn top_y(&self) -> f32 {
        self.center[1] + self.height / 2.0
    }
}

/// Built-in plant: a thin cylinder stem topped by an upward cone leaf
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackPlant {
    pub stem: PrimitivePart,
    pub leaf: PrimitivePart,
}

impl FallbackPlant {
    pub fn new(stem_color: [f32; 3], leaf_color: [f32; 3]) -> Self {
        Self {
            stem: PrimitivePart {
                radius: STEM_RADIUS,
                height: STEM_HEIGHT,
                center: [0.0, STEM_HEIGHT / 2.0, 0.0],
                material: MaterialSpec::opaque(stem_color),
            },
            leaf: PrimitivePart {
                radius: LEAF_RADIUS,
                height: LEAF_HEIGHT,
                center: [0.0, STEM_HEIGHT + LEAF_HEIGHT / 2.0, 0.0],
                material: MaterialSpec::opaque(leaf_color),
            },
        }
    }

    /// Height of the leaf apex above the plant base
    pub fn tip_height(&self) -> f32 {
        self.leaf.top_y()
    }
}

/// What gets instantiated for a new plant
#[derive(Debug, Clone, PartialEq)]
pub enum PlantBody<M> {
    /// Independent copy of the registered model template
    Model(M),
    Fallback(FallbackPlant),
}

impl<M> PlantBody<M> {
    pub fn is_model(&self) -> bool {
        matches!(self, PlantBody::Model(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::TankDimensionsCm;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dims(w: f32, h: f32, d: f32) -> TankDimensions {
        TankDimensionsCm::new(w, h, d).to_meters().unwrap()
    }

    #[test]
    fn test_half_span() {
        assert!((placement_half_span(0.6, 0.1) - 0.25).abs() < 1e-6);
        assert_eq!(placement_half_span(0.1, 0.1), 0.0);
        assert_eq!(placement_half_span(0.05, 0.1), 0.0);
    }

    #[test]
    fn test_gravel_batch_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let dims = dims(60.0, 40.0, 30.0);
        let batch = gravel_batch(&mut rng, &dims, GRAVEL_BATCH);

        assert_eq!(batch.len(), GRAVEL_BATCH);
        let half_x = (0.6 - 0.1) / 2.0;
        let half_z = (0.3 - 0.1) / 2.0;
        for particle in &batch {
            assert!(particle.position[0].abs() <= half_x);
            assert!(particle.position[2].abs() <= half_z);
            assert_eq!(particle.position[1], GRAVEL_RADIUS / 2.0);
            assert_eq!(particle.radius, GRAVEL_RADIUS);
        }
    }

    #[test]
    fn test_gravel_positions_vary() {
        let mut rng = StdRng::seed_from_u64(11);
        let batch = gravel_batch(&mut rng, &dims(100.0, 50.0, 100.0), 20);
        let first = batch[0].position;
        assert!(batch.iter().any(|p| p.position != first));
    }

    #[test]
    fn test_narrow_tank_collapses_to_center_line() {
        let mut rng = StdRng::seed_from_u64(3);
        // 8 cm wide: narrower than a gravel diameter plus margin
        let batch = gravel_batch(&mut rng, &dims(8.0, 40.0, 30.0), 10);
        assert!(batch.iter().all(|p| p.position[0] == 0.0));
        assert!(batch.iter().all(|p| p.position[2].abs() <= 0.1));
    }

    #[test]
    fn test_plant_placement_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let dims = dims(100.0, 60.0, 50.0);
        for _ in 0..100 {
            let placement = PlantPlacement::sample(&mut rng, &dims, PLANT_MODEL_SCALE);
            assert!(placement.position[0].abs() <= (1.0 - PLANT_MARGIN) / 2.0);
            assert!(placement.position[2].abs() <= (0.5 - PLANT_MARGIN) / 2.0);
            assert_eq!(placement.position[1], 0.0);
            assert_eq!(placement.scale, PLANT_MODEL_SCALE);
        }
    }

    #[test]
    fn test_plant_placement_in_small_tank() {
        let mut rng = StdRng::seed_from_u64(5);
        let placement = PlantPlacement::sample(&mut rng, &dims(20.0, 20.0, 20.0), 1.0);
        assert_eq!(placement.position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_fallback_plant_shape() {
        let plant = FallbackPlant::new([0.0, 0.5, 0.0], [0.0, 1.0, 0.0]);

        assert_eq!(plant.stem.base_y(), 0.0);
        assert!((plant.stem.center[1] - STEM_HEIGHT / 2.0).abs() < 1e-6);
        // Leaf base rests on the stem top, apex points up
        assert!((plant.leaf.base_y() - plant.stem.top_y()).abs() < 1e-6);
        assert!((plant.tip_height() - (STEM_HEIGHT + LEAF_HEIGHT)).abs() < 1e-6);
        assert_eq!(plant.stem.radius, STEM_RADIUS);
        assert_eq!(plant.leaf.radius, LEAF_RADIUS);
    }

    #[test]
    fn test_gravel_skin_selection() {
        let skin = GravelSkin::select(Some(&"pebbles.png"), [0.5, 0.4, 0.3]);
        assert_eq!(skin.texture(), Some(&"pebbles.png"));

        let skin: GravelSkin<&str> = GravelSkin::select(None, [0.5, 0.4, 0.3]);
        assert_eq!(skin, GravelSkin::Color([0.5, 0.4, 0.3]));
    }
}
