//! Asset registry - the single current gravel texture and plant model
//!
//! Slots start empty, which means "use the built-in fallback". A completed load
//! overwrites the slot regardless of when it was started; the generation
//! counter only tells observers that something changed.

use std::fmt;
use std::path::Path;

/// User-suppliable asset categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    GravelTexture,
    PlantModel,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::GravelTexture, AssetKind::PlantModel];

    /// Accepted file extensions, lowercase, without the dot
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetKind::GravelTexture => &["png", "jpg", "jpeg"],
            AssetKind::PlantModel => &["glb", "gltf"],
        }
    }

    /// HTML `accept` attribute value, e.g. ".glb,.gltf"
    pub fn accept_string(&self) -> String {
        self.extensions()
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Whether a filename carries one of the accepted extensions (case-insensitive)
    pub fn accepts(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions().contains(&ext.as_str())
            })
            .unwrap_or(false)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::GravelTexture => "gravel texture",
            AssetKind::PlantModel => "plant model",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single-value register: every write replaces the value and bumps the generation
#[derive(Debug, Clone)]
pub struct AssetSlot<T> {
    value: Option<T>,
    generation: u64,
}

impl<T> Default for AssetSlot<T> {
    fn default() -> Self {
        Self {
            value: None,
            generation: 0,
        }
    }
}

impl<T> AssetSlot<T> {
    pub fn set(&mut self, value: T) -> u64 {
        self.value = Some(value);
        self.generation += 1;
        self.generation
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Current user-supplied assets: `T` is a texture handle, `M` a model template
#[derive(Debug, Clone)]
pub struct AssetRegistry<T, M> {
    texture: AssetSlot<T>,
    plant_model: AssetSlot<M>,
}

impl<T, M> Default for AssetRegistry<T, M> {
    fn default() -> Self {
        Self {
            texture: AssetSlot::default(),
            plant_model: AssetSlot::default(),
        }
    }
}

impl<T, M> AssetRegistry<T, M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the gravel texture. Already placed gravel keeps its old surface.
    pub fn set_texture(&mut self, texture: T) {
        let generation = self.texture.set(texture);
        tracing::debug!(generation, "Gravel texture replaced");
    }

    /// Replace the plant model template. Already placed plants are untouched.
    pub fn set_plant_model(&mut self, model: M) {
        let generation = self.plant_model.set(model);
        tracing::debug!(generation, "Plant model replaced");
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_set()
    }

    pub fn has_plant_model(&self) -> bool {
        self.plant_model.is_set()
    }

    pub fn texture(&self) -> Option<&T> {
        self.texture.get()
    }

    pub fn plant_model(&self) -> Option<&M> {
        self.plant_model.get()
    }

    pub fn has(&self, kind: AssetKind) -> bool {
        match kind {
            AssetKind::GravelTexture => self.has_texture(),
            AssetKind::PlantModel => self.has_plant_model(),
        }
    }

    /// Number of writes so far for the given slot
    pub fn generation(&self, kind: AssetKind) -> u64 {
        match kind {
            AssetKind::GravelTexture => self.texture.generation(),
            AssetKind::PlantModel => self.plant_model.generation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_starts_empty() {
        let registry: AssetRegistry<String, String> = AssetRegistry::new();
        assert!(!registry.has_texture());
        assert!(!registry.has_plant_model());
        assert!(registry.texture().is_none());
        assert_eq!(registry.generation(AssetKind::GravelTexture), 0);
        assert_eq!(registry.generation(AssetKind::PlantModel), 0);
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry: AssetRegistry<&str, &str> = AssetRegistry::new();
        registry.set_texture("sand.png");
        registry.set_texture("pebbles.jpg");

        assert_eq!(registry.texture(), Some(&"pebbles.jpg"));
        assert_eq!(registry.generation(AssetKind::GravelTexture), 2);
        assert!(!registry.has(AssetKind::PlantModel));

        registry.set_plant_model("fern.glb");
        assert_eq!(registry.plant_model(), Some(&"fern.glb"));
        assert_eq!(registry.generation(AssetKind::PlantModel), 1);
        assert_eq!(registry.generation(AssetKind::GravelTexture), 2);
    }

    #[test]
    fn test_extension_filter() {
        assert!(AssetKind::GravelTexture.accepts("pebbles.PNG"));
        assert!(AssetKind::GravelTexture.accepts("sand.jpeg"));
        assert!(!AssetKind::GravelTexture.accepts("fern.glb"));
        assert!(AssetKind::PlantModel.accepts("models/fern.gltf"));
        assert!(!AssetKind::PlantModel.accepts("README"));
        assert!(!AssetKind::PlantModel.accepts(""));
    }

    #[test]
    fn test_accept_string() {
        assert_eq!(AssetKind::GravelTexture.accept_string(), ".png,.jpg,.jpeg");
        assert_eq!(AssetKind::PlantModel.accept_string(), ".glb,.gltf");
    }
}
