//! Logical texture names resolved by the host's preload step.
//!
//! The host decodes and uploads textures, then records each one here under
//! its logical name ("player", "player_egg", ...). Gameplay asks for required
//! textures through `require` (missing is fatal) and cosmetic ones through
//! `optional` (missing disables the feature).

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    pub key: Arc<str>,
    pub width: u32,
    pub height: u32,
}

impl TextureHandle {
    pub fn new(key: &str, width: u32, height: u32) -> Self {
        Self {
            key: Arc::from(key),
            width,
            height,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    textures: HashMap<String, TextureHandle>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, width: u32, height: u32) -> TextureHandle {
        let handle = TextureHandle::new(name, width, height);
        self.textures.insert(name.to_string(), handle.clone());
        handle
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn require(&self, name: &str) -> Result<TextureHandle, String> {
        self.textures
            .get(name)
            .cloned()
            .ok_or_else(|| format!("Required texture '{name}' was not loaded"))
    }

    pub fn optional(&self, name: &str) -> Option<TextureHandle> {
        let found = self.textures.get(name).cloned();
        if found.is_none() {
            log::warn!("Optional texture '{}' is unavailable; its cosmetic swap is disabled", name);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_returns_inserted_handle() {
        let mut catalog = AssetCatalog::new();
        catalog.insert("player", 128, 64);
        let handle = catalog.require("player").expect("player was inserted");
        assert_eq!(&*handle.key, "player");
        assert_eq!(handle.size(), Vec2::new(128.0, 64.0));
    }

    #[test]
    fn require_missing_is_an_error_naming_the_asset() {
        let catalog = AssetCatalog::new();
        let err = catalog.require("background").expect_err("nothing loaded");
        assert!(err.contains("'background'"));
    }

    #[test]
    fn optional_missing_is_none() {
        let mut catalog = AssetCatalog::new();
        catalog.insert("target", 10, 10);
        assert!(catalog.optional("target_egg").is_none());
        assert!(catalog.optional("target").is_some());
        assert_eq!(catalog.len(), 1);
    }
}
