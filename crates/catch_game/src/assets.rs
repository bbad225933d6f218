//! Texture preloading. Every texture is read before the session starts:
//! base skins are required, easter-egg skins are optional.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use catch_core::{AssetCatalog, GameConfig};
use catch_render::{SpritePipeline, Texture};

pub struct GpuSpriteTexture {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

pub struct LoadedTextures {
    pub catalog: AssetCatalog,
    pub gpu: HashMap<Arc<str>, GpuSpriteTexture>,
}

impl LoadedTextures {
    pub fn memory_estimate_mb(&self) -> f32 {
        let bytes: usize = self
            .gpu
            .values()
            .map(|t| (t.texture.size.0 as usize) * (t.texture.size.1 as usize) * 4)
            .sum();
        bytes as f32 / (1024.0 * 1024.0)
    }
}

pub fn texture_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.png"))
}

fn load_texture_asset_strict(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &SpritePipeline,
    path: &Path,
) -> Result<GpuSpriteTexture, String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("Failed to read texture '{}': {e}", path.display()))?;
    let label = path.display().to_string();
    let texture = Texture::from_bytes(device, queue, &bytes, &label)?;
    let bind_group = pipeline.create_texture_bind_group(device, &texture);
    Ok(GpuSpriteTexture {
        texture,
        bind_group,
    })
}

/// Upload every texture the config names. Fails on the first missing required one.
pub fn load_textures(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &SpritePipeline,
    config: &GameConfig,
) -> Result<LoadedTextures, String> {
    let mut loaded = LoadedTextures {
        catalog: AssetCatalog::new(),
        gpu: HashMap::new(),
    };
    let mut insert = |name: &str, texture: GpuSpriteTexture| {
        let (w, h) = texture.texture.size;
        loaded.catalog.insert(name, w, h);
        loaded.gpu.insert(Arc::from(name), texture);
    };

    for name in config.required_textures() {
        let path = texture_path(&config.textures_dir, name);
        let texture = load_texture_asset_strict(device, queue, pipeline, &path)?;
        insert(name, texture);
    }
    for name in config.optional_textures() {
        let path = texture_path(&config.textures_dir, name);
        match load_texture_asset_strict(device, queue, pipeline, &path) {
            Ok(texture) => insert(name, texture),
            Err(e) => log::warn!("{e}. Easter-egg skin '{name}' disabled."),
        }
    }

    log::info!(
        "Loaded {} textures ({:.1} MB)",
        loaded.gpu.len(),
        loaded.memory_estimate_mb()
    );
    Ok(loaded)
}

/// Texture sizes only, for headless runs that never touch the GPU.
pub fn probe_catalog(config: &GameConfig) -> Result<AssetCatalog, String> {
    let mut catalog = AssetCatalog::new();
    for name in config.required_textures() {
        let path = texture_path(&config.textures_dir, name);
        let (w, h) = image::image_dimensions(&path)
            .map_err(|e| format!("Failed to read texture '{}': {e}", path.display()))?;
        catalog.insert(name, w, h);
    }
    for name in config.optional_textures() {
        let path = texture_path(&config.textures_dir, name);
        match image::image_dimensions(&path) {
            Ok((w, h)) => {
                catalog.insert(name, w, h);
            }
            Err(e) => log::warn!(
                "Failed to read texture '{}': {e}. Easter-egg skin '{name}' disabled.",
                path.display()
            ),
        }
    }
    Ok(catalog)
}
