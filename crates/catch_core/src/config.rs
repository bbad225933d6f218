use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::movement::DirectionKeys;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_textures_dir")]
    pub textures_dir: PathBuf,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub bindings: BindingConfig,
    #[serde(default)]
    pub skins: SkinConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct MovementConfig {
    /// Pixels per tick.
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_sprint_speed")]
    pub sprint_speed: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BindingConfig {
    #[serde(default = "default_movement_sets")]
    pub movement_sets: Vec<DirectionKeys>,
    #[serde(default = "default_sprint_keys")]
    pub sprint: Vec<String>,
    #[serde(default = "default_cosmetic_key")]
    pub cosmetic_toggle: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SkinSpec {
    pub texture: String,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub egg_texture: Option<String>,
    #[serde(default = "default_scale")]
    pub egg_scale: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SkinConfig {
    #[serde(default = "default_player_skin")]
    pub player: SkinSpec,
    #[serde(default = "default_target_skin")]
    pub target: SkinSpec,
    #[serde(default = "default_background_skin")]
    pub background: SkinSpec,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AudioConfig {
    #[serde(default = "default_music")]
    pub music: PathBuf,
    #[serde(default = "default_egg_music")]
    pub egg_music: PathBuf,
    #[serde(default = "default_score_cue")]
    pub score: PathBuf,
    #[serde(default = "default_egg_score_cue")]
    pub egg_score: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            textures_dir: default_textures_dir(),
            movement: MovementConfig::default(),
            bindings: BindingConfig::default(),
            skins: SkinConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            sprint_speed: default_sprint_speed(),
        }
    }
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            movement_sets: default_movement_sets(),
            sprint: default_sprint_keys(),
            cosmetic_toggle: default_cosmetic_key(),
        }
    }
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self {
            player: default_player_skin(),
            target: default_target_skin(),
            background: default_background_skin(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music: default_music(),
            egg_music: default_egg_music(),
            score: default_score_cue(),
            egg_score: default_egg_score_cue(),
        }
    }
}

impl SkinConfig {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SkinSpec)> {
        [
            ("player", &self.player),
            ("target", &self.target),
            ("background", &self.background),
        ]
        .into_iter()
    }
}

impl GameConfig {
    /// Texture names that must load before the game can start.
    pub fn required_textures(&self) -> Vec<&str> {
        self.skins.iter().map(|(_, s)| s.texture.as_str()).collect()
    }

    /// Cosmetic texture names; each may be missing.
    pub fn optional_textures(&self) -> Vec<&str> {
        self.skins
            .iter()
            .filter_map(|(_, s)| s.egg_texture.as_deref())
            .collect()
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_config(&raw).map_err(|e| format!("{e} ({})", path.display()))
}

/// Load the config, falling back to built-in defaults when the file does not exist.
pub fn load_config_or_default(path: &Path) -> Result<GameConfig, String> {
    if !path.exists() {
        log::warn!(
            "Config '{}' not found, using built-in defaults.",
            path.display()
        );
        return Ok(GameConfig::default());
    }
    load_config_from_path(path)
}

pub fn parse_config(raw: &str) -> Result<GameConfig, String> {
    let config: GameConfig =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse config JSON: {e}"))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if !(config.movement.speed > 0.0) || !(config.movement.sprint_speed > 0.0) {
        return Err("Config validation failed: movement speeds must be > 0".to_string());
    }
    if config.bindings.movement_sets.is_empty() {
        return Err("Config validation failed: movement_sets is empty".to_string());
    }
    for set in &config.bindings.movement_sets {
        if set.codes().iter().any(|code| code.is_empty()) {
            return Err("Config validation failed: empty key code in movement set".to_string());
        }
    }
    if config.bindings.sprint.iter().any(String::is_empty)
        || config.bindings.cosmetic_toggle.is_empty()
    {
        return Err("Config validation failed: empty key code in bindings".to_string());
    }
    for (name, skin) in config.skins.iter() {
        if skin.texture.is_empty() {
            return Err(format!(
                "Config validation failed: skin '{name}' has no texture"
            ));
        }
        if !(skin.scale > 0.0) || !(skin.egg_scale > 0.0) {
            return Err(format!(
                "Config validation failed: skin '{name}' scales must be > 0"
            ));
        }
    }
    Ok(())
}

fn default_version() -> String {
    "0.1".to_string()
}

fn default_textures_dir() -> PathBuf {
    PathBuf::from("assets/textures")
}

const fn default_speed() -> f32 {
    5.0
}

const fn default_sprint_speed() -> f32 {
    10.0
}

const fn default_scale() -> f32 {
    1.0
}

fn default_movement_sets() -> Vec<DirectionKeys> {
    vec![DirectionKeys::wasd(), DirectionKeys::arrows()]
}

fn default_sprint_keys() -> Vec<String> {
    vec!["ShiftLeft".to_string(), "ShiftRight".to_string()]
}

fn default_cosmetic_key() -> String {
    "Space".to_string()
}

fn skin(texture: &str, scale: f32, egg_texture: &str, egg_scale: f32) -> SkinSpec {
    SkinSpec {
        texture: texture.to_string(),
        scale,
        egg_texture: Some(egg_texture.to_string()),
        egg_scale,
    }
}

fn default_player_skin() -> SkinSpec {
    skin("player", 0.5, "player_egg", 0.25)
}

fn default_target_skin() -> SkinSpec {
    skin("target", 0.15, "target_egg", 0.5)
}

fn default_background_skin() -> SkinSpec {
    skin("background", 1.0, "background_egg", 1.0)
}

fn default_music() -> PathBuf {
    PathBuf::from("assets/audio/music.mp3")
}

fn default_egg_music() -> PathBuf {
    PathBuf::from("assets/audio/music_egg.mp3")
}

fn default_score_cue() -> PathBuf {
    PathBuf::from("assets/audio/score.mp3")
}

fn default_egg_score_cue() -> PathBuf {
    PathBuf::from("assets/audio/score_egg.mp3")
}
