//! Player, target and background sprites with their per-tick behaviour.
//!
//! Sizes follow the texture: `size = texture size * |scale|`. A negative
//! horizontal scale mirrors the sprite. `position` is the collision origin;
//! the host draws each sprite centred on it.

use glam::Vec2;
use rand::Rng;

use crate::assets::{AssetCatalog, TextureHandle};
use crate::collision::{Aabb, Bounded};
use crate::config::{SkinConfig, SkinSpec};
use crate::cosmetic::CosmeticMode;
use crate::movement::Motion;

#[derive(Debug, Clone, PartialEq)]
pub struct Skin {
    pub texture: TextureHandle,
    pub scale: f32,
}

/// Normal skin plus an optional easter-egg skin.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinPair {
    pub normal: Skin,
    pub egg: Option<Skin>,
}

impl SkinPair {
    pub fn resolve(catalog: &AssetCatalog, spec: &SkinSpec) -> Result<Self, String> {
        let normal = Skin {
            texture: catalog.require(&spec.texture)?,
            scale: spec.scale,
        };
        let egg = spec
            .egg_texture
            .as_deref()
            .and_then(|name| catalog.optional(name))
            .map(|texture| Skin {
                texture,
                scale: spec.egg_scale,
            });
        Ok(Self { normal, egg })
    }

    /// `None` when the egg skin is unavailable: the swap is skipped entirely.
    pub fn for_mode(&self, mode: CosmeticMode) -> Option<&Skin> {
        match mode {
            CosmeticMode::Normal if self.egg.is_some() => Some(&self.normal),
            CosmeticMode::Egg => self.egg.as_ref(),
            CosmeticMode::Normal => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkinSet {
    pub player: SkinPair,
    pub target: SkinPair,
    pub background: SkinPair,
}

impl SkinSet {
    pub fn resolve(catalog: &AssetCatalog, skins: &SkinConfig) -> Result<Self, String> {
        Ok(Self {
            player: SkinPair::resolve(catalog, &skins.player)?,
            target: SkinPair::resolve(catalog, &skins.target)?,
            background: SkinPair::resolve(catalog, &skins.background)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub position: Vec2,
    pub scale: Vec2,
    pub texture: TextureHandle,
}

impl Sprite {
    pub fn new(skin: &Skin, position: Vec2) -> Self {
        Self {
            position,
            scale: Vec2::splat(skin.scale),
            texture: skin.texture.clone(),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.texture.size() * self.scale.abs()
    }

    pub fn is_mirrored(&self) -> bool {
        self.scale.x < 0.0
    }

    /// Swap texture and scale, keeping the current horizontal mirroring.
    pub fn apply_skin(&mut self, skin: &Skin) {
        let sign = if self.is_mirrored() { -1.0 } else { 1.0 };
        self.texture = skin.texture.clone();
        self.scale = Vec2::new(sign * skin.scale, skin.scale);
    }
}

impl Bounded for Sprite {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.size())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub sprite: Sprite,
    pub motion: Motion,
    pub skins: SkinPair,
}

impl Player {
    pub fn new(skins: SkinPair, viewport: Vec2, speed: f32) -> Self {
        Self {
            sprite: Sprite::new(&skins.normal, viewport * 0.5),
            motion: Motion::new(speed),
            skins,
        }
    }

    /// Advance one tick. Each axis moves only if the candidate coordinate lies
    /// strictly inside `(0, bound)`; otherwise that axis stays put, which can
    /// leave the player short of the edge.
    pub fn integrate(&mut self, viewport: Vec2) {
        let velocity = self.motion.velocity;
        let position = &mut self.sprite.position;

        let next_x = position.x + velocity.x;
        if next_x > 0.0 && next_x < viewport.x {
            position.x = next_x;
        }
        let next_y = position.y + velocity.y;
        if next_y > 0.0 && next_y < viewport.y {
            position.y = next_y;
        }

        self.sprite.scale.x = self.motion.facing.sign() * self.sprite.scale.x.abs();
    }

    pub fn apply_cosmetic(&mut self, mode: CosmeticMode) {
        if let Some(skin) = self.skins.for_mode(mode) {
            self.sprite.apply_skin(skin);
        }
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Aabb {
        self.sprite.bounds()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub sprite: Sprite,
    pub skins: SkinPair,
}

impl Target {
    pub fn new(skins: SkinPair) -> Self {
        Self {
            sprite: Sprite::new(&skins.normal, Vec2::ZERO),
            skins,
        }
    }

    /// Move to a whole-pixel point drawn uniformly from `[0, w) x [0, h)`.
    pub fn relocate<R: Rng + ?Sized>(&mut self, rng: &mut R, viewport: Vec2) {
        let x = (rng.gen::<f32>() * viewport.x.max(0.0)).floor();
        let y = (rng.gen::<f32>() * viewport.y.max(0.0)).floor();
        self.sprite.position = Vec2::new(x, y);
        log::debug!("Target relocated to ({}, {})", x, y);
    }

    pub fn apply_cosmetic(&mut self, mode: CosmeticMode) {
        if let Some(skin) = self.skins.for_mode(mode) {
            self.sprite.apply_skin(skin);
        }
    }
}

impl Bounded for Target {
    fn bounds(&self) -> Aabb {
        self.sprite.bounds()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub sprite: Sprite,
    pub skins: SkinPair,
}

impl Background {
    pub fn new(skins: SkinPair, viewport: Vec2) -> Self {
        let mut background = Self {
            sprite: Sprite::new(&skins.normal, Vec2::ZERO),
            skins,
        };
        background.fit(viewport);
        background
    }

    /// Stretch over the whole viewport and stay centred on it.
    pub fn fit(&mut self, viewport: Vec2) {
        let texture = self.sprite.texture.size().max(Vec2::ONE);
        self.sprite.scale = viewport / texture;
        self.sprite.position = viewport * 0.5;
    }

    /// Only the texture changes; scale is recomputed by `fit`.
    pub fn apply_cosmetic(&mut self, mode: CosmeticMode) {
        if let Some(skin) = self.skins.for_mode(mode) {
            self.sprite.texture = skin.texture.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SkinConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog(with_egg: bool) -> AssetCatalog {
        let mut catalog = AssetCatalog::new();
        catalog.insert("player", 100, 80);
        catalog.insert("target", 200, 200);
        catalog.insert("background", 1920, 1080);
        if with_egg {
            catalog.insert("player_egg", 300, 300);
            catalog.insert("target_egg", 60, 60);
            catalog.insert("background_egg", 1920, 1080);
        }
        catalog
    }

    fn skins(with_egg: bool) -> SkinSet {
        SkinSet::resolve(&catalog(with_egg), &SkinConfig::default()).expect("skins resolve")
    }

    fn player_at(x: f32, y: f32, vx: f32, vy: f32) -> Player {
        let mut player = Player::new(skins(true).player, Vec2::new(1000.0, 800.0), 5.0);
        player.sprite.position = Vec2::new(x, y);
        player.motion.velocity = Vec2::new(vx, vy);
        player
    }

    #[test]
    fn player_starts_centred_at_half_scale() {
        let player = Player::new(skins(true).player, Vec2::new(800.0, 600.0), 5.0);
        assert_eq!(player.sprite.position, Vec2::new(400.0, 300.0));
        assert_eq!(player.sprite.size(), Vec2::new(50.0, 40.0));
    }

    #[test]
    fn integrate_moves_inside_bounds() {
        let mut player = player_at(100.0, 100.0, 5.0, 0.0);
        player.integrate(Vec2::new(1000.0, 800.0));
        assert_eq!(player.sprite.position, Vec2::new(105.0, 100.0));
    }

    #[test]
    fn integrate_leaves_axis_unchanged_past_the_edge() {
        let mut player = player_at(998.0, 100.0, 5.0, 0.0);
        player.integrate(Vec2::new(1000.0, 800.0));
        assert_eq!(player.sprite.position, Vec2::new(998.0, 100.0));
    }

    #[test]
    fn integrate_axes_are_independent() {
        let mut player = player_at(3.0, 400.0, -5.0, 5.0);
        player.integrate(Vec2::new(1000.0, 800.0));
        assert_eq!(player.sprite.position, Vec2::new(3.0, 405.0));
    }

    #[test]
    fn integrate_rejects_exact_boundary() {
        let mut player = player_at(5.0, 795.0, -5.0, 5.0);
        player.integrate(Vec2::new(1000.0, 800.0));
        assert_eq!(player.sprite.position, Vec2::new(5.0, 795.0));
    }

    #[test]
    fn integrate_mirrors_sprite_with_facing() {
        let mut player = player_at(100.0, 100.0, -5.0, 0.0);
        player.motion.facing = crate::movement::Facing::Left;
        player.integrate(Vec2::new(1000.0, 800.0));
        assert!(player.sprite.is_mirrored());
        assert_eq!(player.sprite.size(), Vec2::new(50.0, 40.0));
    }

    #[test]
    fn cosmetic_swap_preserves_mirroring() {
        let mut player = player_at(100.0, 100.0, 0.0, 0.0);
        player.sprite.scale.x = -0.5;
        player.apply_cosmetic(CosmeticMode::Egg);
        assert_eq!(player.sprite.scale, Vec2::new(-0.25, 0.25));
        assert_eq!(&*player.sprite.texture.key, "player_egg");
        player.apply_cosmetic(CosmeticMode::Normal);
        assert_eq!(player.sprite.scale, Vec2::new(-0.5, 0.5));
        assert_eq!(&*player.sprite.texture.key, "player");
    }

    #[test]
    fn cosmetic_swap_without_egg_texture_is_no_op() {
        let mut target = Target::new(skins(false).target);
        let before = target.sprite.clone();
        target.apply_cosmetic(CosmeticMode::Egg);
        assert_eq!(target.sprite, before);
        target.apply_cosmetic(CosmeticMode::Normal);
        assert_eq!(target.sprite, before);
    }

    #[test]
    fn target_relocates_to_whole_pixels_inside_viewport() {
        let mut target = Target::new(skins(true).target);
        let mut rng = StdRng::seed_from_u64(7);
        let viewport = Vec2::new(640.0, 480.0);
        for _ in 0..200 {
            target.relocate(&mut rng, viewport);
            let p = target.sprite.position;
            assert!(p.x >= 0.0 && p.x < viewport.x);
            assert!(p.y >= 0.0 && p.y < viewport.y);
            assert_eq!(p.x, p.x.floor());
            assert_eq!(p.y, p.y.floor());
        }
    }

    #[test]
    fn target_relocation_in_empty_viewport_stays_at_origin() {
        let mut target = Target::new(skins(true).target);
        let mut rng = StdRng::seed_from_u64(1);
        target.relocate(&mut rng, Vec2::ZERO);
        assert_eq!(target.sprite.position, Vec2::ZERO);
    }

    #[test]
    fn background_fills_and_follows_viewport() {
        let mut background = Background::new(skins(true).background, Vec2::new(1920.0, 1080.0));
        assert_eq!(background.sprite.size(), Vec2::new(1920.0, 1080.0));
        background.fit(Vec2::new(960.0, 540.0));
        assert_eq!(background.sprite.size(), Vec2::new(960.0, 540.0));
        assert_eq!(background.sprite.position, Vec2::new(480.0, 270.0));
    }

    #[test]
    fn missing_required_texture_fails_resolution() {
        let mut catalog = AssetCatalog::new();
        catalog.insert("player", 10, 10);
        let err = SkinSet::resolve(&catalog, &SkinConfig::default()).expect_err("target missing");
        assert!(err.contains("'target'"));
    }
}
