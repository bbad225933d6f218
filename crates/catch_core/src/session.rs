//! One game session: the world, its key bindings and the per-tick loop.
//!
//! The host forwards key events (`key_down` / `key_up`) and calls `tick` once
//! per rendered frame with the current viewport size. Both run to completion
//! on the same thread, so key handlers always finish before the next tick
//! observes their effect.
//!
//! Each tick:
//!   1. integrate the player (per-axis, no-op past the viewport edge)
//!   2. stretch the background over the viewport
//!   3. test player against target
//!   4. on overlap: score, play the cue, update the score text, relocate the target
//!
//! There is no cooldown. If the relocated target still overlaps the player,
//! the next tick scores again.

use glam::Vec2;
use rand::Rng;

use crate::assets::AssetCatalog;
use crate::collision::overlaps;
use crate::config::GameConfig;
use crate::cosmetic::{self, CosmeticHost, CosmeticMode, CosmeticToggle};
use crate::entity::{Background, Player, SkinSet, Target};
use crate::host::{AudioBank, Collaborators, TextDisplay};
use crate::input::{handler, BindingId, InputDispatcher};
use crate::movement::{Motion, MovementController};

pub const TUTORIAL_TEXT: &str = "Catch the star!\nUse WASD or arrow keys to move";
pub const EGG_TUTORIAL_TEXT: &str = "Catch the jellyfish!\nUse WASD or arrow keys to move";

pub fn format_score(score: u64) -> String {
    format!("Score: {score}")
}

/// Everything key handlers and cosmetic subscribers are allowed to mutate.
pub struct World {
    pub player: Player,
    pub target: Target,
    pub background: Background,
    pub score: u64,
    pub audio: AudioBank,
    score_text: Box<dyn TextDisplay>,
    tutorial_text: Box<dyn TextDisplay>,
    cosmetic: CosmeticToggle<World>,
}

impl World {
    pub fn cosmetic_mode(&self) -> CosmeticMode {
        self.cosmetic.mode()
    }

    fn player_motion(world: &mut World) -> &mut Motion {
        &mut world.player.motion
    }
}

impl CosmeticHost for World {
    fn cosmetic(&mut self) -> &mut CosmeticToggle<Self> {
        &mut self.cosmetic
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub scored: bool,
    pub score: u64,
}

pub struct GameSession<R> {
    input: InputDispatcher<World>,
    world: World,
    rng: R,
    ticks: u64,
}

impl<R: Rng> GameSession<R> {
    /// Build the world from preloaded assets. Fails if a required texture is missing.
    pub fn new(
        config: &GameConfig,
        catalog: &AssetCatalog,
        collaborators: Collaborators,
        viewport: Vec2,
        mut rng: R,
    ) -> Result<Self, String> {
        let skins = SkinSet::resolve(catalog, &config.skins)?;
        let Collaborators {
            score_text,
            tutorial_text,
            audio,
        } = collaborators;

        let mut target = Target::new(skins.target);
        target.relocate(&mut rng, viewport);

        let mut world = World {
            player: Player::new(skins.player, viewport, config.movement.speed),
            target,
            background: Background::new(skins.background, viewport),
            score: 0,
            audio,
            score_text,
            tutorial_text,
            cosmetic: CosmeticToggle::new(),
        };
        subscribe_cosmetics(&mut world.cosmetic);

        world.score_text.set_value(&format_score(0));
        world.tutorial_text.set_value(TUTORIAL_TEXT);
        world.audio.start_music();

        let mut input = InputDispatcher::new();
        let movement = MovementController::new(
            World::player_motion,
            config.movement.speed,
            config.movement.sprint_speed,
        );
        for keys in &config.bindings.movement_sets {
            movement.register(&mut input, keys);
        }
        movement.bind_sprint(&mut input, &config.bindings.sprint);
        bind_cosmetic_toggle(&mut input, &config.bindings.cosmetic_toggle);

        log::info!(
            "Session ready: {} key bindings, viewport {}x{}",
            input.bound_count(),
            viewport.x,
            viewport.y
        );

        Ok(Self {
            input,
            world,
            rng,
            ticks: 0,
        })
    }

    pub fn key_down(&mut self, code: &str) {
        self.world.audio.resume_music();
        self.input.key_down(code, &mut self.world);
    }

    pub fn key_up(&mut self, code: &str) {
        self.input.key_up(code, &mut self.world);
    }

    /// Run one frame of gameplay against the viewport as it is right now.
    pub fn tick(&mut self, viewport: Vec2) -> TickReport {
        self.ticks += 1;
        let world = &mut self.world;

        world.player.integrate(viewport);
        world.background.fit(viewport);

        let scored = overlaps(&world.player, &world.target);
        if scored {
            world.score += 1;
            world.audio.play_score_cue(world.cosmetic.mode().is_egg());
            world.score_text.set_value(&format_score(world.score));
            world.target.relocate(&mut self.rng, viewport);
            log::info!("Score! total = {}", world.score);
        }

        TickReport {
            tick: self.ticks,
            scored,
            score: world.score,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn input(&self) -> &InputDispatcher<World> {
        &self.input
    }

    pub fn score(&self) -> u64 {
        self.world.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn cosmetic_mode(&self) -> CosmeticMode {
        self.world.cosmetic_mode()
    }

    /// Release every key binding. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.input.bound_count() > 0 {
            log::info!("Session shutdown after {} ticks, score {}", self.ticks, self.world.score);
        }
        self.input.unbind_all();
    }
}

fn subscribe_cosmetics(toggle: &mut CosmeticToggle<World>) {
    toggle.subscribe("player", |w: &mut World, mode| w.player.apply_cosmetic(mode));
    toggle.subscribe("target", |w: &mut World, mode| w.target.apply_cosmetic(mode));
    toggle.subscribe("background", |w: &mut World, mode| {
        w.background.apply_cosmetic(mode)
    });
    toggle.subscribe("music", |w: &mut World, mode| {
        w.audio.select_music(mode.is_egg())
    });
    toggle.subscribe("tutorial_text", |w: &mut World, mode| {
        let text = if mode.is_egg() {
            EGG_TUTORIAL_TEXT
        } else {
            TUTORIAL_TEXT
        };
        w.tutorial_text.set_value(text);
    });
}

fn bind_cosmetic_toggle(input: &mut InputDispatcher<World>, code: &str) -> BindingId {
    let id = input.bind(code);
    input.set_on_press(
        id,
        handler(|world: &mut World, _| {
            cosmetic::flip(world);
        }),
    );
    id
}
