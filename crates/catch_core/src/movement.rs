//! Directional key sets mapped onto a velocity, with an optional sprint modifier.
//!
//! Several direction sets (WASD, arrows) can be registered on one controller;
//! they all write the same `Motion`, last writer wins. Releasing a direction
//! zeroes its axis only when the opposite key of the same set is up; if the
//! opposite key is still held, the axis takes that key's value instead.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::Deserialize;

use crate::input::{handler, BindingId, InputDispatcher, KeyHandler};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// Sign applied to horizontal sprite scale.
    pub fn sign(self) -> f32 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }
}

/// Velocity state driven by key handlers and integrated by the game loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub velocity: Vec2,
    /// Current speed scalar in pixels per tick. Changed by the sprint modifier.
    pub speed: f32,
    pub facing: Facing,
}

impl Motion {
    pub fn new(speed: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            speed,
            facing: Facing::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectionKeys {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

impl DirectionKeys {
    pub fn wasd() -> Self {
        Self {
            up: "KeyW".to_string(),
            down: "KeyS".to_string(),
            left: "KeyA".to_string(),
            right: "KeyD".to_string(),
        }
    }

    pub fn arrows() -> Self {
        Self {
            up: "ArrowUp".to_string(),
            down: "ArrowDown".to_string(),
            left: "ArrowLeft".to_string(),
            right: "ArrowRight".to_string(),
        }
    }

    pub fn codes(&self) -> [&str; 4] {
        [&self.up, &self.down, &self.left, &self.right]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionBindings {
    pub up: BindingId,
    pub down: BindingId,
    pub left: BindingId,
    pub right: BindingId,
}

impl DirectionBindings {
    pub fn ids(&self) -> [BindingId; 4] {
        [self.up, self.down, self.left, self.right]
    }
}

/// Selects the `Motion` a controller drives inside the session context.
pub type MotionAccess<C> = fn(&mut C) -> &mut Motion;

pub struct MovementController<C> {
    access: MotionAccess<C>,
    base_speed: f32,
    sprint_speed: f32,
    sets: Rc<RefCell<Vec<DirectionBindings>>>,
}

impl<C: 'static> MovementController<C> {
    pub fn new(access: MotionAccess<C>, base_speed: f32, sprint_speed: f32) -> Self {
        Self {
            access,
            base_speed,
            sprint_speed,
            sets: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn sprint_speed(&self) -> f32 {
        self.sprint_speed
    }

    pub fn registered_sets(&self) -> Vec<DirectionBindings> {
        self.sets.borrow().clone()
    }

    /// Bind one direction set and wire its press/release handlers.
    pub fn register(
        &self,
        input: &mut InputDispatcher<C>,
        keys: &DirectionKeys,
    ) -> DirectionBindings {
        let set = DirectionBindings {
            up: input.bind(&keys.up),
            down: input.bind(&keys.down),
            left: input.bind(&keys.left),
            right: input.bind(&keys.right),
        };
        let access = self.access;

        input.set_on_press(
            set.up,
            handler(move |ctx: &mut C, _| {
                let motion = access(ctx);
                motion.velocity.y = -motion.speed;
            }),
        );
        input.set_on_release(
            set.up,
            handler(move |ctx: &mut C, keys: &InputDispatcher<C>| {
                let motion = access(ctx);
                motion.velocity.y = if keys.is_up(set.down) { 0.0 } else { motion.speed };
            }),
        );

        input.set_on_press(
            set.down,
            handler(move |ctx: &mut C, _| {
                let motion = access(ctx);
                motion.velocity.y = motion.speed;
            }),
        );
        input.set_on_release(
            set.down,
            handler(move |ctx: &mut C, keys: &InputDispatcher<C>| {
                let motion = access(ctx);
                motion.velocity.y = if keys.is_up(set.up) { 0.0 } else { -motion.speed };
            }),
        );

        input.set_on_press(
            set.left,
            handler(move |ctx: &mut C, _| {
                let motion = access(ctx);
                motion.velocity.x = -motion.speed;
                motion.facing = Facing::Left;
            }),
        );
        input.set_on_release(
            set.left,
            handler(move |ctx: &mut C, keys: &InputDispatcher<C>| {
                let motion = access(ctx);
                motion.velocity.x = if keys.is_up(set.right) { 0.0 } else { motion.speed };
            }),
        );

        input.set_on_press(
            set.right,
            handler(move |ctx: &mut C, _| {
                let motion = access(ctx);
                motion.velocity.x = motion.speed;
                motion.facing = Facing::Right;
            }),
        );
        input.set_on_release(
            set.right,
            handler(move |ctx: &mut C, keys: &InputDispatcher<C>| {
                let motion = access(ctx);
                motion.velocity.x = if keys.is_up(set.left) { 0.0 } else { -motion.speed };
            }),
        );

        self.sets.borrow_mut().push(set);
        log::debug!("Registered movement keys {:?}", keys.codes());
        set
    }

    /// Bind sprint keys. The first key owns the handlers; every further key
    /// shares them, so left and right shift behave identically.
    pub fn bind_sprint(&self, input: &mut InputDispatcher<C>, codes: &[String]) -> Vec<BindingId> {
        let Some((first, rest)) = codes.split_first() else {
            return Vec::new();
        };

        let primary = input.bind(first);
        input.set_on_press(primary, Some(self.speed_handler(self.sprint_speed)));
        input.set_on_release(primary, Some(self.speed_handler(self.base_speed)));

        let mut ids = vec![primary];
        for code in rest {
            let id = input.bind(code);
            input.set_on_press(id, input.on_press(primary));
            input.set_on_release(id, input.on_release(primary));
            ids.push(id);
        }
        ids
    }

    fn speed_handler(&self, speed: f32) -> KeyHandler<C> {
        let access = self.access;
        let sets = Rc::clone(&self.sets);
        Rc::new(move |ctx: &mut C, keys: &InputDispatcher<C>| {
            let motion = access(ctx);
            motion.speed = speed;
            reapply_speed(motion, keys, &sets.borrow());
        })
    }
}

/// Rescale every axis that still has a direction key held so a speed change
/// takes effect without pressing the direction again.
fn reapply_speed<C>(motion: &mut Motion, keys: &InputDispatcher<C>, sets: &[DirectionBindings]) {
    let held = |pick: fn(&DirectionBindings) -> BindingId| {
        sets.iter().any(|set| keys.is_down(pick(set)))
    };
    let neg_x = held(|s| s.left);
    let pos_x = held(|s| s.right);
    let neg_y = held(|s| s.up);
    let pos_y = held(|s| s.down);

    if let Some(dir) = axis_direction(motion.velocity.x, neg_x, pos_x) {
        motion.velocity.x = dir * motion.speed;
    }
    if let Some(dir) = axis_direction(motion.velocity.y, neg_y, pos_y) {
        motion.velocity.y = dir * motion.speed;
    }
}

fn axis_direction(current: f32, neg_held: bool, pos_held: bool) -> Option<f32> {
    if !neg_held && !pos_held {
        return None;
    }
    if current != 0.0 {
        return Some(current.signum());
    }
    match (neg_held, pos_held) {
        (true, false) => Some(-1.0),
        (false, true) => Some(1.0),
        _ => None,
    }
}
