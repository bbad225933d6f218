//! Easter-egg cosmetic mode: one shared flag plus named subscribers.
//!
//! Flipping the mode invokes every subscriber synchronously with the new
//! value, in registration order, inside a single call. Nothing else runs in
//! between, so no observer can see a half-applied mode.

use std::rc::Rc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CosmeticMode {
    #[default]
    Normal,
    Egg,
}

impl CosmeticMode {
    pub fn is_egg(self) -> bool {
        self == Self::Egg
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Normal => Self::Egg,
            Self::Egg => Self::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Egg => "egg",
        }
    }
}

pub type ApplyCosmetic<C> = Rc<dyn Fn(&mut C, CosmeticMode)>;

pub struct CosmeticToggle<C> {
    mode: CosmeticMode,
    subscribers: Vec<(String, ApplyCosmetic<C>)>,
}

/// Gives `flip` access to the toggle stored inside the context it mutates.
pub trait CosmeticHost: Sized {
    fn cosmetic(&mut self) -> &mut CosmeticToggle<Self>;
}

impl<C> CosmeticToggle<C> {
    pub fn new() -> Self {
        Self {
            mode: CosmeticMode::Normal,
            subscribers: Vec::new(),
        }
    }

    pub fn mode(&self) -> CosmeticMode {
        self.mode
    }

    /// Register a subscriber. A second registration under the same name
    /// replaces the first.
    pub fn subscribe(&mut self, name: &str, apply: impl Fn(&mut C, CosmeticMode) + 'static) {
        let apply: ApplyCosmetic<C> = Rc::new(apply);
        match self.subscribers.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = apply,
            None => self.subscribers.push((name.to_string(), apply)),
        }
    }

    pub fn unsubscribe(&mut self, name: &str) {
        self.subscribers.retain(|(n, _)| n != name);
    }

    pub fn subscriber_names(&self) -> Vec<&str> {
        self.subscribers.iter().map(|(n, _)| n.as_str()).collect()
    }
}

impl<C> Default for CosmeticToggle<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Flip the mode held by `ctx` and notify every subscriber. Returns the new mode.
pub fn flip<C: CosmeticHost>(ctx: &mut C) -> CosmeticMode {
    let toggle = ctx.cosmetic();
    toggle.mode = toggle.mode.flipped();
    let mode = toggle.mode;
    let subscribers: Vec<ApplyCosmetic<C>> =
        toggle.subscribers.iter().map(|(_, f)| Rc::clone(f)).collect();

    for apply in subscribers {
        apply(ctx, mode);
    }
    log::info!("Cosmetic mode: {}", mode.label());
    mode
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        toggle: CosmeticToggle<Ctx>,
        skin: &'static str,
        scale: f32,
        seen: Vec<(&'static str, CosmeticMode)>,
    }

    impl CosmeticHost for Ctx {
        fn cosmetic(&mut self) -> &mut CosmeticToggle<Self> {
            &mut self.toggle
        }
    }

    fn ctx() -> Ctx {
        let mut toggle = CosmeticToggle::new();
        toggle.subscribe("skin", |c: &mut Ctx, mode| {
            c.skin = if mode.is_egg() { "jellyfish" } else { "star" };
            c.seen.push(("skin", mode));
        });
        toggle.subscribe("scale", |c: &mut Ctx, mode| {
            c.scale = if mode.is_egg() { 0.5 } else { 0.15 };
            c.seen.push(("scale", mode));
        });
        Ctx {
            toggle,
            skin: "star",
            scale: 0.15,
            seen: Vec::new(),
        }
    }

    #[test]
    fn flip_notifies_all_subscribers_in_order() {
        let mut c = ctx();
        assert_eq!(flip(&mut c), CosmeticMode::Egg);
        assert_eq!(
            c.seen,
            vec![("skin", CosmeticMode::Egg), ("scale", CosmeticMode::Egg)]
        );
        assert_eq!(c.skin, "jellyfish");
        assert_eq!(c.scale, 0.5);
    }

    #[test]
    fn flipping_twice_restores_starting_state() {
        let mut c = ctx();
        flip(&mut c);
        assert_eq!(flip(&mut c), CosmeticMode::Normal);
        assert_eq!(c.toggle.mode(), CosmeticMode::Normal);
        assert_eq!(c.skin, "star");
        assert_eq!(c.scale, 0.15);
    }

    #[test]
    fn subscribe_with_same_name_replaces() {
        let mut c = ctx();
        c.toggle.subscribe("skin", |c: &mut Ctx, _| c.skin = "replaced");
        assert_eq!(c.toggle.subscriber_names(), vec!["skin", "scale"]);
        flip(&mut c);
        assert_eq!(c.skin, "replaced");
    }

    #[test]
    fn unsubscribed_observer_is_not_called() {
        let mut c = ctx();
        c.toggle.unsubscribe("scale");
        flip(&mut c);
        assert_eq!(c.scale, 0.15);
        assert_eq!(c.seen.len(), 1);
    }
}
