//! Keyboard binding dispatch with edge-triggered press/release handlers.
//!
//! The session owns one `InputDispatcher` and forwards every window-level
//! key event to it. Each `bind(code)` creates an independent binding with its
//! own `Up`/`Down` state; several bindings may share a key code and all of them
//! fire. Handlers are attached after binding and can be replaced or shared
//! between bindings at any time.
//!
//! - **Edge-triggered:** `on_press` fires only on the `Up -> Down` transition.
//!   OS key-repeat delivers extra key-down events while the key is held; those
//!   are ignored. `on_release` fires only on `Down -> Up`.
//!
//! - **Handler view:** handlers receive the session context mutably and the
//!   dispatcher immutably, so they can query other bindings (`is_up`) but cannot
//!   bind or unbind while an event is being dispatched. A handler observes its
//!   own binding in the state it had before the event.

use std::fmt;
use std::rc::Rc;

/// Press/release callback. `C` is the session context the handler mutates.
pub type KeyHandler<C> = Rc<dyn Fn(&mut C, &InputDispatcher<C>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Up,
    Down,
}

struct Binding<C> {
    code: String,
    phase: KeyPhase,
    on_press: Option<KeyHandler<C>>,
    on_release: Option<KeyHandler<C>>,
}

pub struct InputDispatcher<C> {
    bindings: Vec<Option<Binding<C>>>,
}

impl<C> InputDispatcher<C> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Register a binding for a W3C key code such as `"KeyW"` or `"ArrowUp"`.
    pub fn bind(&mut self, code: &str) -> BindingId {
        let id = BindingId(self.bindings.len());
        self.bindings.push(Some(Binding {
            code: code.to_string(),
            phase: KeyPhase::Up,
            on_press: None,
            on_release: None,
        }));
        log::trace!("Bound key '{}' as {:?}", code, id);
        id
    }

    /// Remove a binding. Safe to call any number of times.
    pub fn unbind(&mut self, id: BindingId) {
        if let Some(slot) = self.bindings.get_mut(id.0) {
            if let Some(binding) = slot.take() {
                log::trace!("Unbound key '{}' ({:?})", binding.code, id);
            }
        }
    }

    pub fn unbind_all(&mut self) {
        for index in 0..self.bindings.len() {
            self.unbind(BindingId(index));
        }
    }

    pub fn is_bound(&self, id: BindingId) -> bool {
        self.binding(id).is_some()
    }

    pub fn bound_count(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_some()).count()
    }

    pub fn set_on_press(&mut self, id: BindingId, handler: Option<KeyHandler<C>>) {
        match self.binding_mut(id) {
            Some(binding) => binding.on_press = handler,
            None => log::warn!("Ignoring press handler for unbound {:?}", id),
        }
    }

    pub fn set_on_release(&mut self, id: BindingId, handler: Option<KeyHandler<C>>) {
        match self.binding_mut(id) {
            Some(binding) => binding.on_release = handler,
            None => log::warn!("Ignoring release handler for unbound {:?}", id),
        }
    }

    pub fn on_press(&self, id: BindingId) -> Option<KeyHandler<C>> {
        self.binding(id).and_then(|b| b.on_press.clone())
    }

    pub fn on_release(&self, id: BindingId) -> Option<KeyHandler<C>> {
        self.binding(id).and_then(|b| b.on_release.clone())
    }

    /// Unbound handles report `Up`.
    pub fn phase(&self, id: BindingId) -> KeyPhase {
        self.binding(id).map_or(KeyPhase::Up, |b| b.phase)
    }

    pub fn is_down(&self, id: BindingId) -> bool {
        self.phase(id) == KeyPhase::Down
    }

    pub fn is_up(&self, id: BindingId) -> bool {
        self.phase(id) == KeyPhase::Up
    }

    /// Dispatch a key-down event. Returns how many press handlers ran.
    pub fn key_down(&mut self, code: &str, ctx: &mut C) -> usize {
        self.dispatch(code, KeyPhase::Down, ctx)
    }

    /// Dispatch a key-up event. Returns how many release handlers ran.
    pub fn key_up(&mut self, code: &str, ctx: &mut C) -> usize {
        self.dispatch(code, KeyPhase::Up, ctx)
    }

    fn dispatch(&mut self, code: &str, next: KeyPhase, ctx: &mut C) -> usize {
        let mut fired = 0;
        for index in 0..self.bindings.len() {
            let handler = match &self.bindings[index] {
                Some(binding) if binding.code == code && binding.phase != next => match next {
                    KeyPhase::Down => binding.on_press.clone(),
                    KeyPhase::Up => binding.on_release.clone(),
                },
                _ => continue,
            };

            if let Some(handler) = handler {
                handler(ctx, self);
                fired += 1;
            }
            if let Some(binding) = self.bindings[index].as_mut() {
                binding.phase = next;
            }
        }
        fired
    }

    fn binding(&self, id: BindingId) -> Option<&Binding<C>> {
        self.bindings.get(id.0).and_then(Option::as_ref)
    }

    fn binding_mut(&mut self, id: BindingId) -> Option<&mut Binding<C>> {
        self.bindings.get_mut(id.0).and_then(Option::as_mut)
    }
}

impl<C> Default for InputDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for InputDispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<(&str, KeyPhase)> = self
            .bindings
            .iter()
            .flatten()
            .map(|b| (b.code.as_str(), b.phase))
            .collect();
        f.debug_struct("InputDispatcher")
            .field("bindings", &codes)
            .finish()
    }
}

/// Wrap a closure as a shareable handler.
pub fn handler<C, F>(f: F) -> Option<KeyHandler<C>>
where
    F: Fn(&mut C, &InputDispatcher<C>) + 'static,
{
    Some(Rc::new(f))
}
