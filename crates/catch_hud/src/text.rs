use std::cell::RefCell;
use std::rc::Rc;

use catch_core::TextDisplay;

/// Shared string written by the session and read by the overlay each frame.
#[derive(Clone, Default)]
pub struct TextSlot(Rc<RefCell<String>>);

impl TextSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> String {
        self.0.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl TextDisplay for TextSlot {
    fn set_value(&mut self, value: &str) {
        let mut text = self.0.borrow_mut();
        text.clear();
        text.push_str(value);
    }
}
