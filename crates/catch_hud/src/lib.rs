pub mod overlay;
pub mod text;

pub use overlay::{DebugStats, HudOverlay};
pub use text::TextSlot;
