pub mod assets;
pub mod collision;
pub mod config;
pub mod cosmetic;
pub mod entity;
pub mod host;
pub mod input;
pub mod movement;
pub mod replay;
pub mod session;
pub mod time;

pub use assets::{AssetCatalog, TextureHandle};
pub use collision::{overlaps, Aabb, Bounded};
pub use config::GameConfig;
pub use cosmetic::{CosmeticMode, CosmeticToggle};
pub use host::{AudioBank, AudioTrack, Collaborators, NullText, TextDisplay};
pub use input::{BindingId, InputDispatcher, KeyHandler};
pub use movement::{Facing, Motion, MovementController};
pub use session::{GameSession, TickReport, World};
pub use time::FrameClock;
