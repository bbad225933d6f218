pub mod keys;
pub mod window;

pub use keys::{key_code_name, physical_key_code};
pub use window::{create_window, PlatformConfig};
