//! Physical keys as W3C `KeyboardEvent.code` strings ("KeyW", "ArrowUp", "Space").

use winit::keyboard::{KeyCode, PhysicalKey};

/// winit names its key codes after the W3C codes, so the `Debug` name is the
/// code itself.
pub fn key_code_name(code: KeyCode) -> String {
    format!("{code:?}")
}

/// `None` for keys the platform could not identify.
pub fn physical_key_code(key: PhysicalKey) -> Option<String> {
    match key {
        PhysicalKey::Code(code) => Some(key_code_name(code)),
        PhysicalKey::Unidentified(native) => {
            log::debug!("Ignoring unidentified key {native:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn movement_keys_map_to_w3c_codes() {
        assert_eq!(key_code_name(KeyCode::KeyW), "KeyW");
        assert_eq!(key_code_name(KeyCode::KeyA), "KeyA");
        assert_eq!(key_code_name(KeyCode::ArrowUp), "ArrowUp");
        assert_eq!(key_code_name(KeyCode::ArrowRight), "ArrowRight");
        assert_eq!(key_code_name(KeyCode::Space), "Space");
        assert_eq!(key_code_name(KeyCode::ShiftLeft), "ShiftLeft");
    }

    #[test]
    fn unidentified_keys_are_dropped() {
        assert_eq!(
            physical_key_code(PhysicalKey::Code(KeyCode::KeyD)).as_deref(),
            Some("KeyD")
        );
        assert_eq!(
            physical_key_code(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)),
            None
        );
    }
}
