/// Keys the demo loop cares about; everything else maps to [`Key::Unknown`]
///
/// WASD aliases the arrow keys
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    Space,
    Unknown,
}

/// Normalized input record polled from the OS event queue once per frame
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event {
    Quit,
    MouseMotion { x: f32, y: f32 },
    /// Emitted on button release, at the last known cursor position
    MouseClick { x: f32, y: f32 },
    KeyPressed(Key),
    KeyReleased(Key),
}

#[cfg(feature = "windowing")]
impl Key {
    pub(crate) fn from_key_code(code: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode;

        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => Key::Up,
            KeyCode::KeyS | KeyCode::ArrowDown => Key::Down,
            KeyCode::KeyA | KeyCode::ArrowLeft => Key::Left,
            KeyCode::KeyD | KeyCode::ArrowRight => Key::Right,
            KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
            KeyCode::Escape => Key::Escape,
            KeyCode::Space => Key::Space,
            _ => Key::Unknown,
        }
    }
}

#[cfg(all(test, feature = "windowing"))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use winit::keyboard::KeyCode;

    #[test]
    fn wasd_aliases_arrows() {
        assert_eq!(Key::from_key_code(KeyCode::KeyW), Key::Up);
        assert_eq!(Key::from_key_code(KeyCode::ArrowUp), Key::Up);
        assert_eq!(Key::from_key_code(KeyCode::KeyS), Key::Down);
        assert_eq!(Key::from_key_code(KeyCode::ArrowDown), Key::Down);
        assert_eq!(Key::from_key_code(KeyCode::KeyA), Key::Left);
        assert_eq!(Key::from_key_code(KeyCode::ArrowLeft), Key::Left);
        assert_eq!(Key::from_key_code(KeyCode::KeyD), Key::Right);
        assert_eq!(Key::from_key_code(KeyCode::ArrowRight), Key::Right);
    }

    #[test]
    fn both_enter_keys_normalize() {
        assert_eq!(Key::from_key_code(KeyCode::Enter), Key::Enter);
        assert_eq!(Key::from_key_code(KeyCode::NumpadEnter), Key::Enter);
    }

    #[test]
    fn unmapped_keys_are_unknown() {
        assert_eq!(Key::from_key_code(KeyCode::KeyQ), Key::Unknown);
        assert_eq!(Key::from_key_code(KeyCode::F1), Key::Unknown);
    }
}
