use winit::keyboard::KeyCode;

use crate::tour::ControlCommand;

/// Keyboard shortcut for a control button, if the key has one
pub fn command_for_key(key: KeyCode) -> Option<ControlCommand> {
    let button = match key {
        KeyCode::Digit1 | KeyCode::Numpad1 => 1,
        KeyCode::Digit2 | KeyCode::Numpad2 => 2,
        KeyCode::Digit3 | KeyCode::Numpad3 => 3,
        KeyCode::Digit4 | KeyCode::Numpad4 => 4,
        KeyCode::Digit5 | KeyCode::Numpad5 => 5,
        KeyCode::Digit6 | KeyCode::Numpad6 => 6,
        KeyCode::Digit7 | KeyCode::Numpad7 => 7,
        KeyCode::Digit8 | KeyCode::Numpad8 => 8,
        KeyCode::Digit9 | KeyCode::Numpad9 => 9,
        KeyCode::Backspace | KeyCode::KeyB => return Some(ControlCommand::Back),
        _ => return None,
    };
    Some(ControlCommand::Select { button })
}
