//! Window input to scene intents
//!
//! | Input          | Intent                          |
//! |----------------|---------------------------------|
//! | V              | toggle split screen             |
//! | C / Shift+C    | cycle main-or-left / right camera |
//! | F              | toggle launch                   |
//! | P              | toggle pause                    |
//! | R              | reset rocket                    |
//! | W A S D E Q    | move forward/left/back/right/up/down |
//! | Shift / Ctrl   | fast / slow movement            |
//! | Right mouse    | toggle mouse look               |
//! | Esc            | exit                            |

use launch_scene::{Intent, MoveDirection, SpeedKey};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, ModifiersState};

fn movement(code: KeyCode) -> Option<MoveDirection> {
    match code {
        KeyCode::KeyW => Some(MoveDirection::Forward),
        KeyCode::KeyS => Some(MoveDirection::Backward),
        KeyCode::KeyA => Some(MoveDirection::Left),
        KeyCode::KeyD => Some(MoveDirection::Right),
        KeyCode::KeyE => Some(MoveDirection::Up),
        KeyCode::KeyQ => Some(MoveDirection::Down),
        _ => None,
    }
}

/// Map a physical key event. Auto-repeat never re-fires toggles.
pub fn map_key(
    code: KeyCode,
    state: ElementState,
    repeat: bool,
    modifiers: ModifiersState,
) -> Option<Intent> {
    let pressed = state == ElementState::Pressed;

    if let Some(direction) = movement(code) {
        return Some(Intent::Move { direction, active: pressed });
    }

    match code {
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Intent::SpeedKey {
            key: SpeedKey::Shift,
            held: pressed,
        }),
        KeyCode::ControlLeft | KeyCode::ControlRight => Some(Intent::SpeedKey {
            key: SpeedKey::Ctrl,
            held: pressed,
        }),
        _ if !pressed || repeat => None,
        KeyCode::KeyV => Some(Intent::ToggleSplitScreen),
        KeyCode::KeyC => Some(Intent::CycleCamera {
            alternate: modifiers.shift_key(),
        }),
        KeyCode::KeyF => Some(Intent::TogglePlay),
        KeyCode::KeyP => Some(Intent::TogglePause),
        KeyCode::KeyR => Some(Intent::Reset),
        KeyCode::Escape => Some(Intent::Exit),
        _ => None,
    }
}

pub fn map_mouse_button(button: MouseButton, state: ElementState) -> Option<Intent> {
    match (button, state) {
        (MouseButton::Right, ElementState::Pressed) => Some(Intent::ToggleMouseLook),
        _ => None,
    }
}

pub fn map_cursor(x: f64, y: f64) -> Intent {
    Intent::CursorMoved {
        x: x as f32,
        y: y as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: ModifiersState = ModifiersState::empty();

    fn press(code: KeyCode) -> Option<Intent> {
        map_key(code, ElementState::Pressed, false, NONE)
    }

    #[test]
    fn test_toggles() {
        assert_eq!(press(KeyCode::KeyV), Some(Intent::ToggleSplitScreen));
        assert_eq!(press(KeyCode::KeyF), Some(Intent::TogglePlay));
        assert_eq!(press(KeyCode::KeyP), Some(Intent::TogglePause));
        assert_eq!(press(KeyCode::KeyR), Some(Intent::Reset));
        assert_eq!(press(KeyCode::Escape), Some(Intent::Exit));
        assert_eq!(press(KeyCode::KeyZ), None);
    }

    #[test]
    fn test_toggles_ignore_release_and_repeat() {
        assert_eq!(map_key(KeyCode::KeyF, ElementState::Released, false, NONE), None);
        assert_eq!(map_key(KeyCode::KeyF, ElementState::Pressed, true, NONE), None);
    }

    #[test]
    fn test_camera_cycle_with_shift() {
        assert_eq!(press(KeyCode::KeyC), Some(Intent::CycleCamera { alternate: false }));
        assert_eq!(
            map_key(KeyCode::KeyC, ElementState::Pressed, false, ModifiersState::SHIFT),
            Some(Intent::CycleCamera { alternate: true })
        );
    }

    #[test]
    fn test_movement_press_and_release() {
        assert_eq!(
            press(KeyCode::KeyE),
            Some(Intent::Move { direction: MoveDirection::Up, active: true })
        );
        assert_eq!(
            map_key(KeyCode::KeyA, ElementState::Released, false, NONE),
            Some(Intent::Move { direction: MoveDirection::Left, active: false })
        );
        // Held keys keep reporting while repeating
        assert_eq!(
            map_key(KeyCode::KeyW, ElementState::Pressed, true, NONE),
            Some(Intent::Move { direction: MoveDirection::Forward, active: true })
        );
    }

    #[test]
    fn test_speed_modifiers() {
        assert_eq!(
            press(KeyCode::ShiftLeft),
            Some(Intent::SpeedKey { key: SpeedKey::Shift, held: true })
        );
        assert_eq!(
            press(KeyCode::ControlRight),
            Some(Intent::SpeedKey { key: SpeedKey::Ctrl, held: true })
        );
        assert_eq!(
            map_key(KeyCode::ShiftRight, ElementState::Released, false, NONE),
            Some(Intent::SpeedKey { key: SpeedKey::Shift, held: false })
        );
    }

    #[test]
    fn test_mouse() {
        assert_eq!(
            map_mouse_button(MouseButton::Right, ElementState::Pressed),
            Some(Intent::ToggleMouseLook)
        );
        assert_eq!(map_mouse_button(MouseButton::Right, ElementState::Released), None);
        assert_eq!(map_mouse_button(MouseButton::Left, ElementState::Pressed), None);
        assert_eq!(map_cursor(12.5, 3.0), Intent::CursorMoved { x: 12.5, y: 3.0 });
    }
}
