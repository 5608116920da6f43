use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical buttons on the LCD HAT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonId {
    /// KEY1, used as the shutter
    Key1,
    Up,
    Down,
    Left,
    Right,
    /// Joystick press
    Center,
    Key2,
    Key3,
}

impl ButtonId {
    pub const ALL: [ButtonId; 8] = [
        ButtonId::Key1,
        ButtonId::Up,
        ButtonId::Down,
        ButtonId::Left,
        ButtonId::Right,
        ButtonId::Center,
        ButtonId::Key2,
        ButtonId::Key3,
    ];

    /// Buttons that are only logged
    pub const NON_SHUTTER: [ButtonId; 7] = [
        ButtonId::Up,
        ButtonId::Down,
        ButtonId::Left,
        ButtonId::Right,
        ButtonId::Center,
        ButtonId::Key2,
        ButtonId::Key3,
    ];

    pub const SHUTTER: ButtonId = ButtonId::Key1;

    /// Position in [`ButtonId::ALL`]
    pub fn index(&self) -> usize {
        match self {
            ButtonId::Key1 => 0,
            ButtonId::Up => 1,
            ButtonId::Down => 2,
            ButtonId::Left => 3,
            ButtonId::Right => 4,
            ButtonId::Center => 5,
            ButtonId::Key2 => 6,
            ButtonId::Key3 => 7,
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ButtonId::Key1 => "KEY1",
            ButtonId::Up => "Up",
            ButtonId::Down => "Down",
            ButtonId::Left => "Left",
            ButtonId::Right => "Right",
            ButtonId::Center => "Center",
            ButtonId::Key2 => "KEY2",
            ButtonId::Key3 => "KEY3",
        };
        f.write_str(name)
    }
}

/// One level sample of one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: ButtonId,
    pub pressed: bool,
}

/// Non-blocking button state.
///
/// Every call is an independent level read: there is no debounce and no edge
/// detection, and several buttons may read pressed at once.
pub trait InputPoller: Send {
    fn is_pressed(&mut self, button: ButtonId) -> bool;

    fn sample(&mut self, button: ButtonId) -> ButtonEvent {
        ButtonEvent {
            button,
            pressed: self.is_pressed(button),
        }
    }
}

impl<T: InputPoller + ?Sized> InputPoller for Box<T> {
    fn is_pressed(&mut self, button: ButtonId) -> bool {
        (**self).is_pressed(button)
    }
}
