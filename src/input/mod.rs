pub mod builder;
#[cfg(all(target_os = "linux", feature = "buttons"))]
pub mod gpio_keys;
pub mod keyboard;
pub mod mock;
pub mod types;

#[cfg(test)]
mod tests;

pub use builder::open_buttons;
#[cfg(all(target_os = "linux", feature = "buttons"))]
pub use gpio_keys::EvdevButtons;
pub use keyboard::KeyboardButtons;
pub use mock::ScriptedButtons;
pub use types::{ButtonEvent, ButtonId, InputPoller};
