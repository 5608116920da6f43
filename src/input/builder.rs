use super::keyboard::KeyboardButtons;
use super::types::InputPoller;
use crate::config::{InputBackend, InputConfig};
use crate::error::InputError;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Open the configured button backend.
///
/// `shutdown` is handed to backends that can request a stop themselves.
pub fn open_buttons(
    config: &InputConfig,
    shutdown: CancellationToken,
) -> Result<Box<dyn InputPoller>, InputError> {
    match config.backend {
        InputBackend::Evdev => open_evdev(&config.device),
        InputBackend::Keyboard => {
            info!("Using keyboard in place of HAT buttons");
            let keyboard = KeyboardButtons::new(shutdown);
            keyboard.start()?;
            Ok(Box::new(keyboard))
        }
    }
}

#[cfg(all(target_os = "linux", feature = "buttons"))]
fn open_evdev(device: &str) -> Result<Box<dyn InputPoller>, InputError> {
    let buttons = super::gpio_keys::EvdevButtons::open(device)?;
    Ok(Box::new(buttons))
}

#[cfg(not(all(target_os = "linux", feature = "buttons")))]
fn open_evdev(device: &str) -> Result<Box<dyn InputPoller>, InputError> {
    tracing::error!("Cannot open {}: evdev support not compiled in", device);
    Err(InputError::NotAvailable)
}
