use super::types::{ButtonId, InputPoller};
use crate::error::InputError;
use evdev::{Device, EventType, Key};
use tracing::{debug, info, warn};

/// Key codes the `gpio-keys` overlay assigns to the HAT buttons
pub(crate) fn key_for(button: ButtonId) -> Key {
    match button {
        ButtonId::Key1 => Key::KEY_1,
        ButtonId::Up => Key::KEY_UP,
        ButtonId::Down => Key::KEY_DOWN,
        ButtonId::Left => Key::KEY_LEFT,
        ButtonId::Right => Key::KEY_RIGHT,
        ButtonId::Center => Key::KEY_ENTER,
        ButtonId::Key2 => Key::KEY_2,
        ButtonId::Key3 => Key::KEY_3,
    }
}

/// HAT buttons read through the kernel key-state bitmap of a gpio-keys device
pub struct EvdevButtons {
    device_path: String,
    device: Device,
}

impl EvdevButtons {
    pub fn open(device_path: &str) -> Result<Self, InputError> {
        let device = Device::open(device_path).map_err(|e| InputError::DeviceOpen {
            device: device_path.to_string(),
            details: e.to_string(),
        })?;

        info!(
            "Button device opened: {} ({})",
            device_path,
            device.name().unwrap_or("Unknown")
        );

        Self::validate_device(&device, device_path)?;

        Ok(Self {
            device_path: device_path.to_string(),
            device,
        })
    }

    /// Validate that the device reports the keys we poll
    pub(crate) fn validate_device(device: &Device, device_path: &str) -> Result<(), InputError> {
        if !device.supported_events().contains(EventType::KEY) {
            return Err(InputError::UnsupportedDevice(device_path.to_string()));
        }

        if let Some(keys) = device.supported_keys() {
            for button in ButtonId::ALL {
                if !keys.contains(key_for(button)) {
                    warn!(
                        "Device {} does not report {:?}; {} will never read pressed",
                        device_path,
                        key_for(button),
                        button
                    );
                }
            }
        }

        debug!("Device {} supports key events", device_path);
        Ok(())
    }
}

impl InputPoller for EvdevButtons {
    fn is_pressed(&mut self, button: ButtonId) -> bool {
        match self.device.get_key_state() {
            Ok(state) => state.contains(key_for(button)),
            Err(e) => {
                warn!("Failed to read key state from {}: {}", self.device_path, e);
                false
            }
        }
    }
}
