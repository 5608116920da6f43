use crate::camera::CameraDevice;
use crate::display::DisplaySurface;
use crate::input::InputPoller;

/// Why the frame loop stopped without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT, SIGTERM or the keyboard quit key
    Interrupted,
}

impl ShutdownReason {
    pub fn exit_code(&self) -> i32 {
        match self {
            ShutdownReason::Interrupted => 0,
        }
    }
}

/// Session over whichever hardware backends were selected at startup
pub type HardwareSession =
    super::Session<Box<dyn CameraDevice>, Box<dyn DisplaySurface>, Box<dyn InputPoller>>;
