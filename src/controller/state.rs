use crate::camera::CaptureMode;
use std::fmt;

/// Where the mode controller is in the preview/still cycle.
///
/// Only `Previewing` is observable between loop iterations; the other states
/// exist while a shutter transition is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Previewing,
    TransitioningToStill,
    Stilling,
    TransitioningToPreview,
}

impl ControllerState {
    /// Capture mode the camera is (or is being) configured for
    pub fn capture_mode(&self) -> CaptureMode {
        match self {
            ControllerState::Previewing | ControllerState::TransitioningToPreview => {
                CaptureMode::Preview
            }
            ControllerState::TransitioningToStill | ControllerState::Stilling => CaptureMode::Still,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        !matches!(self, ControllerState::Previewing)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerState::Previewing => "previewing",
            ControllerState::TransitioningToStill => "transitioning to still",
            ControllerState::Stilling => "stilling",
            ControllerState::TransitioningToPreview => "transitioning to preview",
        };
        f.write_str(name)
    }
}

/// Individual camera step inside a transition, carried by transition errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStage {
    StopPreview,
    ConfigureStill,
    StartStill,
    CaptureStill,
    StopStill,
    ConfigurePreview,
    StartPreview,
}

impl fmt::Display for TransitionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransitionStage::StopPreview => "stopping preview",
            TransitionStage::ConfigureStill => "configuring still mode",
            TransitionStage::StartStill => "starting still mode",
            TransitionStage::CaptureStill => "capturing still",
            TransitionStage::StopStill => "stopping still mode",
            TransitionStage::ConfigurePreview => "configuring preview mode",
            TransitionStage::StartPreview => "starting preview",
        };
        f.write_str(name)
    }
}
