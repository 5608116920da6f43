use crate::config::CameraConfig;
use crate::error::CameraError;
use crate::frame::Frame;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Camera configuration profiles. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureMode {
    /// Low resolution live feed sized for the panel
    Preview,
    /// Full sensor resolution single shot
    Still,
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureMode::Preview => write!(f, "preview"),
            CaptureMode::Still => write!(f, "still"),
        }
    }
}

/// Resolution and exposure that belong to one capture mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeProfile {
    pub mode: CaptureMode,
    pub resolution: (u32, u32),
    pub exposure_us: u32,
}

/// The preview and still profiles a session switches between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeProfiles {
    preview: ModeProfile,
    still: ModeProfile,
}

impl ModeProfiles {
    pub fn new(preview: (u32, u32), preview_exposure_us: u32, still: (u32, u32), still_exposure_us: u32) -> Self {
        Self {
            preview: ModeProfile {
                mode: CaptureMode::Preview,
                resolution: preview,
                exposure_us: preview_exposure_us,
            },
            still: ModeProfile {
                mode: CaptureMode::Still,
                resolution: still,
                exposure_us: still_exposure_us,
            },
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            config.preview_resolution,
            config.preview_exposure_us,
            config.still_resolution,
            config.still_exposure_us,
        )
    }

    pub fn get(&self, mode: CaptureMode) -> ModeProfile {
        match mode {
            CaptureMode::Preview => self.preview,
            CaptureMode::Still => self.still,
        }
    }
}

impl Default for ModeProfiles {
    fn default() -> Self {
        Self::new((128, 128), 45_000, (2592, 1944), 25_000)
    }
}

/// Physical capture device.
///
/// The device must be stopped before `configure`; starting a running device or
/// stopping a stopped one is rejected with [`CameraError::InvalidState`].
#[async_trait]
pub trait CameraDevice: Send {
    /// Apply the resolution and pixel format of `profile`. Device must be stopped.
    async fn configure(&mut self, profile: ModeProfile) -> Result<(), CameraError>;

    async fn start(&mut self) -> Result<(), CameraError>;

    async fn stop(&mut self) -> Result<(), CameraError>;

    /// Takes effect on the next capture; valid whether running or stopped.
    async fn set_exposure(&mut self, exposure_us: u32) -> Result<(), CameraError>;

    /// Block until one preview frame is available.
    async fn capture_frame(&mut self) -> Result<Frame, CameraError>;

    /// Take one still and write it to `path`.
    async fn capture_to_file(&mut self, path: &Path) -> Result<(), CameraError>;

    /// Release the device. Safe to call in any state.
    async fn close(&mut self) -> Result<(), CameraError>;

    fn is_running(&self) -> bool;

    /// Mode applied by the last successful `configure`
    fn configured_mode(&self) -> Option<CaptureMode>;
}

#[async_trait]
impl<T: CameraDevice + ?Sized> CameraDevice for Box<T> {
    async fn configure(&mut self, profile: ModeProfile) -> Result<(), CameraError> {
        (**self).configure(profile).await
    }

    async fn start(&mut self) -> Result<(), CameraError> {
        (**self).start().await
    }

    async fn stop(&mut self) -> Result<(), CameraError> {
        (**self).stop().await
    }

    async fn set_exposure(&mut self, exposure_us: u32) -> Result<(), CameraError> {
        (**self).set_exposure(exposure_us).await
    }

    async fn capture_frame(&mut self) -> Result<Frame, CameraError> {
        (**self).capture_frame().await
    }

    async fn capture_to_file(&mut self, path: &Path) -> Result<(), CameraError> {
        (**self).capture_to_file(path).await
    }

    async fn close(&mut self) -> Result<(), CameraError> {
        (**self).close().await
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    fn configured_mode(&self) -> Option<CaptureMode> {
        (**self).configured_mode()
    }
}
