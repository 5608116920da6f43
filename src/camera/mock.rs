use super::interface::{CameraDevice, CaptureMode, ModeProfile};
use crate::error::CameraError;
use crate::frame::Frame;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// A call received by [`MockCamera`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraOp {
    Configure(CaptureMode),
    SetExposure(u32),
    Start,
    Stop,
    CaptureFrame,
    CaptureToFile(PathBuf),
    Close,
}

/// In-memory camera for testing without real hardware. Records every call
/// and enforces the same start/stop/configure rules as the real device.
pub struct MockCamera {
    ops: Vec<CameraOp>,
    profile: Option<ModeProfile>,
    exposure_us: Option<u32>,
    running: bool,
    closed: bool,
    capture_delay: Duration,
    frame: Option<Frame>,
    fail_on: Option<CameraOp>,
}

impl MockCamera {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            profile: None,
            exposure_us: None,
            running: false,
            closed: false,
            capture_delay: Duration::ZERO,
            frame: None,
            fail_on: None,
        }
    }

    /// Simulated time each `capture_frame` blocks for
    pub fn with_capture_delay(mut self, delay: Duration) -> Self {
        self.capture_delay = delay;
        self
    }

    /// Frame returned by `capture_frame` instead of the generated pattern
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Make the first call matching `op` fail with a device error
    pub fn fail_on(mut self, op: CameraOp) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn ops(&self) -> &[CameraOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn exposure_us(&self) -> Option<u32> {
        self.exposure_us
    }

    pub fn configured_profile(&self) -> Option<ModeProfile> {
        self.profile
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn record(&mut self, op: CameraOp) -> Result<(), CameraError> {
        debug!("Mock camera: {:?}", op);
        let fail = self.fail_on.as_ref() == Some(&op);
        self.ops.push(op);
        if fail {
            self.fail_on = None;
            return Err(CameraError::Capture {
                details: "injected mock failure".to_string(),
            });
        }
        Ok(())
    }

    fn test_pattern(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                data.push(((x * 255) / width.max(1)) as u8);
                data.push(((y * 255) / height.max(1)) as u8);
                data.push(128);
            }
        }
        Frame::new(width, height, crate::frame::PixelFormat::Rgb24, data)
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CameraDevice for MockCamera {
    async fn configure(&mut self, profile: ModeProfile) -> Result<(), CameraError> {
        if self.running {
            return Err(CameraError::InvalidState {
                operation: "configure",
                details: "camera must be stopped before reconfiguring".to_string(),
            });
        }
        self.record(CameraOp::Configure(profile.mode))?;
        self.profile = Some(profile);
        self.exposure_us = None;
        Ok(())
    }

    async fn start(&mut self) -> Result<(), CameraError> {
        if self.running {
            return Err(CameraError::InvalidState {
                operation: "start",
                details: "camera is already running".to_string(),
            });
        }
        if self.profile.is_none() {
            return Err(CameraError::InvalidState {
                operation: "start",
                details: "camera is not configured".to_string(),
            });
        }
        self.record(CameraOp::Start)?;
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), CameraError> {
        if !self.running {
            return Err(CameraError::InvalidState {
                operation: "stop",
                details: "camera is not running".to_string(),
            });
        }
        self.record(CameraOp::Stop)?;
        self.running = false;
        Ok(())
    }

    async fn set_exposure(&mut self, exposure_us: u32) -> Result<(), CameraError> {
        self.record(CameraOp::SetExposure(exposure_us))?;
        self.exposure_us = Some(exposure_us);
        Ok(())
    }

    async fn capture_frame(&mut self) -> Result<Frame, CameraError> {
        let profile = match (self.running, self.profile) {
            (true, Some(profile)) => profile,
            _ => {
                return Err(CameraError::InvalidState {
                    operation: "capture_frame",
                    details: "camera is not running".to_string(),
                })
            }
        };
        self.record(CameraOp::CaptureFrame)?;

        if !self.capture_delay.is_zero() {
            tokio::time::sleep(self.capture_delay).await;
        }

        Ok(match &self.frame {
            Some(frame) => frame.clone(),
            None => Self::test_pattern(profile.resolution.0, profile.resolution.1),
        })
    }

    async fn capture_to_file(&mut self, path: &Path) -> Result<(), CameraError> {
        if !self.running {
            return Err(CameraError::InvalidState {
                operation: "capture_to_file",
                details: "camera is not running".to_string(),
            });
        }
        self.record(CameraOp::CaptureToFile(path.to_path_buf()))?;

        // Bare SOI/EOI markers are enough for tests that only look for the file.
        tokio::fs::write(path, [0xFF, 0xD8, 0xFF, 0xD9])
            .await
            .map_err(|source| CameraError::StillWrite {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn close(&mut self) -> Result<(), CameraError> {
        self.record(CameraOp::Close)?;
        self.running = false;
        self.closed = true;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn configured_mode(&self) -> Option<CaptureMode> {
        self.profile.map(|p| p.mode)
    }
}
