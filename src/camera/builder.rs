use crate::config::CameraConfig;
use crate::error::{Result, ViewfinderError};

#[cfg(all(target_os = "linux", feature = "camera"))]
use super::gst::GstCamera;

/// Builder for the GStreamer camera
pub struct CameraBuilder {
    config: Option<CameraConfig>,
}

impl CameraBuilder {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn config(mut self, config: CameraConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[cfg(all(target_os = "linux", feature = "camera"))]
    pub fn build(self) -> Result<GstCamera> {
        let config = self
            .config
            .ok_or_else(|| ViewfinderError::system("Camera configuration must be specified"))?;

        Ok(GstCamera::open(config)?)
    }

    #[cfg(not(all(target_os = "linux", feature = "camera")))]
    pub fn build(self) -> Result<super::MockCamera> {
        if self.config.is_none() {
            return Err(ViewfinderError::system(
                "Camera configuration must be specified",
            ));
        }
        Err(crate::error::CameraError::NotAvailable.into())
    }
}

impl Default for CameraBuilder {
    fn default() -> Self {
        Self::new()
    }
}
