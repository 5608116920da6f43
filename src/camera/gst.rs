use super::interface::{CameraDevice, CaptureMode, ModeProfile};
use crate::config::CameraConfig;
use crate::error::CameraError;
use crate::frame::{Frame, PixelFormat};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info, trace, warn};

use gstreamer::prelude::*;
use gstreamer::Pipeline;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;

/// GStreamer V4L2 camera. Each `configure` tears the pipeline down and builds
/// a new one for the requested profile, since the sensor cannot change
/// resolution while streaming.
pub struct GstCamera {
    config: CameraConfig,
    pipeline: Option<Pipeline>,
    appsink: Option<AppSink>,
    profile: Option<ModeProfile>,
    exposure_us: Option<u32>,
    running: bool,
}

impl GstCamera {
    /// Initialize GStreamer and check the capture device exists
    pub fn open(config: CameraConfig) -> Result<Self, CameraError> {
        let device = device_path(config.index);
        info!("Opening GStreamer camera {}", device);

        gstreamer::init().map_err(|e| CameraError::DeviceOpen {
            device: device.clone(),
            details: format!("Failed to initialize GStreamer: {}", e),
        })?;

        if !Path::new(&device).exists() {
            return Err(CameraError::DeviceOpen {
                device,
                details: "device node not found".to_string(),
            });
        }

        Ok(Self {
            config,
            pipeline: None,
            appsink: None,
            profile: None,
            exposure_us: None,
            running: false,
        })
    }

    /// Build GStreamer pipeline string for a capture profile
    fn build_pipeline_string(&self, profile: &ModeProfile) -> String {
        let device = device_path(self.config.index);
        let (width, height) = profile.resolution;

        match profile.mode {
            // The sensor rarely offers panel-sized modes, so scale down after capture.
            CaptureMode::Preview => format!(
                "v4l2src name=src device={} io-mode=mmap ! \
                 videoconvert ! videoscale method=bilinear ! \
                 video/x-raw,format=RGB,width={},height={} ! \
                 appsink name=sink sync=false max-buffers=1 drop=true enable-last-sample=false",
                device, width, height
            ),
            CaptureMode::Still => format!(
                "v4l2src name=src device={} io-mode=mmap num-buffers=-1 ! \
                 video/x-raw,width={},height={} ! \
                 videoconvert ! jpegenc quality={} ! \
                 appsink name=sink sync=false max-buffers=1 drop=true enable-last-sample=false",
                device, width, height, self.config.jpeg_quality
            ),
        }
    }

    fn apply_exposure(&self, exposure_us: u32) -> Result<(), CameraError> {
        let Some(pipeline) = &self.pipeline else {
            return Ok(());
        };
        let src = pipeline.by_name("src").ok_or_else(|| CameraError::Exposure {
            exposure_us,
            details: "v4l2src element missing from pipeline".to_string(),
        })?;

        // V4L2 exposure_time_absolute is in 100us units; auto_exposure=1 is manual mode.
        let controls = gstreamer::Structure::builder("controls")
            .field("auto_exposure", 1i32)
            .field("exposure_time_absolute", (exposure_us / 100).max(1) as i32)
            .build();
        src.set_property("extra-controls", &controls);
        debug!("Exposure set to {}us", exposure_us);
        Ok(())
    }

    fn timeout(&self) -> gstreamer::ClockTime {
        gstreamer::ClockTime::from_mseconds(self.config.capture_timeout_ms)
    }

    fn require_running(&self, operation: &'static str) -> Result<&AppSink, CameraError> {
        if !self.running {
            return Err(CameraError::InvalidState {
                operation,
                details: "camera is not running".to_string(),
            });
        }
        self.appsink.as_ref().ok_or_else(|| CameraError::InvalidState {
            operation,
            details: "camera is not configured".to_string(),
        })
    }

    /// Pull one sample off the appsink without stalling the runtime thread
    async fn pull_sample(&self, operation: &'static str) -> Result<gstreamer::Sample, CameraError> {
        let appsink = self.require_running(operation)?.clone();
        let timeout = self.timeout();
        let timeout_ms = self.config.capture_timeout_ms;

        tokio::task::spawn_blocking(move || appsink.try_pull_sample(timeout))
            .await
            .map_err(|e| CameraError::Capture {
                details: format!("capture task failed: {}", e),
            })?
            .ok_or(CameraError::CaptureTimeout { timeout_ms })
    }

    fn wait_for_state(&self, pipeline: &Pipeline, operation: &'static str) -> Result<(), CameraError> {
        let (result, state, _pending) = pipeline.state(gstreamer::ClockTime::from_mseconds(
            self.config.capture_timeout_ms,
        ));
        result.map_err(|e| CameraError::StateChange {
            operation,
            details: format!("pipeline did not settle: {} (state {:?})", e, state),
        })?;
        Ok(())
    }
}

#[async_trait]
impl CameraDevice for GstCamera {
    async fn configure(&mut self, profile: ModeProfile) -> Result<(), CameraError> {
        if self.running {
            return Err(CameraError::InvalidState {
                operation: "configure",
                details: "camera must be stopped before reconfiguring".to_string(),
            });
        }

        if let Some(old) = self.pipeline.take() {
            let _ = old.set_state(gstreamer::State::Null);
        }
        self.appsink = None;
        self.profile = None;
        self.exposure_us = None;

        let pipeline_desc = self.build_pipeline_string(&profile);
        info!("Configuring camera for {} mode", profile.mode);
        debug!("Camera pipeline: {}", pipeline_desc);

        let pipeline = gstreamer::parse::launch(&pipeline_desc)
            .map_err(|e| CameraError::Configuration {
                mode: profile.mode,
                details: format!("Failed to create pipeline: {}", e),
            })?
            .downcast::<Pipeline>()
            .map_err(|_| CameraError::Configuration {
                mode: profile.mode,
                details: "Failed to downcast to Pipeline".to_string(),
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| CameraError::Configuration {
                mode: profile.mode,
                details: "Failed to get appsink element".to_string(),
            })?
            .downcast::<AppSink>()
            .map_err(|_| CameraError::Configuration {
                mode: profile.mode,
                details: "Failed to downcast to AppSink".to_string(),
            })?;

        self.pipeline = Some(pipeline);
        self.appsink = Some(appsink);
        self.profile = Some(profile);
        Ok(())
    }

    async fn start(&mut self) -> Result<(), CameraError> {
        if self.running {
            return Err(CameraError::InvalidState {
                operation: "start",
                details: "camera is already running".to_string(),
            });
        }
        let pipeline = self.pipeline.as_ref().ok_or_else(|| CameraError::InvalidState {
            operation: "start",
            details: "camera is not configured".to_string(),
        })?;

        pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| CameraError::StateChange {
                operation: "start",
                details: e.to_string(),
            })?;
        self.wait_for_state(pipeline, "start")?;

        self.running = true;
        debug!(
            "Camera pipeline playing ({:?}, exposure {:?}us)",
            self.profile.map(|p| p.mode),
            self.exposure_us
        );
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), CameraError> {
        if !self.running {
            return Err(CameraError::InvalidState {
                operation: "stop",
                details: "camera is not running".to_string(),
            });
        }
        if let Some(pipeline) = &self.pipeline {
            pipeline
                .set_state(gstreamer::State::Null)
                .map_err(|e| CameraError::StateChange {
                    operation: "stop",
                    details: e.to_string(),
                })?;
        }
        self.running = false;
        debug!("Camera pipeline stopped");
        Ok(())
    }

    async fn set_exposure(&mut self, exposure_us: u32) -> Result<(), CameraError> {
        self.apply_exposure(exposure_us)?;
        self.exposure_us = Some(exposure_us);
        Ok(())
    }

    async fn capture_frame(&mut self) -> Result<Frame, CameraError> {
        let sample = self.pull_sample("capture_frame").await?;

        let buffer = sample.buffer().ok_or_else(|| CameraError::Capture {
            details: "No buffer in sample".to_string(),
        })?;
        let caps = sample.caps().ok_or_else(|| CameraError::Capture {
            details: "No caps in sample".to_string(),
        })?;
        let video_info = VideoInfo::from_caps(caps).map_err(|e| CameraError::Capture {
            details: format!("Failed to get video info: {}", e),
        })?;
        let map = buffer.map_readable().map_err(|e| CameraError::Capture {
            details: format!("Failed to map buffer: {}", e),
        })?;

        let width = video_info.width();
        let height = video_info.height();
        let row_bytes = width as usize * PixelFormat::Rgb24.bytes_per_pixel();
        let stride = video_info.stride()[0] as usize;

        let data = if stride == row_bytes {
            map.as_slice().to_vec()
        } else {
            map.as_slice()
                .chunks(stride)
                .take(height as usize)
                .flat_map(|row| row[..row_bytes.min(row.len())].iter().copied())
                .collect()
        };

        let frame = Frame::new(width, height, PixelFormat::Rgb24, data);
        if !frame.validate_size() {
            return Err(CameraError::Capture {
                details: format!(
                    "short frame: {} bytes for {}x{}",
                    frame.data.len(),
                    width,
                    height
                ),
            });
        }

        trace!("Captured preview frame {}x{}", width, height);
        Ok(frame)
    }

    async fn capture_to_file(&mut self, path: &Path) -> Result<(), CameraError> {
        let sample = self.pull_sample("capture_to_file").await?;
        let buffer = sample.buffer().ok_or_else(|| CameraError::Capture {
            details: "No buffer in still sample".to_string(),
        })?;
        let map = buffer.map_readable().map_err(|e| CameraError::Capture {
            details: format!("Failed to map still buffer: {}", e),
        })?;

        let jpeg = map.as_slice().to_vec();
        drop(map);

        tokio::fs::write(path, &jpeg)
            .await
            .map_err(|source| CameraError::StillWrite {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Wrote {} byte still to {}", jpeg.len(), path.display());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), CameraError> {
        if let Some(pipeline) = self.pipeline.take() {
            if let Err(e) = pipeline.set_state(gstreamer::State::Null) {
                warn!("Failed to reset camera pipeline on close: {}", e);
            }
        }
        self.appsink = None;
        self.profile = None;
        self.running = false;
        info!("Camera closed");
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn configured_mode(&self) -> Option<CaptureMode> {
        self.profile.map(|p| p.mode)
    }
}

fn device_path(index: u32) -> String {
    format!("/dev/video{}", index)
}
