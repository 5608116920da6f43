use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::frame::Rotation;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ViewfinderConfig {
    pub camera: CameraConfig,
    pub display: DisplayConfig,
    pub input: InputConfig,
    pub frame_loop: LoopConfig,
    pub overlay: OverlayConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CameraConfig {
    /// Camera device index (e.g., 0 for /dev/video0)
    #[serde(default = "default_camera_index")]
    pub index: u32,

    /// Live preview resolution (width, height); matches the panel
    #[serde(default = "default_preview_resolution")]
    pub preview_resolution: (u32, u32),

    /// Still capture resolution (width, height)
    #[serde(default = "default_still_resolution")]
    pub still_resolution: (u32, u32),

    /// Exposure time in microseconds while previewing
    #[serde(default = "default_preview_exposure_us")]
    pub preview_exposure_us: u32,

    /// Exposure time in microseconds for stills
    #[serde(default = "default_still_exposure_us")]
    pub still_exposure_us: u32,

    /// JPEG quality for stills (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// How long a single capture may block before it is treated as a device failure
    #[serde(default = "default_capture_timeout_ms")]
    pub capture_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplayConfig {
    /// Framebuffer device path
    #[serde(default = "default_framebuffer_device")]
    pub framebuffer_device: String,

    /// Panel resolution (width, height)
    #[serde(default = "default_display_resolution")]
    pub resolution: (u32, u32),

    /// Blit offset (x, y) on the panel
    #[serde(default = "default_display_offset")]
    pub offset: (u32, u32),

    /// Rotation that matches the physical panel mounting
    #[serde(default = "default_display_rotation")]
    pub rotation: Rotation,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputBackend {
    /// gpio-keys evdev device (the HAT buttons)
    Evdev,
    /// Terminal keyboard, for bench use over SSH
    Keyboard,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InputConfig {
    /// Which input backend to poll
    #[serde(default = "default_input_backend")]
    pub backend: InputBackend,

    /// evdev device exposing the HAT buttons
    #[serde(default = "default_input_device")]
    pub device: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoopConfig {
    /// Target display frame rate
    #[serde(default = "default_frames_per_second")]
    pub frames_per_second: u32,

    /// Optional process niceness applied at startup
    #[serde(default)]
    pub niceness: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OverlayConfig {
    /// Banner text shown after a still capture
    #[serde(default = "default_overlay_message")]
    pub message: String,

    /// How long the banner stays visible, in seconds
    #[serde(default = "default_overlay_duration_seconds")]
    pub duration_seconds: f64,

    /// Path to TrueType font file for the banner
    #[serde(default = "default_overlay_font_path")]
    pub font_path: String,

    /// Font size for the banner
    #[serde(default = "default_overlay_font_size")]
    pub font_size: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Directory that receives still images
    #[serde(default = "default_image_dir")]
    pub image_dir: String,

    /// IANA timezone for filename timestamps; "local" uses the system zone
    #[serde(default = "default_timestamp_timezone")]
    pub timestamp_timezone: String,
}

impl ViewfinderConfig {
    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("camera.index", default_camera_index())?
            .set_default(
                "camera.preview_resolution",
                vec![
                    default_preview_resolution().0,
                    default_preview_resolution().1,
                ],
            )?
            .set_default(
                "camera.still_resolution",
                vec![default_still_resolution().0, default_still_resolution().1],
            )?
            .set_default("camera.preview_exposure_us", default_preview_exposure_us())?
            .set_default("camera.still_exposure_us", default_still_exposure_us())?
            .set_default("camera.jpeg_quality", default_jpeg_quality() as u32)?
            .set_default("camera.capture_timeout_ms", default_capture_timeout_ms())?
            .set_default("display.framebuffer_device", default_framebuffer_device())?
            .set_default(
                "display.resolution",
                vec![
                    default_display_resolution().0,
                    default_display_resolution().1,
                ],
            )?
            .set_default(
                "display.offset",
                vec![default_display_offset().0, default_display_offset().1],
            )?
            .set_default("display.rotation", "Rotate90")?
            .set_default("input.backend", "evdev")?
            .set_default("input.device", default_input_device())?
            .set_default(
                "frame_loop.frames_per_second",
                default_frames_per_second(),
            )?
            .set_default("overlay.message", default_overlay_message())?
            .set_default(
                "overlay.duration_seconds",
                default_overlay_duration_seconds(),
            )?
            .set_default("overlay.font_path", default_overlay_font_path())?
            .set_default("overlay.font_size", default_overlay_font_size() as f64)?
            .set_default("storage.image_dir", default_image_dir())?
            .set_default(
                "storage.timestamp_timezone",
                default_timestamp_timezone(),
            )?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // VIEWFINDER_<SECTION>__<KEY>, e.g. VIEWFINDER_CAMERA__STILL_EXPOSURE_US
            .add_source(
                Environment::with_prefix("VIEWFINDER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: ViewfinderConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (preview_w, preview_h) = self.camera.preview_resolution;
        if preview_w == 0 || preview_h == 0 {
            return Err(ConfigError::Message(
                "Camera preview resolution must be greater than 0".to_string(),
            ));
        }

        if self.camera.still_resolution.0 == 0 || self.camera.still_resolution.1 == 0 {
            return Err(ConfigError::Message(
                "Camera still resolution must be greater than 0".to_string(),
            ));
        }

        if self.camera.preview_exposure_us == 0 || self.camera.still_exposure_us == 0 {
            return Err(ConfigError::Message(
                "Camera exposure times must be greater than 0".to_string(),
            ));
        }

        if !(1..=100).contains(&self.camera.jpeg_quality) {
            return Err(ConfigError::Message(
                "Camera jpeg_quality must be between 1 and 100".to_string(),
            ));
        }

        if self.frame_loop.frames_per_second == 0 {
            return Err(ConfigError::Message(
                "Loop frames_per_second must be greater than 0".to_string(),
            ));
        }

        if !(self.overlay.duration_seconds > 0.0) || !self.overlay.duration_seconds.is_finite() {
            return Err(ConfigError::Message(
                "Overlay duration_seconds must be a positive number".to_string(),
            ));
        }

        // The composed frame is the rotated preview; it must cover the panel exactly.
        let (rotated_w, rotated_h) = match self.display.rotation {
            Rotation::Rotate90 | Rotation::Rotate270 => (preview_h, preview_w),
            Rotation::Rotate180 => (preview_w, preview_h),
        };
        let (panel_w, panel_h) = self.display.resolution;
        let (offset_x, offset_y) = self.display.offset;
        if rotated_w + offset_x > panel_w || rotated_h + offset_y > panel_h {
            return Err(ConfigError::Message(format!(
                "Rotated preview {}x{} at offset {:?} does not fit the {}x{} panel",
                rotated_w, rotated_h, self.display.offset, panel_w, panel_h
            )));
        }

        Ok(())
    }
}

impl Default for ViewfinderConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig {
                index: default_camera_index(),
                preview_resolution: default_preview_resolution(),
                still_resolution: default_still_resolution(),
                preview_exposure_us: default_preview_exposure_us(),
                still_exposure_us: default_still_exposure_us(),
                jpeg_quality: default_jpeg_quality(),
                capture_timeout_ms: default_capture_timeout_ms(),
            },
            display: DisplayConfig {
                framebuffer_device: default_framebuffer_device(),
                resolution: default_display_resolution(),
                offset: default_display_offset(),
                rotation: default_display_rotation(),
            },
            input: InputConfig {
                backend: default_input_backend(),
                device: default_input_device(),
            },
            frame_loop: LoopConfig {
                frames_per_second: default_frames_per_second(),
                niceness: None,
            },
            overlay: OverlayConfig {
                message: default_overlay_message(),
                duration_seconds: default_overlay_duration_seconds(),
                font_path: default_overlay_font_path(),
                font_size: default_overlay_font_size(),
            },
            storage: StorageConfig {
                image_dir: default_image_dir(),
                timestamp_timezone: default_timestamp_timezone(),
            },
        }
    }
}

// Default value functions
fn default_camera_index() -> u32 {
    0
}
fn default_preview_resolution() -> (u32, u32) {
    (128, 128)
}
fn default_still_resolution() -> (u32, u32) {
    (2592, 1944)
}
fn default_preview_exposure_us() -> u32 {
    45_000
}
fn default_still_exposure_us() -> u32 {
    25_000
}
fn default_jpeg_quality() -> u8 {
    90
}
fn default_capture_timeout_ms() -> u64 {
    5_000
}

fn default_framebuffer_device() -> String {
    "/dev/fb1".to_string()
}
fn default_display_resolution() -> (u32, u32) {
    (128, 128)
}
fn default_display_offset() -> (u32, u32) {
    (0, 0)
}
fn default_display_rotation() -> Rotation {
    Rotation::Rotate90
}

fn default_input_backend() -> InputBackend {
    InputBackend::Evdev
}
fn default_input_device() -> String {
    "/dev/input/by-path/platform-gpio-keys-event".to_string()
}

fn default_frames_per_second() -> u32 {
    24
}

fn default_overlay_message() -> String {
    "Picture Taken".to_string()
}
fn default_overlay_duration_seconds() -> f64 {
    3.0
}
fn default_overlay_font_path() -> String {
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf".to_string()
}
fn default_overlay_font_size() -> f32 {
    16.0
}

fn default_image_dir() -> String {
    "images".to_string()
}
fn default_timestamp_timezone() -> String {
    "local".to_string()
}
