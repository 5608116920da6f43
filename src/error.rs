use crate::camera::CaptureMode;
use crate::controller::TransitionStage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewfinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Mode transition failed while {stage}: {source}")]
    Transition {
        stage: TransitionStage,
        #[source]
        source: CameraError,
    },

    #[error("System error: {message}")]
    System { message: String },
}

/// Camera device errors
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to open camera {device}: {details}")]
    DeviceOpen { device: String, details: String },

    #[error("Failed to configure camera for {mode} mode: {details}")]
    Configuration { mode: CaptureMode, details: String },

    #[error("Camera {operation} rejected: {details}")]
    InvalidState {
        operation: &'static str,
        details: String,
    },

    #[error("Failed to {operation} camera: {details}")]
    StateChange {
        operation: &'static str,
        details: String,
    },

    #[error("Failed to set exposure to {exposure_us}us: {details}")]
    Exposure { exposure_us: u32, details: String },

    #[error("Capture failed: {details}")]
    Capture { details: String },

    #[error("Timed out after {timeout_ms}ms waiting for a frame")]
    CaptureTimeout { timeout_ms: u64 },

    #[error("Failed to write still image to {path}: {source}")]
    StillWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Camera support not compiled in (enable the `camera` feature on Linux)")]
    NotAvailable,
}

/// Display device errors
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Failed to open framebuffer {device}: {source}")]
    FramebufferOpen {
        device: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Framebuffer {device} has unsupported geometry: {details}")]
    Geometry { device: String, details: String },

    #[error("Framebuffer write failed: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error("Format conversion error: {details}")]
    FormatConversion { details: String },
}

/// Button input errors
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to open input device {device}: {details}")]
    DeviceOpen { device: String, details: String },

    #[error("Input device {0} does not report key events")]
    UnsupportedDevice(String),

    #[error("Terminal input unavailable: {details}")]
    Terminal { details: String },

    #[error("Button input not compiled in (enable the `buttons` feature on Linux)")]
    NotAvailable,
}

/// Still image storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create image directory {path}: {source}")]
    DirectoryCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image directory {path} is not a directory")]
    NotADirectory { path: String },
}

/// Coarse classification used for reporting and exit handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DeviceInit,
    DeviceOperation,
    Storage,
    Config,
    System,
}

impl ViewfinderError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Camera(CameraError::DeviceOpen { .. })
            | Self::Camera(CameraError::NotAvailable)
            | Self::Display(DisplayError::FramebufferOpen { .. })
            | Self::Display(DisplayError::Geometry { .. })
            | Self::Input(_) => ErrorKind::DeviceInit,
            Self::Camera(CameraError::StillWrite { .. })
            | Self::Transition {
                source: CameraError::StillWrite { .. },
                ..
            }
            | Self::Storage(_) => ErrorKind::Storage,
            Self::Camera(_) | Self::Display(_) | Self::Transition { .. } => {
                ErrorKind::DeviceOperation
            }
            Self::System { .. } => ErrorKind::System,
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewfinderError>;
