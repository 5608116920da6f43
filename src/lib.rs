pub mod app;
pub mod camera;
pub mod compositor;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod frame;
pub mod input;
pub mod scheduler;

pub use app::{HardwareSession, Session, ShutdownReason};
pub use camera::{CameraBuilder, CameraDevice, CaptureMode, ModeProfile, ModeProfiles};
pub use compositor::{FrameCompositor, OverlayState};
pub use config::ViewfinderConfig;
pub use controller::{CapturedImageRecord, ControllerState, ModeController};
pub use display::{DisplaySurface, FramebufferDisplay};
pub use error::{ErrorKind, Result, ViewfinderError};
pub use frame::{Frame, PixelFormat, Rotation};
pub use input::{ButtonId, InputPoller};
pub use scheduler::{FramePacer, LoopScheduler, LoopStats, Pacing};
