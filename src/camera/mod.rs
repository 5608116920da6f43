mod builder;
#[cfg(all(target_os = "linux", feature = "camera"))]
mod gst;
mod interface;
mod mock;
#[cfg(test)]
mod tests;

pub use builder::CameraBuilder;
#[cfg(all(target_os = "linux", feature = "camera"))]
pub use gst::GstCamera;
pub use interface::{CameraDevice, CaptureMode, ModeProfile, ModeProfiles};
pub use mock::{CameraOp, MockCamera};
