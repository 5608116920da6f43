pub mod core;
pub mod naming;
pub mod state;


pub use self::core::{CapturedImageRecord, ModeController};
pub use naming::{image_path, CaptureClock, FILENAME_TIMESTAMP_FORMAT};
pub use state::{ControllerState, TransitionStage};
