pub mod core;
pub mod overlay;

#[cfg(test)]
mod tests;

pub use self::core::{FrameCompositor, BANNER_PADDING};
pub use overlay::{load_font, OverlayState};
