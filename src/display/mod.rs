mod converter;
mod framebuffer;
mod mock;
mod stats;
mod surface;
#[cfg(test)]
mod tests;

pub use converter::DisplayConverter;
pub use framebuffer::FramebufferDisplay;
pub use mock::MockDisplay;
pub use stats::DisplayStats;
pub use surface::DisplaySurface;
