use crate::error::DisplayError;
use crate::frame::Frame;
use async_trait::async_trait;

/// Physical output panel
#[async_trait]
pub trait DisplaySurface: Send {
    /// Blank the whole panel
    async fn clear(&mut self) -> Result<(), DisplayError>;

    /// Blit a full RGB24 frame at the given offset, overwriting the visible area
    async fn show(&mut self, frame: &Frame, x_offset: u32, y_offset: u32) -> Result<(), DisplayError>;

    /// Panel size (width, height) in pixels
    fn resolution(&self) -> (u32, u32);
}

#[async_trait]
impl<T: DisplaySurface + ?Sized> DisplaySurface for Box<T> {
    async fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear().await
    }

    async fn show(&mut self, frame: &Frame, x_offset: u32, y_offset: u32) -> Result<(), DisplayError> {
        (**self).show(frame, x_offset, y_offset).await
    }

    fn resolution(&self) -> (u32, u32) {
        (**self).resolution()
    }
}
