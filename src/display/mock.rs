use super::stats::DisplayStats;
use super::surface::DisplaySurface;
use crate::error::DisplayError;
use crate::frame::Frame;
use async_trait::async_trait;
use std::io;

/// In-memory panel for testing without real hardware
pub struct MockDisplay {
    resolution: (u32, u32),
    last_frame: Option<(Frame, u32, u32)>,
    stats: DisplayStats,
    fail_writes: bool,
}

impl MockDisplay {
    pub fn new(resolution: (u32, u32)) -> Self {
        Self {
            resolution,
            last_frame: None,
            stats: DisplayStats::default(),
            fail_writes: false,
        }
    }

    /// Make every `show` fail, as an unplugged panel would
    pub fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Last frame shown together with its offset
    pub fn last_frame(&self) -> Option<&(Frame, u32, u32)> {
        self.last_frame.as_ref()
    }

    pub fn stats(&self) -> &DisplayStats {
        &self.stats
    }
}

#[async_trait]
impl DisplaySurface for MockDisplay {
    async fn clear(&mut self) -> Result<(), DisplayError> {
        self.last_frame = None;
        self.stats.record_clear();
        Ok(())
    }

    async fn show(&mut self, frame: &Frame, x_offset: u32, y_offset: u32) -> Result<(), DisplayError> {
        if self.fail_writes {
            return Err(DisplayError::Write {
                source: io::Error::new(io::ErrorKind::BrokenPipe, "mock panel disconnected"),
            });
        }
        self.last_frame = Some((frame.clone(), x_offset, y_offset));
        self.stats.record_frame();
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }
}
