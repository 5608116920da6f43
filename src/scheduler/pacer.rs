use std::time::Duration;

/// What to do with the time left in a frame period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Work finished early; sleep for the remainder
    Sleep(Duration),
    /// Work took the whole period or longer; continue immediately
    Overrun { elapsed: Duration },
}

/// Fixed-rate frame pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    period: Duration,
}

impl FramePacer {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Period of `1/fps` seconds, truncated to whole nanoseconds
    pub fn from_fps(frames_per_second: u32) -> Self {
        Self::new(Duration::from_nanos(
            1_000_000_000 / u64::from(frames_per_second.max(1)),
        ))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// `elapsed == period` counts as an overrun: there is nothing left to sleep
    pub fn plan(&self, elapsed: Duration) -> Pacing {
        if elapsed < self.period {
            Pacing::Sleep(self.period - elapsed)
        } else {
            Pacing::Overrun { elapsed }
        }
    }
}
