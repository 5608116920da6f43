use super::pacer::Pacing;
use std::time::Duration;

/// Running counters for the frame loop, summarized at shutdown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub iterations: u64,
    pub overruns: u64,
    pub transitions: u64,
    pub total_sleep: Duration,
    pub last_sleep: Option<Duration>,
    pub worst_elapsed: Duration,
}

impl LoopStats {
    pub fn record_iteration(&mut self, elapsed: Duration, pacing: Pacing) {
        self.iterations += 1;
        self.worst_elapsed = self.worst_elapsed.max(elapsed);
        match pacing {
            Pacing::Sleep(duration) => {
                self.total_sleep += duration;
                self.last_sleep = Some(duration);
            }
            Pacing::Overrun { .. } => {
                self.overruns += 1;
                self.last_sleep = None;
            }
        }
    }

    pub fn record_transition(&mut self) {
        self.transitions += 1;
    }

    pub fn average_sleep(&self) -> Duration {
        let sleeping = self.iterations.saturating_sub(self.overruns);
        if sleeping == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos((self.total_sleep.as_nanos() / u128::from(sleeping)) as u64)
    }
}
