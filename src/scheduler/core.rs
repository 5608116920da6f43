use super::pacer::{FramePacer, Pacing};
use super::stats::LoopStats;
use crate::app::{Session, ShutdownReason};
use crate::camera::CameraDevice;
use crate::controller::{CapturedImageRecord, ControllerState};
use crate::display::DisplaySurface;
use crate::error::Result;
use crate::input::{ButtonId, InputPoller};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Outcome of one pass through the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationReport {
    pub elapsed: Duration,
    pub pacing: Pacing,
    pub still: Option<CapturedImageRecord>,
    pub other_buttons: Vec<ButtonId>,
}

/// Drives capture, compose and display once per frame period
pub struct LoopScheduler {
    pacer: FramePacer,
    stats: LoopStats,
}

impl LoopScheduler {
    pub fn new(pacer: FramePacer) -> Self {
        Self {
            pacer,
            stats: LoopStats::default(),
        }
    }

    pub fn from_fps(frames_per_second: u32) -> Self {
        Self::new(FramePacer::from_fps(frames_per_second))
    }

    pub fn pacer(&self) -> &FramePacer {
        &self.pacer
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    /// Run iterations until `shutdown` is cancelled or a device fails.
    ///
    /// Cancellation is only observed between iterations and during the pacing
    /// sleep, so a shutter transition always runs to completion.
    pub async fn run<C, D, I>(
        &mut self,
        session: &mut Session<C, D, I>,
        shutdown: &CancellationToken,
    ) -> Result<ShutdownReason>
    where
        C: CameraDevice,
        D: DisplaySurface,
        I: InputPoller,
    {
        info!(
            "Frame loop running at {:.1} fps ({:?} per frame)",
            1.0 / self.pacer.period().as_secs_f64(),
            self.pacer.period()
        );

        loop {
            if shutdown.is_cancelled() {
                return Ok(ShutdownReason::Interrupted);
            }

            let report = self.run_iteration(session).await?;

            if let Pacing::Sleep(remaining) = report.pacing {
                tokio::select! {
                    _ = shutdown.cancelled() => return Ok(ShutdownReason::Interrupted),
                    _ = sleep(remaining) => {}
                }
            }
        }
    }

    /// One iteration without the trailing sleep
    pub async fn run_iteration<C, D, I>(&mut self, session: &mut Session<C, D, I>) -> Result<IterationReport>
    where
        C: CameraDevice,
        D: DisplaySurface,
        I: InputPoller,
    {
        let started = Instant::now();

        let mut raw = session.camera.capture_frame().await?;

        let mut still = None;
        let shutter = session.input.sample(ButtonId::SHUTTER);
        if shutter.pressed {
            if session.controller.state() == ControllerState::Previewing {
                info!("Shutter pressed");
                let record = session.controller.trigger_still(&mut session.camera).await?;
                self.stats.record_transition();
                // The frame captured above predates the mode switch
                raw = session.camera.capture_frame().await?;
                still = Some(record);
            } else {
                debug!(
                    "Shutter ignored while controller is {}",
                    session.controller.state()
                );
            }
        }

        let now = Instant::now();
        let composed = session
            .compositor
            .compose(&raw, session.controller.overlay(), now)?;
        let (x_offset, y_offset) = session.display_offset;
        session.display.show(&composed, x_offset, y_offset).await?;

        let mut other_buttons = Vec::new();
        for button in ButtonId::NON_SHUTTER {
            let event = session.input.sample(button);
            if event.pressed {
                info!("{} pressed", event.button);
                other_buttons.push(event.button);
            }
        }

        let elapsed = started.elapsed();
        let pacing = self.pacer.plan(elapsed);
        match pacing {
            Pacing::Sleep(remaining) => {
                trace!("Frame took {:?}, sleeping {:?}", elapsed, remaining);
            }
            Pacing::Overrun { elapsed } => {
                warn!(
                    "Frame took longer than {:.4} seconds: {:.4} seconds",
                    self.pacer.period().as_secs_f64(),
                    elapsed.as_secs_f64()
                );
            }
        }
        self.stats.record_iteration(elapsed, pacing);

        Ok(IterationReport {
            elapsed,
            pacing,
            still,
            other_buttons,
        })
    }
}
