use super::Session;
use crate::camera::CameraDevice;
use crate::display::DisplaySurface;
use crate::error::Result;
use crate::input::InputPoller;
use crate::scheduler::LoopStats;
use tracing::{error, info};

impl<C, D, I> Session<C, D, I>
where
    C: CameraDevice,
    D: DisplaySurface,
    I: InputPoller,
{
    /// Release the camera and blank the panel.
    ///
    /// Both steps are always attempted; the first error is returned. Calling
    /// this again after it has run is a no-op.
    pub async fn shutdown(&mut self, stats: &LoopStats) -> Result<()> {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;
        info!("Beginning graceful shutdown");

        let camera_result = self.camera.close().await;
        if let Err(e) = &camera_result {
            error!("Error releasing camera: {}", e);
        }

        let display_result = self.display.clear().await;
        if let Err(e) = &display_result {
            error!("Error clearing display: {}", e);
        }

        info!(
            "Frame loop summary: {} iterations, {} overruns, {} stills, worst frame {:?}, average sleep {:?}",
            stats.iterations,
            stats.overruns,
            stats.transitions,
            stats.worst_elapsed,
            stats.average_sleep()
        );

        camera_result?;
        display_result?;
        info!("Graceful shutdown completed");
        Ok(())
    }
}
