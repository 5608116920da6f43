use super::{Session, ShutdownReason};
use crate::camera::CameraDevice;
use crate::display::DisplaySurface;
use crate::error::Result;
use crate::input::InputPoller;
use crate::scheduler::LoopScheduler;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

impl<C, D, I> Session<C, D, I>
where
    C: CameraDevice,
    D: DisplaySurface,
    I: InputPoller,
{
    /// Start the devices, run the frame loop until interrupted or a device
    /// fails, then tear down. Teardown runs on every path out of here.
    pub async fn run(
        &mut self,
        scheduler: &mut LoopScheduler,
        shutdown: CancellationToken,
    ) -> Result<ShutdownReason> {
        let outcome = match self.start().await {
            Ok(()) => scheduler.run(self, &shutdown).await,
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(reason) => info!("Shutdown initiated: {:?}", reason),
            Err(e) => error!("Frame loop stopped: {}", e),
        }

        let teardown = self.shutdown(scheduler.stats()).await;

        // A loop error outranks a teardown error
        let reason = outcome?;
        teardown?;
        Ok(reason)
    }
}

/// Cancel `shutdown` on SIGINT or SIGTERM
pub fn install_signal_handlers(shutdown: &CancellationToken) {
    #[cfg(unix)]
    {
        let token = shutdown.clone();
        tokio::spawn(async move {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    if sigterm.recv().await.is_some() {
                        info!("Received SIGTERM signal");
                        token.cancel();
                    }
                }
                Err(e) => error!("Failed to register SIGTERM handler: {}", e),
            }
        });
    }

    let token = shutdown.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT signal (Ctrl+C)");
                token.cancel();
            }
            Err(e) => error!("Failed to register SIGINT handler: {}", e),
        }
    });
}
